use kstring::KString;
use shtml_safe::{SafeString, TrustLevel};

use crate::{error::BindError,
            schema::Schema,
            stream::{ValueStream, ValueSeries, EmptyStream},
            var::{Var, Tag}};

static EMPTY_STREAM: EmptyStream = EmptyStream;

/// The values for one instantiation of a `Schema`, indexed by slot.
/// The vectors are only grown (to the schema's slot counts) when
/// something is set; missing entries read as empty.
pub struct ValueSet<'s> {
    schema: &'s Schema,
    values: Vec<KString>,
    streams: Vec<Option<Box<dyn ValueStream + 's>>>,
}

impl<'s> std::fmt::Debug for ValueSet<'s> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueSet")
            .field("schema", &self.schema.id())
            .field("values", &self.values)
            .field("streams", &self.streams.iter().filter(|s| s.is_some()).count())
            .finish()
    }
}

impl<'s> ValueSet<'s> {
    pub(crate) fn new(schema: &'s Schema) -> Self {
        ValueSet { schema, values: Vec::new(), streams: Vec::new() }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    fn store(&mut self, var: &Var, value: KString) {
        if self.values.len() <= var.idx {
            self.values.resize(self.schema.scalar_count(), KString::from_static(""));
        }
        self.values[var.idx] = value;
    }

    /// Check `value` against the current trust requirement of the
    /// slot, raised by `extra`, and store the (possibly escaped)
    /// result.
    pub(crate) fn set_scalar_requiring(&mut self, var: &Var, value: &SafeString,
                                       extra: TrustLevel)
                                       -> Result<(), BindError> {
        self.schema.check_var(var, "this ValueSet");
        let required = self.schema.slot_trust(var).join(extra);
        let s = value.check(required).map_err(|source| BindError::Trust {
            name: var.name.clone(),
            source
        })?;
        self.store(var, s);
        Ok(())
    }

    /// Set the value of `var`, which must be attached to the schema
    /// of this value set (panics otherwise). Fails if `value` can't
    /// satisfy the trust required by the slot, even after escaping.
    pub fn set_scalar(&mut self, var: &Var, value: &SafeString) -> Result<(), BindError> {
        self.set_scalar_requiring(var, value, TrustLevel::Untrusted)
    }

    /// Like `set_scalar` but without a trust check, which is why only
    /// literals are accepted.
    pub fn set_const(&mut self, var: &Var, value: &'static str) {
        self.schema.check_var(var, "this ValueSet");
        self.store(var, KString::from_static(value));
    }

    /// Set the rows of the subsection `tag`, which must be declared in
    /// the schema of this value set (panics otherwise).
    pub fn set_subsection(&mut self, tag: &Tag, stream: impl ValueStream + 's) {
        self.schema.check_tag(tag, "this ValueSet");
        if self.streams.len() <= tag.idx {
            self.streams.resize_with(self.schema.subsection_count(), || None);
        }
        self.streams[tag.idx] = Some(Box::new(stream));
    }

    /// Set the rows of `tag` from value sets of its schema.
    pub fn set_rows(&mut self, tag: &Tag, rows: Vec<ValueSet<'s>>) {
        for row in &rows {
            if row.schema.id() != tag.child {
                panic!("row from schema {} {:?} used for {tag} \
                        (programmer error: row built from the wrong schema)",
                       row.schema.id(), row.schema.debug_name())
            }
        }
        self.set_subsection(tag, ValueSeries(rows))
    }

    /// The value of `var`; the empty string if it was never set. Panics
    /// if `var` is unattached or from another schema.
    pub fn get_scalar(&self, var: &Var) -> &str {
        self.schema.check_var(var, "this ValueSet");
        match self.values.get(var.idx) {
            Some(s) => s.as_str(),
            None => ""
        }
    }

    /// The rows of `tag`; an empty stream if they were never set.
    pub fn get_stream(&self, tag: &Tag) -> &dyn ValueStream {
        self.schema.check_tag(tag, "this ValueSet");
        match self.streams.get(tag.idx) {
            Some(Some(stream)) => &**stream,
            _ => &EMPTY_STREAM
        }
    }

    /// Look up a value via the name of its variable. Slow, for
    /// debugging and name-based conditions.
    pub fn scalar_by_name(&self, name: &str) -> Option<&str> {
        let var = self.schema.scalar(name)?;
        Some(self.get_scalar(var))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use shtml_safe::bless;
    use TrustLevel::*;

    #[test]
    fn t_unset_is_empty() {
        let mut schema = Schema::new();
        let title = schema.declare_scalar("title", TextSafe);
        let (comments, _) = schema.declare_subsection("comments");
        let vs = schema.value_set();
        assert_eq!(vs.get_scalar(&title), "");
        assert_eq!(vs.get_stream(&comments).count().unwrap(), 0);
        assert_eq!(vs.scalar_by_name("title"), Some(""));
        assert_eq!(vs.scalar_by_name("nope"), None);
    }

    #[test]
    fn t_set_and_get() {
        let mut schema = Schema::new();
        let a = schema.declare_scalar("a", TextSafe);
        let b = schema.declare_scalar("b", Untrusted);
        let mut vs = schema.value_set();
        vs.set_scalar(&b, &SafeString::untrusted("<b>")).unwrap();
        assert_eq!(vs.get_scalar(&b), "<b>");
        assert_eq!(vs.get_scalar(&a), "");
        vs.set_scalar(&a, &SafeString::untrusted("x < y")).unwrap();
        assert_eq!(vs.get_scalar(&a), "x &lt; y");
        vs.set_const(&a, "<i>const</i>");
        assert_eq!(vs.scalar_by_name("a"), Some("<i>const</i>"));
    }

    #[test]
    fn t_trust_violation() {
        let mut schema = Schema::new();
        let class = schema.declare_scalar("class", AttributeSafe);
        let mut vs = schema.value_set();
        let err = vs.set_scalar(&class, &SafeString::untrusted("main")).unwrap_err();
        assert!(matches!(err, BindError::Trust { .. }));
        vs.set_scalar(&class, &bless(AttributeSafe, "main")).unwrap();
        assert_eq!(vs.get_scalar(&class), "main");
    }

    #[test]
    fn t_uses_joined_trust_of_slot() {
        let mut schema = Schema::new();
        let early = schema.declare_scalar("x", TextSafe);
        schema.declare_scalar("x", UrlSafe);
        let mut vs = schema.value_set();
        // The slot now requires full trust, although the handle
        // predates that.
        assert!(vs.set_scalar(&early, &bless(TextSafe, "t")).is_err());
        vs.set_scalar(&early, &SafeString::constant("t")).unwrap();
    }

    #[test]
    #[should_panic(expected = "variable used in wrong context")]
    fn t_foreign_var_panics() {
        let mut a = Schema::new();
        let b = Schema::new();
        let var = a.declare_scalar("title", Untrusted);
        let vs = b.value_set();
        vs.get_scalar(&var);
    }

    #[test]
    #[should_panic(expected = "variable used in wrong context")]
    fn t_foreign_var_set_panics() {
        let mut a = Schema::new();
        let mut b = Schema::new();
        let var = a.declare_scalar("title", Untrusted);
        b.declare_scalar("title", Untrusted);
        let mut vs = b.value_set();
        let _ = vs.set_scalar(&var, &SafeString::constant("x"));
    }

    #[test]
    #[should_panic(expected = "free variables must be attached")]
    fn t_free_var_panics() {
        let schema = Schema::new();
        schema.value_set().get_scalar(&Var::free("x"));
    }

    #[test]
    fn t_nested_rows() {
        let mut page = Schema::new();
        let (articles, article) = page.declare_subsection("articles");
        let title = article.declare_scalar("title", TextSafe);
        let (comments, comment) = article.declare_subsection("comments");
        let body = comment.declare_scalar("body", TextSafe);

        let page = page;
        let article = page.child(&articles);
        let comment = article.child(&comments);

        let mut rows = Vec::new();
        for i in 0..3 {
            let mut a = article.value_set();
            a.set_scalar(&title, &SafeString::untrusted(format!("article {i}"))).unwrap();
            let mut cs = Vec::new();
            for j in 0..2 {
                let mut c = comment.value_set();
                c.set_scalar(&body, &SafeString::untrusted(format!("comment {i}.{j}")))
                    .unwrap();
                cs.push(c);
            }
            a.set_rows(&comments, cs);
            rows.push(a);
        }
        let mut vs = page.value_set();
        vs.set_rows(&articles, rows);

        let mut seen = Vec::new();
        vs.get_stream(&articles).each(&mut |a| {
            seen.push(a.get_scalar(&title).to_string());
            a.get_stream(&comments).each(&mut |c| {
                seen.push(c.get_scalar(&body).to_string());
                Ok(())
            })
        }).unwrap();
        assert_eq!(seen, [
            "article 0", "comment 0.0", "comment 0.1",
            "article 1", "comment 1.0", "comment 1.1",
            "article 2", "comment 2.0", "comment 2.1",
        ]);
    }

    #[test]
    #[should_panic(expected = "row built from the wrong schema")]
    fn t_rows_from_wrong_schema() {
        let mut page = Schema::new();
        let (articles, _) = page.declare_subsection("articles");
        let row = page.value_set();
        let mut vs = page.value_set();
        vs.set_rows(&articles, vec![row]);
    }
}
