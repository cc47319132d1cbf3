//! Binding whole trees of values in one call, addressed by handle or
//! by name.

use anyhow::{Result, Context, bail};
use kstring::KString;
use shtml_safe::{SafeString, TrustLevel, myfrom::{MyFrom, ks}};
use shtml_util::trace;

use crate::{error::BindError,
            schema::Schema,
            values::ValueSet,
            var::{Var, Tag}};

/// How a `BindArg` finds its slot: via a handle, or by looking up the
/// name (slower).
#[derive(Debug, Clone, PartialEq)]
pub enum Key<H> {
    Handle(H),
    Name(KString),
}

/// One value to bind: a string for a variable, or the rows of a
/// subsection, each row being the arguments for one value set of the
/// subsection's schema.
#[derive(Debug, Clone, PartialEq)]
pub enum BindArg {
    Scalar {
        key: Key<Var>,
        value: SafeString,
        /// Required in addition to the slot's own requirement.
        trust: TrustLevel,
    },
    Rows {
        key: Key<Tag>,
        rows: Vec<Vec<BindArg>>,
    },
}

impl BindArg {
    pub fn scalar<T>(name: T, value: SafeString) -> Self
        where KString: MyFrom<T>
    {
        BindArg::Scalar { key: Key::Name(ks(name)), value, trust: TrustLevel::Untrusted }
    }

    pub fn var(var: &Var, value: SafeString) -> Self {
        BindArg::Scalar {
            key: Key::Handle(var.clone()),
            value,
            trust: TrustLevel::Untrusted
        }
    }

    pub fn rows<T>(name: T, rows: Vec<Vec<BindArg>>) -> Self
        where KString: MyFrom<T>
    {
        BindArg::Rows { key: Key::Name(ks(name)), rows }
    }

    pub fn tag_rows(tag: &Tag, rows: Vec<Vec<BindArg>>) -> Self {
        BindArg::Rows { key: Key::Handle(tag.clone()), rows }
    }

    /// Raise the trust required for a scalar value. No effect on
    /// subsections.
    pub fn requiring(mut self, level: TrustLevel) -> Self {
        if let BindArg::Scalar { trust, .. } = &mut self {
            *trust = trust.join(level);
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            BindArg::Scalar { key: Key::Handle(v), .. } => v.name(),
            BindArg::Rows { key: Key::Handle(t), .. } => t.name(),
            BindArg::Scalar { key: Key::Name(n), .. } |
            BindArg::Rows { key: Key::Name(n), .. } => n,
        }
    }
}

/// A name that isn't in the schema: an error if the schema is
/// strict, otherwise ignored.
fn undefined(schema: &Schema, kind: &'static str, name: &str) -> Result<()> {
    if schema.strict() {
        bail!(BindError::Undefined { kind, name: KString::from_ref(name) })
    }
    trace!("ignoring undefined {kind} {name:?} for schema {:?}", schema.debug_name());
    Ok(())
}

fn resolve_var<'a>(schema: &'a Schema, key: &'a Key<Var>) -> Option<&'a Var> {
    match key {
        // A free Var, or one from another schema, is looked up by
        // name.
        Key::Handle(var) if var.schema_id() == Some(schema.id()) => Some(var),
        Key::Handle(var) => schema.scalar(var.name()),
        Key::Name(name) => schema.scalar(name),
    }
}

fn resolve_tag<'a>(schema: &'a Schema, key: &'a Key<Tag>) -> Result<Option<&'a Tag>> {
    match key {
        Key::Handle(tag) => {
            if tag.parent_id() != schema.id() {
                bail!(BindError::ForeignSubsection { name: tag.name.clone() })
            }
            Ok(Some(tag))
        }
        Key::Name(name) => Ok(schema.subsection(name))
    }
}

/// Apply `args` to `vs`. Row value sets are built from the child
/// schemas, recursively.
pub fn bind_into<'s>(vs: &mut ValueSet<'s>, args: &[BindArg]) -> Result<()> {
    let schema = vs.schema();
    for arg in args {
        match arg {
            BindArg::Scalar { key, value, trust } => {
                match resolve_var(schema, key) {
                    Some(var) => vs.set_scalar_requiring(var, value, *trust)?,
                    None => undefined(schema, "var", arg.name())?
                }
            }
            BindArg::Rows { key, rows } => {
                let tag = match resolve_tag(schema, key)? {
                    Some(tag) => tag,
                    None => {
                        undefined(schema, "subsection", arg.name())?;
                        continue
                    }
                };
                let child = schema.child(tag);
                let mut series = Vec::with_capacity(rows.len());
                for (i, row) in rows.iter().enumerate() {
                    let mut row_vs = child.value_set();
                    bind_into(&mut row_vs, row).with_context(
                        || format!("binding row {}/{} of subsection {:?}",
                                   i + 1, rows.len(), tag.name()))?;
                    series.push(row_vs);
                }
                vs.set_rows(tag, series);
            }
        }
    }
    Ok(())
}

/// A new value set for `schema` with `args` applied. Names that
/// `schema` doesn't declare are an error if it is strict, otherwise
/// they are ignored; see `bind_declaring` for declaring them first.
pub fn bind<'s>(schema: &'s Schema, args: &[BindArg]) -> Result<ValueSet<'s>> {
    let mut vs = schema.value_set();
    bind_into(&mut vs, args)?;
    Ok(vs)
}

/// Declare the names used in `args` in `schema` unless it is strict,
/// then bind them.
pub fn bind_declaring<'s>(schema: &'s mut Schema, args: &[BindArg]) -> Result<ValueSet<'s>> {
    if ! schema.strict() {
        schema.declare_bindings(args)?;
    }
    let schema: &'s Schema = schema;
    bind(schema, args)
}

impl Schema {
    /// Declare every name used in `args`, recursively, so that they
    /// can be bound. This is how a schema can be derived from data
    /// instead of from a template.
    pub fn declare_bindings(&mut self, args: &[BindArg]) -> Result<(), BindError> {
        for arg in args {
            match arg {
                BindArg::Scalar { key: Key::Handle(var), trust, .. } => {
                    self.attach(var, *trust);
                }
                BindArg::Scalar { key: Key::Name(name), trust, .. } => {
                    self.declare_scalar(name, *trust);
                }
                BindArg::Rows { key, rows } => {
                    let name = match key {
                        Key::Handle(tag) => {
                            if tag.parent_id() != self.id() {
                                return Err(BindError::ForeignSubsection {
                                    name: tag.name.clone()
                                })
                            }
                            &tag.name
                        }
                        Key::Name(name) => name,
                    };
                    let (_, child) = self.declare_subsection(name);
                    for row in rows {
                        child.declare_bindings(row)?;
                    }
                }
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::DebugDump;
    use TrustLevel::*;

    fn c(s: &'static str) -> SafeString {
        SafeString::constant(s)
    }

    fn article_args() -> Vec<BindArg> {
        vec![
            BindArg::scalar("title", c("Articles")),
            BindArg::rows("articles", vec![
                vec![
                    BindArg::scalar("title", c("Hello, World!")),
                    BindArg::scalar("author", c("Adam")),
                    BindArg::rows("tags", vec![
                        vec![BindArg::scalar("tag", c("diary"))],
                        vec![BindArg::scalar("tag", c("blog"))],
                    ]),
                ],
                vec![
                    BindArg::scalar("title", c("Recipe for Soup")),
                    BindArg::scalar("author", c("Link's Grandma")),
                    BindArg::rows("tags", vec![
                        vec![BindArg::scalar("tag", c("cooking"))],
                        vec![BindArg::scalar("tag", c("recipes"))],
                    ]),
                ],
            ]),
        ]
    }

    // Binding by name gives the same values as setting them
    // manually via handles.
    #[test]
    fn t_bind_names() {
        let args = article_args();
        let mut implicit = Schema::new();
        implicit.declare_bindings(&args).unwrap();
        let got = bind(&implicit, &args).unwrap();

        let mut m = Schema::new();
        let title = m.declare_scalar("title", Untrusted);
        let (articles, article) = m.declare_subsection("articles");
        let article_title = article.declare_scalar("title", Untrusted);
        let author = article.declare_scalar("author", Untrusted);
        let (tags, tag_schema) = article.declare_subsection("tags");
        let tag = tag_schema.declare_scalar("tag", Untrusted);
        let m = m;
        let article = m.child(&articles);
        let tag_schema = article.child(&tags);

        let tag_row = |s: &'static str| {
            let mut vs = tag_schema.value_set();
            vs.set_const(&tag, s);
            vs
        };
        let mut a1 = article.value_set();
        a1.set_const(&article_title, "Hello, World!");
        a1.set_const(&author, "Adam");
        a1.set_rows(&tags, vec![tag_row("diary"), tag_row("blog")]);
        let mut a2 = article.value_set();
        a2.set_const(&article_title, "Recipe for Soup");
        a2.set_const(&author, "Link's Grandma");
        a2.set_rows(&tags, vec![tag_row("cooking"), tag_row("recipes")]);
        let mut want = m.value_set();
        want.set_const(&title, "Articles");
        want.set_rows(&articles, vec![a1, a2]);

        assert_eq!(got.debug_string(), want.debug_string());
        assert_eq!(implicit.debug_string(), m.debug_string());
    }

    #[test]
    fn t_strict_and_lax() {
        let mut schema = Schema::new();
        schema.declare_scalar("title", Untrusted);
        let args = [BindArg::scalar("title", c("x")),
                    BindArg::scalar("subtitle", c("y")),
                    BindArg::rows("comments", vec![vec![]])];
        {
            let vs = bind(&schema, &args).unwrap();
            assert_eq!(vs.scalar_by_name("title"), Some("x"));
        }

        schema.set_strict(true);
        let err = bind(&schema, &args).unwrap_err();
        match err.downcast_ref::<BindError>() {
            Some(BindError::Undefined { kind, name }) => {
                assert_eq!(*kind, "var");
                assert_eq!(name.as_str(), "subtitle");
            }
            _ => panic!("unexpected error {err:?}")
        }
    }

    #[test]
    fn t_bind_declaring() {
        let mut schema = Schema::new();
        {
            let vs = bind(&schema, &[BindArg::scalar("x", c("1"))]).unwrap();
            assert_eq!(vs.scalar_by_name("x"), None);
        }
        assert_eq!(schema.scalar_count(), 0);

        let args = [BindArg::scalar("x", c("1")),
                    BindArg::rows("items", vec![vec![BindArg::scalar("y", c("2"))]])];
        {
            let vs = bind_declaring(&mut schema, &args).unwrap();
            assert_eq!(vs.scalar_by_name("x"), Some("1"));
        }
        assert_eq!(schema.scalar_count(), 1);
        assert_eq!(schema.subsection_count(), 1);

        let mut strict = Schema::new();
        strict.set_strict(true);
        let err = bind_declaring(&mut strict, &args).unwrap_err();
        assert!(matches!(err.downcast_ref::<BindError>(),
                         Some(BindError::Undefined { .. })));
        assert_eq!(strict.scalar_count(), 0);
    }

    #[test]
    fn t_trust_error_in_row_has_context() {
        let mut schema = Schema::new();
        let (items, item) = schema.declare_subsection("items");
        item.declare_scalar("href", UrlSafe);
        let args = [BindArg::tag_rows(&items, vec![
            vec![BindArg::scalar("href", SafeString::untrusted("/ok"))],
            vec![BindArg::scalar("href", SafeString::untrusted("javascript:x()"))],
        ])];
        let err = bind(&schema, &args).unwrap_err();
        assert!(matches!(err.downcast_ref::<BindError>(), Some(BindError::Trust { .. })));
        assert!(format!("{err:#}").contains("row 2/2 of subsection \"items\""));
    }

    #[test]
    fn t_requiring_raises_trust() {
        let mut schema = Schema::new();
        let v = schema.declare_scalar("data-x", Untrusted);
        let plain = [BindArg::var(&v, SafeString::untrusted("<"))];
        assert_eq!(bind(&schema, &plain).unwrap().get_scalar(&v), "<");
        let raised = [BindArg::var(&v, SafeString::untrusted("<")).requiring(TextSafe)];
        assert_eq!(bind(&schema, &raised).unwrap().get_scalar(&v), "&lt;");
    }

    #[test]
    fn t_free_var_is_looked_up_by_name() {
        let mut schema = Schema::new();
        let v = schema.declare_scalar("name", Untrusted);
        let args = [BindArg::var(&Var::free("name"), c("Jane"))];
        assert_eq!(bind(&schema, &args).unwrap().get_scalar(&v), "Jane");
    }

    #[test]
    fn t_foreign_tag() {
        let mut a = Schema::new();
        let b = Schema::new();
        let (tag, _) = a.declare_subsection("rows");
        let err = bind(&b, &[BindArg::tag_rows(&tag, vec![])]).unwrap_err();
        assert!(matches!(err.downcast_ref::<BindError>(),
                         Some(BindError::ForeignSubsection { .. })));
    }
}
