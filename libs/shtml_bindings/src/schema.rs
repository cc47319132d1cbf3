use std::{collections::HashMap,
          fmt::Display,
          sync::atomic::{AtomicU32, Ordering}};

use kstring::KString;
use shtml_safe::{TrustLevel, myfrom::{MyFrom, ks}};

use crate::{var::{Var, Tag}, values::ValueSet};

static NEXT_SCHEMA_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a `Schema`, carried by the handles declared on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaId(u32);

impl SchemaId {
    fn fresh() -> Self {
        SchemaId(NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for SchemaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct Nesting {
    parent: SchemaId,
    idx: usize,
    name: KString,
}

#[derive(Debug)]
struct Subsection {
    tag: Tag,
    schema: Box<Schema>,
}

/// The variables and nested subsections of a template. Declarations
/// only ever append, or raise the trust of an existing variable.
///
/// Not `Clone`: handles refer to a schema by identity, a copy would
/// silently be a different schema.
#[derive(Debug)]
pub struct Schema {
    id: SchemaId,
    strict: bool,
    nesting: Option<Nesting>,
    scalars: Vec<Var>,
    scalars_by_name: HashMap<KString, usize>,
    subsections: Vec<Subsection>,
    subsections_by_name: HashMap<KString, usize>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    pub fn new() -> Self {
        Schema {
            id: SchemaId::fresh(),
            strict: false,
            nesting: None,
            scalars: Vec::new(),
            scalars_by_name: HashMap::new(),
            subsections: Vec::new(),
            subsections_by_name: HashMap::new(),
        }
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// If true, bulk binding fails on names that aren't declared,
    /// instead of ignoring them.
    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn is_root(&self) -> bool {
        self.nesting.is_none()
    }

    /// The name of the subsection this schema describes, or "root".
    pub fn debug_name(&self) -> &str {
        match &self.nesting {
            Some(n) => &n.name,
            None => "root",
        }
    }

    /// The id of the parent schema, and the index of this schema's
    /// subsection in it.
    pub fn parent(&self) -> Option<(SchemaId, usize)> {
        self.nesting.as_ref().map(|n| (n.parent, n.idx))
    }

    /// Declare a string variable, or if `name` is already declared,
    /// raise its required trust to the join with `trust`. The slot
    /// index of an existing variable never changes.
    pub fn declare_scalar<T>(&mut self, name: T, trust: TrustLevel) -> Var
        where KString: MyFrom<T>
    {
        let name = ks(name);
        if name.is_empty() {
            panic!("Var name cannot be empty")
        }
        if let Some(&idx) = self.scalars_by_name.get(&name) {
            let var = &mut self.scalars[idx];
            var.trust = var.trust.join(trust);
            return var.clone()
        }
        let idx = self.scalars.len();
        let var = Var { idx, name: name.clone(), trust, schema: Some(self.id) };
        self.scalars.push(var.clone());
        self.scalars_by_name.insert(name, idx);
        var
    }

    /// Declare `var`'s name on this schema, at the join of its trust
    /// and `extra`. `var` may be free or attached to another schema.
    pub fn attach(&mut self, var: &Var, extra: TrustLevel) -> Var {
        self.declare_scalar(&var.name, var.trust.join(extra))
    }

    /// Declare a nested, repeated subsection, or return the existing
    /// one of that name.
    pub fn declare_subsection<T>(&mut self, name: T) -> (Tag, &mut Schema)
        where KString: MyFrom<T>
    {
        let name = ks(name);
        if name.is_empty() {
            panic!("subsection name cannot be empty")
        }
        let idx = match self.subsections_by_name.get(&name) {
            Some(&idx) => idx,
            None => {
                let idx = self.subsections.len();
                let mut schema = Schema::new();
                schema.nesting = Some(Nesting {
                    parent: self.id,
                    idx,
                    name: name.clone()
                });
                let tag = Tag { idx, name: name.clone(), parent: self.id, child: schema.id };
                self.subsections.push(Subsection { tag, schema: Box::new(schema) });
                self.subsections_by_name.insert(name, idx);
                idx
            }
        };
        let sub = &mut self.subsections[idx];
        (sub.tag.clone(), &mut *sub.schema)
    }

    pub fn scalar(&self, name: &str) -> Option<&Var> {
        self.scalars_by_name.get(name).map(|&idx| &self.scalars[idx])
    }

    pub fn subsection(&self, name: &str) -> Option<&Tag> {
        self.subsections_by_name.get(name).map(|&idx| &self.subsections[idx].tag)
    }

    pub fn scalars(&self) -> &[Var] {
        &self.scalars
    }

    pub fn subsections(&self) -> impl Iterator<Item = (&Tag, &Schema)> {
        self.subsections.iter().map(|s| (&s.tag, &*s.schema))
    }

    pub fn scalar_count(&self) -> usize {
        self.scalars.len()
    }

    pub fn subsection_count(&self) -> usize {
        self.subsections.len()
    }

    /// Panics unless `var` is attached to this schema.
    pub(crate) fn check_var(&self, var: &Var, context: &str) {
        match var.schema {
            None => panic!(
                "{var} is unattached, used with {context} (programmer error: \
                 free variables must be attached to a schema)"),
            Some(id) if id != self.id => panic!(
                "{var} is bound to schema {id}, {context} is from schema {} {:?} \
                 (programmer error: variable used in wrong context)",
                self.id, self.debug_name()),
            Some(_) => ()
        }
    }

    /// Panics unless `tag` is a subsection of this schema.
    pub(crate) fn check_tag(&self, tag: &Tag, context: &str) {
        if tag.parent != self.id {
            panic!("{tag} is declared in schema {}, {context} is from schema {} {:?} \
                    (programmer error: subsection used in wrong context)",
                   tag.parent, self.id, self.debug_name())
        }
    }

    /// The schema of the rows of the subsection `tag`.
    pub fn child(&self, tag: &Tag) -> &Schema {
        self.check_tag(tag, "the schema");
        &self.subsections[tag.idx].schema
    }

    pub fn child_mut(&mut self, tag: &Tag) -> &mut Schema {
        self.check_tag(tag, "the schema");
        &mut self.subsections[tag.idx].schema
    }

    /// The current required trust of the slot of `var`.
    pub(crate) fn slot_trust(&self, var: &Var) -> TrustLevel {
        self.scalars[var.idx].trust
    }

    /// A new, empty set of values for this schema.
    pub fn value_set(&self) -> ValueSet<'_> {
        ValueSet::new(self)
    }
}
