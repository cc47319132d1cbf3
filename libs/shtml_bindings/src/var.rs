use std::fmt::Display;

use kstring::KString;
use shtml_safe::{TrustLevel, myfrom::{MyFrom, ks}};

use crate::schema::SchemaId;

/// A handle to a string variable in a `Schema`: its slot index, and
/// the trust level it was declared with. A free `Var` has a name
/// only, and has to be attached to a schema (`Schema::attach`) before
/// values can be set or read through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    pub(crate) idx: usize,
    pub(crate) name: KString,
    pub(crate) trust: TrustLevel,
    pub(crate) schema: Option<SchemaId>,
}

impl Var {
    /// A placeholder `Var` that isn't in any schema yet; it is
    /// attached when compiling the template using it.
    pub fn free<T>(name: T) -> Self
        where KString: MyFrom<T>
    {
        let name = ks(name);
        if name.is_empty() {
            panic!("Var name cannot be empty")
        }
        Var { idx: 0, name, trust: TrustLevel::Untrusted, schema: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The trust level at the time this handle was handed out. The
    /// schema may have raised it since, by further declarations.
    pub fn trust(&self) -> TrustLevel {
        self.trust
    }

    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn is_attached(&self) -> bool {
        self.schema.is_some()
    }

    pub fn schema_id(&self) -> Option<SchemaId> {
        self.schema
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.schema {
            Some(id) => write!(f, "Var{{{}, {:?}, {}, schema {id}}}",
                               self.idx, self.name.as_str(), self.trust),
            None => write!(f, "Var{{free, {:?}}}", self.name.as_str()),
        }
    }
}

/// A handle to a nested, repeated subsection of a `Schema`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub(crate) idx: usize,
    pub(crate) name: KString,
    /// The schema the subsection is declared in.
    pub(crate) parent: SchemaId,
    /// The schema of the subsection's rows.
    pub(crate) child: SchemaId,
}

impl Tag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn parent_id(&self) -> SchemaId {
        self.parent
    }

    pub fn child_id(&self) -> SchemaId {
        self.child
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag{{{}, {:?}, schema {} in {}}}",
               self.idx, self.name.as_str(), self.child, self.parent)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_free() {
        let v = Var::free("title");
        assert!(! v.is_attached());
        assert_eq!(v.name(), "title");
        assert_eq!(v.trust(), TrustLevel::Untrusted);
        assert_eq!(v.to_string(), "Var{free, \"title\"}");
    }

    #[test]
    #[should_panic(expected = "Var name cannot be empty")]
    fn t_free_empty_name() {
        Var::free("");
    }
}
