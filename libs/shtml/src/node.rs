//! The node tree that is the input to the compiler.

use std::{fmt, sync::Arc};

use kstring::KString;
use shtml_bindings::{ValueSet, Var};
use shtml_safe::{SafeString, TrustLevel};

use crate::error::StructuralError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    /// Laid out as part of the surrounding text.
    #[default]
    Inline,
    /// Starts on its own line, contents are indented by one more level
    /// (unless compiling compact).
    Block,
}

/// A string that is either known when compiling, or bound later.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Concrete(SafeString),
    Deferred(Var),
}

impl From<SafeString> for Value {
    fn from(s: SafeString) -> Self {
        Value::Concrete(s)
    }
}

impl From<Var> for Value {
    fn from(v: Var) -> Self {
        Value::Deferred(v)
    }
}

impl From<&Var> for Value {
    fn from(v: &Var) -> Self {
        Value::Deferred(v.clone())
    }
}

/// String literals are constants.
impl From<&'static str> for Value {
    fn from(s: &'static str) -> Self {
        Value::Concrete(SafeString::constant(s))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: KString,
    pub value: Value,
    /// Required in addition to what the attribute name requires.
    pub trust: TrustLevel,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub name: KString,
    pub attributes: Vec<Attribute>,
    pub contents: Vec<Node>,
    pub indent: IndentStyle,
    /// Void element: no contents and no closing tag (`<br>`).
    pub self_closing: bool,
    /// Like `self_closing`, but written XHTML style (`<br/>`).
    pub xml_self_closing: bool,
    /// The first error from applying contents, reported when
    /// compiling.
    pub error: Option<StructuralError>,
}

impl Default for Element {
    fn default() -> Self {
        Element {
            name: KString::from_static(""),
            attributes: Vec::new(),
            contents: Vec::new(),
            indent: IndentStyle::Inline,
            self_closing: false,
            xml_self_closing: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: Value,
    /// Reflow width, overriding `CompileOptions::text_width`; 0 turns
    /// reflowing off.
    pub width: Option<usize>,
}

/// A group of nodes without markup of its own.
#[derive(Debug, Clone, Default)]
pub struct Multi {
    pub contents: Vec<Node>,
    pub error: Option<StructuralError>,
}

/// A part of the page that is repeated for every row bound to the
/// subsection `name`.
#[derive(Debug, Clone)]
pub struct Subsection {
    pub name: KString,
    pub prototype: Box<Node>,
}

/// Decides a `Switch` case from the values being rendered.
#[derive(Clone)]
pub struct Condition(Arc<dyn Fn(&ValueSet<'_>) -> bool + Send + Sync>);

impl Condition {
    pub fn new(f: impl Fn(&ValueSet<'_>) -> bool + Send + Sync + 'static) -> Self {
        Condition(Arc::new(f))
    }

    /// True if the scalar `name` has a non-empty value.
    pub fn is_set(name: &str) -> Self {
        let name = KString::from_ref(name);
        Condition::new(move |vs| vs.scalar_by_name(&name).map_or(false, |s| !s.is_empty()))
    }

    pub fn always() -> Self {
        Condition::new(|_| true)
    }

    pub fn matches(&self, vs: &ValueSet<'_>) -> bool {
        (self.0)(vs)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Condition@{:p}", Arc::as_ptr(&self.0) as *const ())
    }
}

#[derive(Debug, Clone)]
pub struct Case {
    pub condition: Condition,
    /// `None` renders nothing when the case matches.
    pub output: Option<Node>,
}

/// Renders the output of the first case whose condition holds, or
/// the default if none does.
#[derive(Debug, Clone, Default)]
pub struct Switch {
    pub cases: Vec<Case>,
    pub default: Option<Box<Node>>,
}

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(Text),
    /// HTML inserted verbatim, requires `HtmlSafe`.
    Raw(Value),
    Multi(Multi),
    Subsection(Subsection),
    Switch(Switch),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Element(_) => "element",
            Node::Text(_) => "text",
            Node::Raw(_) => "raw",
            Node::Multi(_) => "multi",
            Node::Subsection(_) => "subsection",
            Node::Switch(_) => "switch",
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl From<Text> for Node {
    fn from(t: Text) -> Self {
        Node::Text(t)
    }
}

impl From<Multi> for Node {
    fn from(m: Multi) -> Self {
        Node::Multi(m)
    }
}

impl From<Subsection> for Node {
    fn from(s: Subsection) -> Self {
        Node::Subsection(s)
    }
}

impl From<Switch> for Node {
    fn from(s: Switch) -> Self {
        Node::Switch(s)
    }
}


#[cfg(test)]
mod tests {
    use shtml_bindings::Schema;

    use super::*;

    #[test]
    fn t_condition_is_set() {
        let mut schema = Schema::new();
        let name = schema.declare_scalar("name", TrustLevel::Untrusted);
        let cond = Condition::is_set("name");
        let unknown = Condition::is_set("nope");
        let mut vs = schema.value_set();
        assert!(! cond.matches(&vs));
        vs.set_const(&name, "Jane");
        assert!(cond.matches(&vs));
        assert!(! unknown.matches(&vs));
        assert!(Condition::always().matches(&vs));
    }

    #[test]
    fn t_value_from() {
        assert_eq!(Value::from("x"), Value::Concrete(SafeString::constant("x")));
        let v = Var::free("x");
        assert_eq!(Value::from(&v), Value::Deferred(v));
    }
}
