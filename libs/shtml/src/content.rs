use crate::{error::StructuralError,
            node::{Attribute, Element, IndentStyle, Node, Text, Multi}};

/// Something that can be added to a node: a child node, an attribute,
/// or an option.
#[derive(Debug, Clone)]
pub enum Content {
    Node(Node),
    Attribute(Attribute),
    Indent(IndentStyle),
    SelfClosing,
    /// The element is not HTML: drop defaults derived from its name.
    XmlElement,
    /// Reflow width for a text node.
    Width(usize),
}

impl Content {
    pub fn name(&self) -> &'static str {
        match self {
            Content::Node(_) => "node",
            Content::Attribute(_) => "attribute",
            Content::Indent(_) => "Indent",
            Content::SelfClosing => "SelfClosing",
            Content::XmlElement => "XmlElement",
            Content::Width(_) => "Width",
        }
    }

    pub fn apply(self, target: &mut Node) -> Result<(), StructuralError> {
        let invalid = |option, target: &Node| StructuralError::InvalidOption {
            option,
            node: target.kind()
        };
        let option = self.name();
        match (self, target) {
            (Content::Node(Node::Multi(m)), Node::Multi(target)) => {
                target.contents.extend(m.contents);
                if let Some(e) = m.error {
                    return Err(e)
                }
            }
            (Content::Node(n), Node::Element(e)) => e.contents.push(n),
            (Content::Node(n), Node::Multi(m)) => m.contents.push(n),
            (Content::Node(n), target) => {
                return Err(StructuralError::NotAContainer {
                    node: n.kind(),
                    target: target.kind()
                })
            }
            (Content::Attribute(a), Node::Element(e)) => e.attributes.push(a),
            (Content::Indent(style), Node::Element(e)) => e.indent = style,
            (Content::SelfClosing, Node::Element(e)) => e.self_closing = true,
            (Content::XmlElement, Node::Element(e)) => {
                e.self_closing = false;
                e.xml_self_closing = false;
            }
            (Content::Width(w), Node::Text(t)) => t.width = Some(w),
            (_, target) => return Err(invalid(option, &*target))
        }
        Ok(())
    }
}

/// Apply `contents` in order, keeping the first error for the
/// compiler to report.
pub(crate) fn apply_all(target: &mut Node, contents: impl IntoIterator<Item = Content>)
                        -> Option<StructuralError> {
    let mut first = None;
    for c in contents {
        if let Err(e) = c.apply(target) {
            first.get_or_insert(e);
        }
    }
    first
}

impl From<Node> for Content {
    fn from(n: Node) -> Self {
        Content::Node(n)
    }
}

impl From<Element> for Content {
    fn from(e: Element) -> Self {
        Content::Node(Node::Element(e))
    }
}

impl From<Text> for Content {
    fn from(t: Text) -> Self {
        Content::Node(Node::Text(t))
    }
}

impl From<Multi> for Content {
    fn from(m: Multi) -> Self {
        Content::Node(Node::Multi(m))
    }
}

impl From<Attribute> for Content {
    fn from(a: Attribute) -> Self {
        Content::Attribute(a)
    }
}

impl From<IndentStyle> for Content {
    fn from(style: IndentStyle) -> Self {
        Content::Indent(style)
    }
}

/// A `Vec<Content>` from nodes, attributes and options.
#[macro_export]
macro_rules! contents {
    ($($c:expr),* $(,)?) => {
        vec![$($crate::Content::from($c)),*]
    }
}
