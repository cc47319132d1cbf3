use kstring::KString;

/// Malformed node trees. Reported when compiling.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("self-closing element <{0}> cannot have contents")]
    SelfClosingWithContents(KString),
    #[error("{option} option cannot be applied to {node} node")]
    InvalidOption {
        option: &'static str,
        node: &'static str,
    },
    #[error("{node} node can only be added to element or multi nodes, not to {target} node")]
    NotAContainer {
        node: &'static str,
        target: &'static str,
    },
    #[error("invalid {kind} name {name:?}")]
    InvalidName {
        kind: &'static str,
        name: KString,
    },
}
