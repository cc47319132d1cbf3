use crate::trust::TrustLevel;

/// A string could not be provided at the trust level a context
/// requires.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TrustError {
    #[error("{value} string cannot provide trust level {required}")]
    Unsatisfied {
        value: TrustLevel,
        required: TrustLevel,
    },
    #[error("HTML fragments must currently be supplied trusted, they are never escaped")]
    HtmlEscapeUnsupported,
    #[error("attribute values must currently be supplied trusted, they are never escaped")]
    AttributeEscapeUnsupported,
    #[error("invalid URL {0}")]
    InvalidUrl(String),
    #[error("URL scheme not allowed: {0:?}")]
    ForbiddenScheme(String),
    #[error("unknown trust level {0:?}")]
    UnknownLevel(String),
}
