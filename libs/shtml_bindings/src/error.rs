use kstring::KString;
use shtml_safe::TrustError;

/// Errors from binding values to a schema. Misuse of handles (a `Var`
/// from another schema) is not reported here, it panics.
#[derive(thiserror::Error, Debug)]
pub enum BindError {
    #[error("binding value {name:?}: {source}")]
    Trust {
        name: KString,
        source: TrustError,
    },
    #[error("undefined {kind} {name:?}")]
    Undefined {
        kind: &'static str,
        name: KString,
    },
    #[error("subsection {name:?} is not attached to this schema")]
    ForeignSubsection {
        name: KString,
    },
    #[error("JSON value at {path:?}: {reason}")]
    Json {
        path: String,
        reason: &'static str,
    },
}
