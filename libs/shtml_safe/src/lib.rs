//! Trust levels, and strings tagged with the trust level they were
//! produced at.

//! Every string that ends up in generated HTML has to pass
//! `SafeString::check` for the trust level its context requires
//! (text, attribute, URL, HTML fragment). Only untrusted strings are
//! ever escaped, and only for contexts where escaping is known to be
//! safe; everything else has to be supplied pre-trusted.

pub mod trust;
pub mod error;
pub mod escape;
pub mod string;
pub mod meta;
pub mod myfrom;

pub use trust::TrustLevel;
pub use error::TrustError;
pub use string::{SafeString, bless};
pub use meta::required_trust_for_attribute;
