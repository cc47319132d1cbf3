use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TrustError;

/// How much validation a string has received, by its origin or
/// construction. The declaration order is not significant (this is
/// not a total order), except that `Untrusted` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrustLevel {
    /// Must not appear in the page without escaping.
    #[default]
    Untrusted,
    /// Safe to insert as HTML.
    HtmlSafe,
    /// Safe to insert as text (no HTML tags present).
    TextSafe,
    /// Safe to insert into URL attributes (such as href).
    UrlSafe,
    /// Safe to insert into most attributes.
    AttributeSafe,
    /// Assumed, by origin, safe in any context.
    FullyTrusted,
}

impl TrustLevel {
    pub const ALL: [TrustLevel; 6] = [
        TrustLevel::Untrusted,
        TrustLevel::HtmlSafe,
        TrustLevel::TextSafe,
        TrustLevel::UrlSafe,
        TrustLevel::AttributeSafe,
        TrustLevel::FullyTrusted,
    ];

    /// The weakest level satisfying both requirements. Two distinct
    /// requirements other than `Untrusted` can only be reconciled by
    /// requiring full trust.
    pub fn join(self, other: TrustLevel) -> TrustLevel {
        if self == other {
            self
        } else if self == TrustLevel::Untrusted {
            other
        } else if other == TrustLevel::Untrusted {
            self
        } else {
            TrustLevel::FullyTrusted
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrustLevel::Untrusted => "Untrusted",
            TrustLevel::HtmlSafe => "HTMLSafe",
            TrustLevel::TextSafe => "TextSafe",
            TrustLevel::UrlSafe => "URLSafe",
            TrustLevel::AttributeSafe => "AttributeSafe",
            TrustLevel::FullyTrusted => "FullyTrusted",
        }
    }
}

impl Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrustLevel {
    type Err = TrustError;

    /// Accepts the `Display` names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrustLevel::ALL.into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TrustError::UnknownLevel(s.into()))
    }
}
