use std::fmt::Display;

use kstring::KString;

use crate::{error::TrustError, escape, trust::TrustLevel};

/// A string tagged with the trust level it was produced at. Only the
/// `Untrusted` variant is ever escaped; all others either satisfy a
/// requirement as they are or fail it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SafeString {
    /// Part of the program (a literal), trusted in every context.
    Constant(KString),
    Untrusted(KString),
    Html(KString),
    Text(KString),
    Url(KString),
    Attribute(KString),
}

impl SafeString {
    /// Only literals can be constants; use `bless` for strings that
    /// are trusted for other reasons.
    pub fn constant(s: &'static str) -> Self {
        SafeString::Constant(KString::from_static(s))
    }

    pub fn untrusted(s: impl AsRef<str>) -> Self {
        SafeString::Untrusted(KString::from_ref(s.as_ref()))
    }

    /// Entity-encode `s`; never fails.
    pub fn escape_text(s: &str) -> Self {
        SafeString::Text(escape::escape_text(s))
    }

    /// Validate `s` as a URL, or give "about:invalid".
    pub fn escape_url(s: &str) -> Self {
        SafeString::Url(escape::escape_url(s).unwrap_or_else(
            |_| KString::from_static("about:invalid")))
    }

    /// Attribute escaping isn't supported, thus this always gives
    /// "!invalid" for now.
    pub fn escape_attribute(s: &str) -> Self {
        SafeString::Attribute(escape::escape_attribute(s).unwrap_or_else(
            |_| KString::from_static("!invalid")))
    }

    /// HTML escaping isn't supported, thus this always gives a
    /// placeholder fragment for now.
    pub fn escape_html(s: &str) -> Self {
        SafeString::Html(escape::escape_html(s).unwrap_or_else(
            |_| KString::from_static("<b>invalid html</b>")))
    }

    pub fn trust(&self) -> TrustLevel {
        match self {
            SafeString::Constant(_) => TrustLevel::FullyTrusted,
            SafeString::Untrusted(_) => TrustLevel::Untrusted,
            SafeString::Html(_) => TrustLevel::HtmlSafe,
            SafeString::Text(_) => TrustLevel::TextSafe,
            SafeString::Url(_) => TrustLevel::UrlSafe,
            SafeString::Attribute(_) => TrustLevel::AttributeSafe,
        }
    }

    fn kstr(&self) -> &KString {
        match self {
            SafeString::Constant(s) |
            SafeString::Untrusted(s) |
            SafeString::Html(s) |
            SafeString::Text(s) |
            SafeString::Url(s) |
            SafeString::Attribute(s) => s
        }
    }

    /// The unchecked string, for debugging and tests. Use `check` for
    /// output.
    pub fn as_str(&self) -> &str {
        self.kstr().as_str()
    }

    /// Whether the string can be used where `required` trust is
    /// needed, without escaping.
    pub fn satisfies(&self, required: TrustLevel) -> bool {
        use TrustLevel as L;
        match self {
            SafeString::Constant(_) => true,
            SafeString::Untrusted(_) => required == L::Untrusted,
            // An HTML fragment is fine in text context, but not the
            // other way around.
            SafeString::Html(_) =>
                matches!(required, L::Untrusted | L::HtmlSafe | L::TextSafe),
            SafeString::Text(_) => matches!(required, L::Untrusted | L::TextSafe),
            SafeString::Url(_) => matches!(required, L::Untrusted | L::UrlSafe),
            SafeString::Attribute(_) =>
                matches!(required, L::Untrusted | L::AttributeSafe),
        }
    }

    /// Return the string for use where `required` trust is needed,
    /// escaping it if it is untrusted and escaping for that level is
    /// possible.
    pub fn check(&self, required: TrustLevel) -> Result<KString, TrustError> {
        if self.satisfies(required) {
            return Ok(self.kstr().clone())
        }
        match self {
            SafeString::Untrusted(s) => escape::escape(s, required),
            _ => Err(TrustError::Unsatisfied {
                value: self.trust(),
                required,
            })
        }
    }
}

/// Declare `s` as having been validated to `level` by some means
/// outside of this library.
pub fn bless(level: TrustLevel, s: impl AsRef<str>) -> SafeString {
    let s = KString::from_ref(s.as_ref());
    match level {
        TrustLevel::Untrusted => SafeString::Untrusted(s),
        TrustLevel::HtmlSafe => SafeString::Html(s),
        TrustLevel::TextSafe => SafeString::Text(s),
        TrustLevel::UrlSafe => SafeString::Url(s),
        TrustLevel::AttributeSafe => SafeString::Attribute(s),
        TrustLevel::FullyTrusted => SafeString::Constant(s),
    }
}

impl Display for SafeString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self.as_str(), self.trust())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use TrustLevel as L;

    #[test]
    fn t_satisfies() {
        for l in L::ALL {
            assert!(SafeString::constant("x").satisfies(l));
            assert!(bless(l, "x").satisfies(L::Untrusted));
            assert!(bless(l, "x").satisfies(l));
        }
        let html = bless(L::HtmlSafe, "<b>x</b>");
        assert!(html.satisfies(L::TextSafe));
        assert!(! html.satisfies(L::UrlSafe));
        assert!(! html.satisfies(L::FullyTrusted));
        assert!(! bless(L::TextSafe, "x").satisfies(L::HtmlSafe));
        assert!(! bless(L::UrlSafe, "/").satisfies(L::AttributeSafe));
        assert!(! SafeString::untrusted("x").satisfies(L::TextSafe));
    }

    #[test]
    fn t_check_escapes_untrusted_only() {
        let s = SafeString::untrusted("<script>");
        assert_eq!(s.check(L::TextSafe).unwrap().as_str(), "&lt;script&gt;");
        assert_eq!(s.check(L::Untrusted).unwrap().as_str(), "<script>");
        // Trusted strings are passed through as they are.
        assert_eq!(bless(L::HtmlSafe, "<i>x</i>").check(L::TextSafe).unwrap().as_str(),
                   "<i>x</i>");
        assert_eq!(bless(L::TextSafe, "a").check(L::UrlSafe),
                   Err(TrustError::Unsatisfied {
                       value: L::TextSafe,
                       required: L::UrlSafe
                   }));
    }

    #[test]
    fn t_check_attribute() {
        assert!(SafeString::untrusted("main").check(L::AttributeSafe).is_err());
        assert_eq!(bless(L::AttributeSafe, "main").check(L::AttributeSafe).unwrap().as_str(),
                   "main");
    }

    #[test]
    fn t_check_fully_trusted() {
        assert_eq!(SafeString::constant("text/css").check(L::FullyTrusted).unwrap().as_str(),
                   "text/css");
        assert_eq!(bless(L::FullyTrusted, "x"), SafeString::constant("x"));
        for l in L::ALL {
            if l != L::FullyTrusted {
                assert!(bless(l, "x").check(L::FullyTrusted).is_err());
            }
        }
    }

    #[test]
    fn t_fallback_constructors() {
        assert_eq!(SafeString::escape_text("a<b").as_str(), "a&lt;b");
        assert_eq!(SafeString::escape_url("javascript:alert(1)").as_str(),
                   "about:invalid");
        assert_eq!(SafeString::escape_url("/about").as_str(), "/about");
        assert_eq!(SafeString::escape_attribute("x").as_str(), "!invalid");
        assert_eq!(SafeString::escape_html("<p>").trust(), L::HtmlSafe);
    }

    #[test]
    fn t_display() {
        assert_eq!(SafeString::untrusted("hi").to_string(), "\"hi\" (Untrusted)");
    }
}
