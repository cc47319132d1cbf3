//! Escaping of untrusted strings into the contexts where that is
//! possible.

use kstring::KString;
use lazy_static::lazy_static;
use url::Url;

use crate::{error::TrustError, trust::TrustLevel};

/// Schemes an untrusted URL may carry; "" is a relative URL.
pub const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto", "ftp", ""];

lazy_static!{
    // Only used to check that a relative URL is well-formed.
    static ref RELATIVE_BASE: Url = Url::parse("http://relative.invalid/")
        .expect("constant base URL is valid");
}

/// Append `s` to `out`, entity-encoding the characters significant
/// in HTML text and quoted attribute values.
pub fn html_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c)
        }
    }
}

pub fn escape_text(s: &str) -> KString {
    let mut out = String::with_capacity(s.len());
    html_escape_into(&mut out, s);
    KString::from_string(out)
}

/// Validates `s` as a URL with an allowed scheme. The result is
/// entity-encoded so that it can't end the attribute it is placed in.
pub fn escape_url(s: &str) -> Result<KString, TrustError> {
    match Url::parse(s) {
        Ok(url) => {
            let scheme = url.scheme();
            if ALLOWED_URL_SCHEMES.contains(&scheme) {
                Ok(escape_text(url.as_str()))
            } else {
                Err(TrustError::ForbiddenScheme(scheme.into()))
            }
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::options()
                .base_url(Some(&*RELATIVE_BASE))
                .parse(s)
                .map_err(|e| TrustError::InvalidUrl(format!("{s:?}: {e}")))?;
            Ok(escape_text(s))
        }
        Err(e) => Err(TrustError::InvalidUrl(format!("{s:?}: {e}")))
    }
}

/// Escaping arbitrary HTML fragments safely would need a sanitizer,
/// which we don't have.
pub fn escape_html(_s: &str) -> Result<KString, TrustError> {
    Err(TrustError::HtmlEscapeUnsupported)
}

/// There is no escaping that is safe for every attribute.
pub fn escape_attribute(_s: &str) -> Result<KString, TrustError> {
    Err(TrustError::AttributeEscapeUnsupported)
}

/// Escape an untrusted string for the `required` context.
pub fn escape(s: &str, required: TrustLevel) -> Result<KString, TrustError> {
    match required {
        TrustLevel::Untrusted => Ok(KString::from_ref(s)),
        TrustLevel::HtmlSafe => escape_html(s),
        TrustLevel::TextSafe => Ok(escape_text(s)),
        TrustLevel::UrlSafe => escape_url(s),
        TrustLevel::AttributeSafe => escape_attribute(s),
        TrustLevel::FullyTrusted => Err(TrustError::Unsatisfied {
            value: TrustLevel::Untrusted,
            required,
        }),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_escape_text() {
        assert_eq!(escape_text("<p>Foo!</p>").as_str(), "&lt;p&gt;Foo!&lt;/p&gt;");
        assert_eq!(escape_text("There's \"a\" & b").as_str(),
                   "There&#39;s &quot;a&quot; &amp; b");
        assert_eq!(escape_text("plain").as_str(), "plain");
    }

    #[test]
    fn t_escape_url() {
        assert_eq!(escape_url("http://google.com/").unwrap().as_str(), "http://google.com/");
        assert_eq!(escape_url("/articles").unwrap().as_str(), "/articles");
        assert_eq!(escape_url("mailto:adam@example.com").unwrap().as_str(),
                   "mailto:adam@example.com");
        assert_eq!(escape_url("https://example.com/?a=1&b=2").unwrap().as_str(),
                   "https://example.com/?a=1&amp;b=2");
        assert_eq!(escape_url("?x=\"y\"").unwrap().as_str(), "?x=&quot;y&quot;");
    }

    #[test]
    fn t_escape_url_rejects() {
        assert!(matches!(escape_url("http://\" href=\"evil.com"),
                         Err(TrustError::InvalidUrl(_))));
        assert_eq!(escape_url("ssh://adam@foo.local"),
                   Err(TrustError::ForbiddenScheme("ssh".into())));
        assert_eq!(escape_url("javascript:alert(1)"),
                   Err(TrustError::ForbiddenScheme("javascript".into())));
        assert_eq!(escape_url(" JavaScript:alert(1)"),
                   Err(TrustError::ForbiddenScheme("javascript".into())));
        assert!(escape_url("http://[::1").is_err());
    }

    #[test]
    fn t_escape_html_and_attribute_fail_closed() {
        assert_eq!(escape_html("<b>hi</b>"), Err(TrustError::HtmlEscapeUnsupported));
        assert_eq!(escape_attribute("x"), Err(TrustError::AttributeEscapeUnsupported));
        assert_eq!(escape("x", TrustLevel::HtmlSafe), Err(TrustError::HtmlEscapeUnsupported));
        assert!(escape("x", TrustLevel::FullyTrusted).is_err());
    }
}
