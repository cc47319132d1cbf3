//! Trust required for the values of known attributes.

// https://html.spec.whatwg.org/multipage/indices.html#attributes-3

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::trust::TrustLevel::{self, *};

/// Attributes missing here require full trust, except for `data-*`
/// attributes.
const ATTRIBUTE_TRUST: &[(&str, TrustLevel)] = &[
    ("accept", AttributeSafe),
    ("accept-charset", FullyTrusted),
    ("action", UrlSafe),
    ("alt", AttributeSafe),
    ("archive", UrlSafe),
    ("async", FullyTrusted),
    ("autocomplete", AttributeSafe),
    ("autofocus", AttributeSafe),
    ("autoplay", AttributeSafe),
    ("background", UrlSafe),
    ("border", AttributeSafe),
    ("checked", AttributeSafe),
    ("cite", UrlSafe),
    ("challenge", FullyTrusted),
    ("charset", FullyTrusted),
    ("class", AttributeSafe),
    ("classid", UrlSafe),
    ("codebase", UrlSafe),
    ("cols", AttributeSafe),
    ("colspan", AttributeSafe),
    ("content", FullyTrusted),
    ("contenteditable", AttributeSafe),
    ("contextmenu", AttributeSafe),
    ("controls", AttributeSafe),
    ("coords", AttributeSafe),
    ("crossorigin", FullyTrusted),
    ("data", UrlSafe),
    ("datetime", AttributeSafe),
    ("default", AttributeSafe),
    ("defer", FullyTrusted),
    ("dir", AttributeSafe),
    ("dirname", AttributeSafe),
    ("disabled", AttributeSafe),
    ("draggable", AttributeSafe),
    ("dropzone", AttributeSafe),
    ("enctype", FullyTrusted),
    ("for", AttributeSafe),
    ("form", FullyTrusted),
    ("formaction", UrlSafe),
    ("formenctype", FullyTrusted),
    ("formmethod", FullyTrusted),
    ("formnovalidate", FullyTrusted),
    ("formtarget", AttributeSafe),
    ("headers", AttributeSafe),
    ("height", AttributeSafe),
    ("hidden", AttributeSafe),
    ("high", AttributeSafe),
    ("href", UrlSafe),
    ("hreflang", AttributeSafe),
    ("http-equiv", FullyTrusted),
    ("icon", UrlSafe),
    ("id", AttributeSafe),
    ("ismap", AttributeSafe),
    ("keytype", FullyTrusted),
    ("kind", AttributeSafe),
    ("label", AttributeSafe),
    ("lang", AttributeSafe),
    ("language", FullyTrusted),
    ("list", AttributeSafe),
    ("longdesc", UrlSafe),
    ("loop", AttributeSafe),
    ("low", AttributeSafe),
    ("manifest", UrlSafe),
    ("max", AttributeSafe),
    ("maxlength", AttributeSafe),
    ("media", AttributeSafe),
    ("mediagroup", AttributeSafe),
    ("method", FullyTrusted),
    ("min", AttributeSafe),
    ("multiple", AttributeSafe),
    ("name", AttributeSafe),
    ("novalidate", FullyTrusted),
    ("open", AttributeSafe),
    ("optimum", AttributeSafe),
    ("pattern", FullyTrusted),
    ("placeholder", AttributeSafe),
    ("poster", UrlSafe),
    ("profile", UrlSafe),
    ("preload", AttributeSafe),
    ("pubdate", AttributeSafe),
    ("radiogroup", AttributeSafe),
    ("readonly", AttributeSafe),
    ("rel", FullyTrusted),
    ("required", AttributeSafe),
    ("reversed", AttributeSafe),
    ("rows", AttributeSafe),
    ("rowspan", AttributeSafe),
    ("sandbox", FullyTrusted),
    ("spellcheck", AttributeSafe),
    ("scope", AttributeSafe),
    ("scoped", AttributeSafe),
    ("seamless", AttributeSafe),
    ("selected", AttributeSafe),
    ("shape", AttributeSafe),
    ("size", AttributeSafe),
    ("sizes", AttributeSafe),
    ("span", AttributeSafe),
    ("src", UrlSafe),
    ("srcdoc", HtmlSafe),
    ("srclang", AttributeSafe),
    ("srcset", FullyTrusted),
    ("start", AttributeSafe),
    ("step", AttributeSafe),
    ("style", FullyTrusted),
    ("tabindex", AttributeSafe),
    ("target", AttributeSafe),
    ("title", AttributeSafe),
    ("type", FullyTrusted),
    ("usemap", UrlSafe),
    ("value", FullyTrusted),
    ("width", AttributeSafe),
    ("wrap", AttributeSafe),
    ("xmlns", UrlSafe),
];

lazy_static!{
    static ref ATTRIBUTE_TRUST_MAP: HashMap<&'static str, TrustLevel> =
        ATTRIBUTE_TRUST.iter().copied().collect();
}

/// The minimum trust a value must have to be placed into the
/// attribute `name`. Callers can raise this for `data-*` attributes,
/// which default to `Untrusted`.
pub fn required_trust_for_attribute(name: &str) -> TrustLevel {
    if let Some(level) = ATTRIBUTE_TRUST_MAP.get(name) {
        *level
    } else if name.starts_with("data-") {
        Untrusted
    } else {
        FullyTrusted
    }
}
