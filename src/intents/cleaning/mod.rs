
use fancy_regex::{Captures, Regex};
use std::sync::LazyLock;

static ENTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]{1,31});")
        .expect("valid regex")
});

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:https?://|www\.)\S+").expect("valid regex"));

static DISALLOWED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s']").expect("valid regex"));

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalize user text for keyword matching.
///
/// Unescapes HTML entities, lowercases, removes URLs and every character
/// that is not a word character, whitespace or apostrophe, then collapses
/// whitespace. Applying it twice yields the same result as applying it once.
#[inline]
pub fn clean_text(text: &str) -> String {
    let text = unescape_html(text).to_lowercase();
    let text = URL_REGEX.replace_all(text.trim(), " ");
    let text = DISALLOWED_REGEX.replace_all(&text, "");
    WHITESPACE_REGEX
        .replace_all(&text, " ")
        .trim()
        .to_string()
}

/// Decode named and numeric HTML character references in a single pass.
/// Named references cover the full HTML5 table; unknown names are left
/// untouched.
#[inline]
pub fn unescape_html(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let reference = caps.get(1).map_or("", |m| m.as_str());
            decode_reference(whole, reference).unwrap_or_else(|| whole.to_string())
        })
        .into_owned()
}

fn decode_reference(whole: &str, reference: &str) -> Option<String> {
    if let Some(numeric) = reference.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        // NUL and invalid scalars decode to the replacement character
        let decoded = char::from_u32(code)
            .filter(|&c| c != '\0')
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return Some(decoded.to_string());
    }

    let decoded = html_escape::decode_html_entities(whole);
    (decoded != whole).then(|| decoded.into_owned())
}
