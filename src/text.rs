//! Text cleanup helpers
//!
//! Mirrors the host CMS rules for what counts as "plain text": tag
//! stripping for indexed content, field sanitization for query input, and
//! escaping for anything interpolated into markup or a terminal.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*?>.*?</script\s*>").expect("valid regex"));
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*?>.*?</style\s*>").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t ]+").expect("valid regex"));
static PERCENT_OCTET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("valid regex"));

/// Remove all markup, including the bodies of `<script>` and `<style>`
/// elements, and trim the result. Line breaks inside the text survive.
pub fn strip_all_tags(text: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(text, "");
    let text = STYLE_BLOCK.replace_all(&text, "");
    let text = TAG.replace_all(&text, "");
    text.trim().to_string()
}

/// Reduce user-supplied text to a single clean line.
///
/// Strips tags, collapses every run of whitespace (including line breaks
/// and tabs) to one space, drops percent-encoded octets and trims.
pub fn sanitize_text_field(text: &str) -> String {
    let stripped = if text.contains('<') {
        strip_all_tags(text)
    } else {
        text.to_string()
    };
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");

    // Removing one octet can expose another (`%%4141`), so repeat until stable
    let mut cleaned = collapsed.into_owned();
    while PERCENT_OCTET.is_match(&cleaned) {
        cleaned = PERCENT_OCTET.replace_all(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make text safe to print on a terminal verbatim.
///
/// Control characters (escape sequences in particular) are shown in their
/// escaped form instead of being interpreted. Newlines are kept.
pub fn literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() && c != '\n' {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}
