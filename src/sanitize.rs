//! Input coercions for untyped submissions.
//!
//! Admin form posts, shortcode attributes and block attributes all arrive as
//! loosely-typed values: numbers may be strings, flags may be `"1"` or `"on"`,
//! text may carry markup. The helpers here turn those into well-formed values
//! without ever failing. Bad input degrades to a neutral value (`0`, `""`,
//! `false`, `None`) and the caller decides the fallback.

use serde_json::Value;
use url::{ParseError, Url};

/// Coerce a string to a non-negative integer.
///
/// Mirrors the usual "leading integer" rule: optional whitespace, an optional
/// sign, then as many digits as are present. The sign is discarded, so `-5`
/// becomes `5`. Input without leading digits becomes `0`. Values too large
/// for `u64` saturate.
///
/// ```
/// use png_overlay_gallery::sanitize::absint_str;
///
/// assert_eq!(absint_str("12"), 12);
/// assert_eq!(absint_str(" 7px"), 7);
/// assert_eq!(absint_str("-3"), 3);
/// assert_eq!(absint_str("abc"), 0);
/// ```
pub fn absint_str(input: &str) -> u64 {
    let trimmed = input.trim_start();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    let mut value: u64 = 0;
    for c in unsigned.chars() {
        let Some(digit) = c.to_digit(10) else { break };
        value = value.saturating_mul(10).saturating_add(u64::from(digit));
    }
    value
}

/// Coerce any JSON value to a non-negative integer.
///
/// Numbers are truncated toward zero and made non-negative; strings go
/// through [`absint_str`]; `true` is `1`; everything else is `0`.
pub fn absint(value: &Value) -> u64 {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u
            } else if let Some(i) = n.as_i64() {
                i.unsigned_abs()
            } else {
                // Non-finite floats never reach JSON; the cast saturates.
                n.as_f64().map(|f| f.trunc().abs() as u64).unwrap_or(0)
            }
        }
        Value::String(s) => absint_str(s),
        Value::Bool(true) => 1,
        _ => 0,
    }
}

/// Coerce a non-negative integer into `[min, max]`.
pub fn clamp(value: u64, min: u8, max: u8) -> u8 {
    // The clamped value always fits: max is a u8.
    value.clamp(u64::from(min), u64::from(max)) as u8
}

/// Interpret a submitted flag.
///
/// Checkboxes post `"1"` or `"on"` when checked and nothing when unchecked;
/// JSON clients send booleans. Anything that is not clearly "on" is `false`.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        _ => false,
    }
}

/// Read a JSON value as text. Numbers and booleans are stringified so a
/// numeric colour or size key still goes through the same sanitizer.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reduce a string to a lowercase key: ASCII letters, digits, `_` and `-`.
///
/// ```
/// use png_overlay_gallery::sanitize::sanitize_key;
///
/// assert_eq!(sanitize_key(" Zoom! "), "zoom");
/// assert_eq!(sanitize_key("medium_large"), "medium_large");
/// ```
pub fn sanitize_key(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Strip markup and normalise whitespace in a single-line text field.
///
/// Tags are removed (anything between `<` and the next `>`), line breaks and
/// tabs become spaces, runs of whitespace collapse to one space, and the
/// result is trimmed. Entities are left alone; the renderer escapes on output.
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = strip_tags(input);
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove HTML tags. `<script>` and `<style>` lose their contents too.
fn strip_tags(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        result.push_str(&rest[..open]);
        let after = &rest[open..];
        let Some(close) = after.find('>') else {
            // Unterminated tag: drop the remainder.
            rest = "";
            break;
        };
        let tag = after[1..close].trim_start_matches('/').to_ascii_lowercase();
        rest = &after[close + 1..];
        for raw in ["script", "style"] {
            let opens_raw = tag.starts_with(raw) && !after[1..].starts_with('/');
            if opens_raw {
                let end_tag = format!("</{raw}");
                let lower = rest.to_ascii_lowercase();
                rest = match lower.find(&end_tag) {
                    Some(end) => match rest[end..].find('>') {
                        Some(gt) => &rest[end + gt + 1..],
                        None => "",
                    },
                    None => "",
                };
            }
        }
    }
    result.push_str(rest);
    result
}

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "ftp", "ftps"];

/// Clean a URL for storage.
///
/// Returns an empty string when the URL is empty, malformed, or uses a
/// scheme outside `http`, `https`, `mailto`, `tel`, `ftp` and `ftps` (so
/// `javascript:` and `data:` links are discarded). Whitespace, control
/// characters, quotes and angle brackets are removed. Relative URLs
/// (`/shop/x`, `#top`, `?q=1`) are kept; a bare host like `example.com/x`
/// gets `http://` prepended. Anything before a `:` counts as a scheme, so a
/// host with a port needs its own `http://`.
///
/// ```
/// use png_overlay_gallery::sanitize::sanitize_url;
///
/// assert_eq!(sanitize_url("https://example.com/x"), "https://example.com/x");
/// assert_eq!(sanitize_url("javascript:alert(1)"), "");
/// assert_eq!(sanitize_url("example.com"), "http://example.com");
/// ```
pub fn sanitize_url(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| {
            !c.is_whitespace() && !c.is_control() && !matches!(c, '"' | '\'' | '<' | '>' | '`')
        })
        .collect();
    if cleaned.is_empty() {
        return String::new();
    }

    match Url::parse(&cleaned) {
        Ok(url) if ALLOWED_SCHEMES.contains(&url.scheme()) => cleaned,
        Ok(_) => String::new(),
        Err(ParseError::RelativeUrlWithoutBase) => {
            if cleaned.starts_with(['/', '#', '?', '.']) {
                return cleaned;
            }
            let absolute = format!("http://{cleaned}");
            if Url::parse(&absolute).is_ok() {
                absolute
            } else {
                String::new()
            }
        }
        Err(_) => String::new(),
    }
}
