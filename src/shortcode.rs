//! The `[png_overlay_gallery]` embed macro.
//!
//! Authors place the macro anywhere in content text:
//!
//! ```text
//! [png_overlay_gallery]
//! [png_overlay_gallery ids="7,9" gap=4 hover='shadow' cols_lg="6" target="_blank"]
//! ```
//!
//! | Attribute | Meaning |
//! |-----------|---------|
//! | `ids` | comma/space separated image ids; replaces the stored list |
//! | `gap` | grid gap in px (0–64) |
//! | `overlay`, `bg` | overlay and tile background colours |
//! | `size` | rendition name (`thumbnail`, `medium`, `large`, `full`, …) |
//! | `target`, `rel` | link attributes |
//! | `hover` | `zoom`, `shadow` or `none` |
//! | `cols_sm`, `cols_md`, `cols_lg` | columns per breakpoint |
//! | `columns` | legacy: seeds any breakpoint not given |
//!
//! Values may be double-quoted, single-quoted or bare. Attribute names are
//! case-insensitive and unknown ones are ignored. A doubled bracket
//! (`[[png_overlay_gallery]]`) is an escape and renders the macro text
//! literally. A closing `[/png_overlay_gallery]` tag is removed; any text
//! between the tags is left in place.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::library::Id;
use crate::options::GalleryOverrides;
use crate::sanitize::absint_str;

fn regex(pattern: &'static str, desc: &'static str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid {desc} regex: {err}"))
}

fn shortcode_regex() -> &'static Regex {
    static SHORTCODE: OnceLock<Regex> = OnceLock::new();
    SHORTCODE.get_or_init(|| {
        regex(
            r"\[(\[?)(/?)png_overlay_gallery((?:[\s\x{200B}/][^\]]*)?)\](\]?)",
            "shortcode",
        )
    })
}

fn attr_regex() -> &'static Regex {
    static ATTR: OnceLock<Regex> = OnceLock::new();
    ATTR.get_or_init(|| {
        regex(
            r#"([\w-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s'"]+))"#,
            "shortcode attribute",
        )
    })
}

/// Parsed attributes of one macro occurrence. Keys are lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcodeAttrs {
    values: BTreeMap<String, String>,
}

impl ShortcodeAttrs {
    /// Parse the attribute text between the tag name and the closing bracket.
    ///
    /// ```
    /// use png_overlay_gallery::shortcode::ShortcodeAttrs;
    ///
    /// let attrs = ShortcodeAttrs::parse(r#"ids="7,9" GAP=4 hover='none'"#);
    /// assert_eq!(attrs.get("ids"), Some("7,9"));
    /// assert_eq!(attrs.get("gap"), Some("4"));
    /// assert_eq!(attrs.get("hover"), Some("none"));
    /// ```
    pub fn parse(text: &str) -> Self {
        // Non-breaking spaces pasted from rich editors separate attributes too.
        let text = text.replace(['\u{00a0}', '\u{200b}'], " ");
        let values = attr_regex()
            .captures_iter(&text)
            .filter_map(|caps| {
                let key = caps.get(1)?.as_str().to_ascii_lowercase();
                let value = [2, 3, 4]
                    .iter()
                    .find_map(|&i| caps.get(i))
                    .map_or("", |m| m.as_str());
                Some((key, value.to_string()))
            })
            .collect();
        Self { values }
    }

    /// Parse a complete macro such as `[png_overlay_gallery gap=4]`.
    ///
    /// Returns `None` when `text` does not contain the macro.
    pub fn parse_tag(text: &str) -> Option<Self> {
        let caps = shortcode_regex().captures(text)?;
        if !caps[2].is_empty() {
            return None;
        }
        Some(Self::parse(caps[3].trim_end_matches('/')))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Map attributes onto render overrides.
    pub fn to_overrides(&self) -> GalleryOverrides {
        let text = |key: &str| self.get(key).map(str::to_string);
        let number = |key: &str| self.get(key).map(absint_str);
        GalleryOverrides {
            ids: self.get("ids").map(parse_ids).unwrap_or_default(),
            overlay: text("overlay"),
            background: text("bg"),
            columns_small: number("cols_sm"),
            columns_medium: number("cols_md"),
            columns_large: number("cols_lg"),
            columns: number("columns"),
            gap: number("gap"),
            hover: text("hover"),
            size: text("size"),
            target: text("target"),
            rel: text("rel"),
        }
    }
}

/// Parse an id list such as `"7, 9 12"`. Zero and non-numeric ids are dropped.
pub fn parse_ids(input: &str) -> Vec<Id> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(absint_str)
        .filter(|&id| id != 0)
        .collect()
}

/// Replace every macro occurrence in `content` with `render`'s output.
///
/// Text outside the macro is copied through untouched. The first error from
/// `render` aborts expansion.
pub fn expand_shortcodes<F, E>(content: &str, mut render: F) -> Result<String, E>
where
    F: FnMut(&ShortcodeAttrs) -> Result<String, E>,
{
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for caps in shortcode_regex().captures_iter(content) {
        let (Some(whole), Some(open), Some(close)) = (caps.get(0), caps.get(1), caps.get(4))
        else {
            continue;
        };
        out.push_str(&content[last..whole.start()]);
        last = whole.end();

        let escaped = !open.as_str().is_empty() && !close.as_str().is_empty();
        if escaped {
            out.push_str(&content[open.start()..close.start()]);
            continue;
        }

        out.push_str(open.as_str());
        let is_closing_tag = !caps[2].is_empty();
        if !is_closing_tag {
            let attrs = ShortcodeAttrs::parse(caps[3].trim_end_matches('/'));
            out.push_str(&render(&attrs)?);
        }
        out.push_str(close.as_str());
    }
    out.push_str(&content[last..]);
    Ok(out)
}
