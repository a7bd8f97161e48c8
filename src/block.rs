//! The visual block surface.
//!
//! A block editor saves the gallery as a JSON attribute object and asks the
//! server to render it. Attribute names are camelCase:
//!
//! ```json
//! { "ids": [7, 9], "columnsSm": 1, "columnsMd": 2, "columnsLg": 3,
//!   "gap": 8, "overlay": "#000000", "bg": "#ffffff", "size": "large",
//!   "target": "_self", "rel": "noopener", "hover": "zoom",
//!   "align": "wide", "className": "my-gallery" }
//! ```
//!
//! Editors are loose about types (numbers arrive as strings, ids as a
//! comma-separated string), so every field is read as a raw JSON value and
//! coerced here. A value of the wrong shape is treated as absent.

use serde::Deserialize;
use serde_json::Value;

use crate::library::Id;
use crate::options::GalleryOverrides;
use crate::sanitize::{absint, as_text, sanitize_key};
use crate::shortcode::parse_ids;

/// Block attribute object as sent by the editor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockAttributes {
    pub ids: Option<Value>,
    pub columns_sm: Option<Value>,
    pub columns_md: Option<Value>,
    pub columns_lg: Option<Value>,
    /// Legacy single column count.
    pub columns: Option<Value>,
    pub gap: Option<Value>,
    pub overlay: Option<Value>,
    pub bg: Option<Value>,
    pub size: Option<Value>,
    pub target: Option<Value>,
    pub rel: Option<Value>,
    pub hover: Option<Value>,
    pub align: Option<Value>,
    pub class_name: Option<Value>,
}

impl BlockAttributes {
    /// Read attributes from an arbitrary JSON value.
    ///
    /// Anything other than an object yields empty attributes, which render the
    /// stored gallery.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            tracing::warn!(
                kind = json_kind(value),
                "block attributes are not an object, using defaults"
            );
            return Self::default();
        }
        Self::deserialize(value).unwrap_or_else(|err| {
            tracing::warn!(%err, "unreadable block attributes, using defaults");
            Self::default()
        })
    }

    /// Map attributes onto render overrides. `null` counts as absent.
    pub fn to_overrides(&self) -> GalleryOverrides {
        let present = |v: &Option<Value>| v.as_ref().filter(|v| !v.is_null()).cloned();
        let number = |v: &Option<Value>| present(v).map(|v| absint(&v));
        let text = |v: &Option<Value>| present(v).and_then(|v| as_text(&v));
        GalleryOverrides {
            ids: self.ids.as_ref().map(block_ids).unwrap_or_default(),
            overlay: text(&self.overlay),
            background: text(&self.bg),
            columns_small: number(&self.columns_sm),
            columns_medium: number(&self.columns_md),
            columns_large: number(&self.columns_lg),
            columns: number(&self.columns),
            gap: number(&self.gap),
            hover: text(&self.hover),
            size: text(&self.size),
            target: text(&self.target),
            rel: text(&self.rel),
        }
    }

    /// Extra classes for the grid container: `align<value>` and any custom
    /// `className` tokens, each reduced to safe class characters.
    pub fn container_classes(&self) -> Vec<String> {
        let mut classes = Vec::new();
        if let Some(align) = self.align.as_ref().and_then(as_text) {
            let align = sanitize_key(&align);
            if !align.is_empty() {
                classes.push(format!("align{align}"));
            }
        }
        if let Some(names) = self.class_name.as_ref().and_then(as_text) {
            classes.extend(
                names
                    .split_whitespace()
                    .map(html_class)
                    .filter(|c| !c.is_empty()),
            );
        }
        classes
    }
}

fn block_ids(value: &Value) -> Vec<Id> {
    match value {
        Value::Array(items) => items.iter().map(absint).filter(|&id| id != 0).collect(),
        Value::String(s) => parse_ids(s),
        Value::Number(_) => Some(absint(value)).filter(|&id| id != 0).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn html_class(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
