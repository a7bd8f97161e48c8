//! Gallery settings record and its validator.
//!
//! The gallery keeps a single persisted record: global display defaults plus
//! the ordered list of images. Every write goes through [`normalize`], which
//! turns an untyped submission (an admin form post decoded to JSON) into a
//! well-formed [`GallerySettings`].
//!
//! ## Stored Shape
//!
//! ```json
//! {
//!   "overlay_color": "#000000",
//!   "background_color": "#ffffff",
//!   "columns_sm": 2,
//!   "columns_md": 3,
//!   "columns_lg": 4,
//!   "gap": 10,
//!   "hover": "zoom",
//!   "images": [
//!     { "id": 7, "url": "https://example.com/x", "product_id": 42,
//!       "fg": "#ff0000", "bg": "#ffffff", "recolor": true, "label": "Widget" }
//!   ]
//! }
//! ```
//!
//! Optional image fields are omitted when empty.
//!
//! ## Validation Rules
//!
//! | Field | Rule | Fallback |
//! |-------|------|----------|
//! | colours | `#` + 3 or 6 hex digits | `#000000` overlay, `#ffffff` background |
//! | `columns_sm` | integer, clamped to 1–8 | 2 |
//! | `columns_md`, `columns_lg` | integer, clamped to 1–12 | 3, 4 |
//! | `gap` | integer, clamped to 0–64 | 10 |
//! | `hover` | `zoom`, `shadow` or `none` | `zoom` |
//! | `images[].id` | non-zero, must be an existing PNG | row dropped |
//! | `images[].url` | http(s)/mailto/tel/ftp or relative | omitted |
//! | `images[].product_id` | kept only when commerce is active | omitted |
//! | `images[].fg`, `bg` | hex colour | omitted |
//! | `images[].recolor` | truthy flag | `false` |
//! | `images[].label` | markup stripped, whitespace collapsed | omitted |
//!
//! At most [`MAX_IMAGES`] rows survive; the rest are truncated in order.
//!
//! Validation never fails. Rejected rows and the truncation count come back in
//! [`Normalized`] so callers can report them.
//!
//! ## Legacy `columns`
//!
//! Older records carry a single `columns` count instead of the three
//! breakpoint fields. When present, it seeds every breakpoint field the input
//! does not set (clamped to that breakpoint's bounds). The normalized record
//! never contains `columns`, so re-validating is a no-op.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::color::HexColor;
use crate::library::{AssetStore, Id, ProductCatalog};
use crate::options::HoverMode;
use crate::sanitize::{
    absint, as_text, clamp, sanitize_key, sanitize_text_field, sanitize_url, truthy,
};

/// Maximum number of stored images.
pub const MAX_IMAGES: usize = 600;

/// Inclusive bounds and default for a numeric setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u8,
    pub max: u8,
    pub default: u8,
}

impl Bounds {
    pub fn clamp(self, value: u64) -> u8 {
        clamp(value, self.min, self.max)
    }
}

/// Columns below 640px.
pub const COLUMNS_SMALL: Bounds = Bounds { min: 1, max: 8, default: 2 };
/// Columns from 640px to 1023px.
pub const COLUMNS_MEDIUM: Bounds = Bounds { min: 1, max: 12, default: 3 };
/// Columns from 1024px.
pub const COLUMNS_LARGE: Bounds = Bounds { min: 1, max: 12, default: 4 };
/// Grid gap in pixels.
pub const GAP: Bounds = Bounds { min: 0, max: 64, default: 10 };

/// One stored gallery image. Order in [`GallerySettings::images`] is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub id: Id,
    #[serde(rename = "url", default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Id>,
    #[serde(rename = "fg", default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<HexColor>,
    #[serde(rename = "bg", default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<HexColor>,
    #[serde(rename = "recolor", default)]
    pub recolor_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The persisted gallery record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GallerySettings {
    /// Fill behind transparent pixels when a tile is not tinted.
    pub overlay_color: HexColor,
    /// Tile background when an image has no override.
    pub background_color: HexColor,
    pub columns_sm: u8,
    pub columns_md: u8,
    pub columns_lg: u8,
    pub gap: u8,
    pub hover: HoverMode,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            overlay_color: HexColor::black(),
            background_color: HexColor::white(),
            columns_sm: COLUMNS_SMALL.default,
            columns_md: COLUMNS_MEDIUM.default,
            columns_lg: COLUMNS_LARGE.default,
            gap: GAP.default,
            hover: HoverMode::default(),
            images: Vec::new(),
        }
    }
}

impl GallerySettings {
    /// Serialize to the stored JSON shape.
    pub fn to_value(&self) -> Value {
        // Every field serializes to plain JSON; this cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Why a submitted image row was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// No id, a zero id, or a row that is not an object.
    MissingId,
    /// The id does not refer to an existing asset.
    NotFound,
    /// The asset exists but is not a PNG.
    NotPng(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => f.write_str("missing id"),
            Self::NotFound => f.write_str("asset not found"),
            Self::NotPng(mime) => write!(f, "not a PNG ({mime})"),
        }
    }
}

/// A dropped row: its position in the submission, its id, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub index: usize,
    pub id: Id,
    pub reason: RejectReason,
}

/// Result of [`normalize`]: the clean record, possibly smaller than the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub settings: GallerySettings,
    pub rejected: Vec<RejectedRow>,
    /// Valid rows discarded past [`MAX_IMAGES`].
    pub truncated: usize,
}

/// Validate an untyped submission into a settings record.
///
/// `catalog` is the product catalogue when commerce is active; without it,
/// submitted `product_id`s are discarded.
pub fn normalize(
    input: &Value,
    assets: &dyn AssetStore,
    catalog: Option<&dyn ProductCatalog>,
) -> Normalized {
    let empty = Map::new();
    let fields = input.as_object().unwrap_or(&empty);
    let field = |key: &str| fields.get(key).filter(|v| !v.is_null());

    let color = |key: &str, fallback: HexColor| {
        field(key)
            .and_then(as_text)
            .and_then(|s| HexColor::parse(&s))
            .unwrap_or(fallback)
    };

    let number = |value: Option<&Value>, bounds: Bounds| {
        value.map_or(bounds.default, |v| bounds.clamp(absint(v)))
    };
    // Legacy single `columns` seeds whichever breakpoints are missing.
    let columns = |key: &str, bounds: Bounds| number(field(key).or(field("columns")), bounds);

    let hover = field("hover")
        .and_then(as_text)
        .and_then(|s| HoverMode::from_key(&sanitize_key(&s)))
        .unwrap_or_default();

    let mut rejected = Vec::new();
    let mut images = Vec::new();
    for (index, row) in image_rows(field("images")).into_iter().enumerate() {
        match normalize_row(row, assets, catalog.is_some()) {
            Ok(entry) => images.push(entry),
            Err((id, reason)) => {
                tracing::debug!(index, id, %reason, "dropping gallery image row");
                rejected.push(RejectedRow { index, id, reason });
            }
        }
    }

    let truncated = images.len().saturating_sub(MAX_IMAGES);
    if truncated > 0 {
        tracing::warn!(truncated, max = MAX_IMAGES, "gallery image list truncated");
        images.truncate(MAX_IMAGES);
    }

    Normalized {
        settings: GallerySettings {
            overlay_color: color("overlay_color", HexColor::black()),
            background_color: color("background_color", HexColor::white()),
            columns_sm: columns("columns_sm", COLUMNS_SMALL),
            columns_md: columns("columns_md", COLUMNS_MEDIUM),
            columns_lg: columns("columns_lg", COLUMNS_LARGE),
            gap: number(field("gap"), GAP),
            hover,
            images,
        },
        rejected,
        truncated,
    }
}

/// Rows arrive either as an array or, from indexed form fields
/// (`images[0][id]`), as an object keyed by position. Object rows are
/// ordered by their numeric key.
fn image_rows(images: Option<&Value>) -> Vec<&Value> {
    match images {
        Some(Value::Array(rows)) => rows.iter().collect(),
        Some(Value::Object(rows)) => {
            let mut keyed: Vec<(&String, &Value)> = rows.iter().collect();
            keyed.sort_by(|(a, _), (b, _)| {
                let na = a.parse::<u64>().unwrap_or(u64::MAX);
                let nb = b.parse::<u64>().unwrap_or(u64::MAX);
                na.cmp(&nb).then_with(|| a.cmp(b))
            });
            keyed.into_iter().map(|(_, v)| v).collect()
        }
        _ => Vec::new(),
    }
}

fn normalize_row(
    row: &Value,
    assets: &dyn AssetStore,
    commerce_active: bool,
) -> Result<ImageEntry, (Id, RejectReason)> {
    let Some(fields) = row.as_object() else {
        return Err((0, RejectReason::MissingId));
    };
    let text = |key: &str| fields.get(key).and_then(as_text);

    let id = fields.get("id").map_or(0, absint);
    if id == 0 {
        return Err((0, RejectReason::MissingId));
    }
    match assets.mime_type(id) {
        None => return Err((id, RejectReason::NotFound)),
        Some(mime) if !assets.is_png(id) => {
            return Err((id, RejectReason::NotPng(mime.to_string())));
        }
        Some(_) => {}
    }

    let product_id = fields
        .get("product_id")
        .map(absint)
        .filter(|pid| commerce_active && *pid != 0);

    Ok(ImageEntry {
        id,
        link_url: text("url")
            .map(|u| sanitize_url(&u))
            .filter(|u| !u.is_empty()),
        product_id,
        foreground_color: text("fg").and_then(|c| HexColor::parse(&c)),
        background_color: text("bg").and_then(|c| HexColor::parse(&c)),
        recolor_enabled: fields.get("recolor").is_some_and(truthy),
        label: text("label")
            .map(|l| sanitize_text_field(&l))
            .filter(|l| !l.is_empty()),
    })
}
