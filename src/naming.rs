//! Filename parsing for the media directory.
//!
//! Media files follow the `NNN-name[@size].ext` convention:
//!
//! - `NNN` is the asset id. Files without a numeric prefix (or with id 0) are
//!   not assets.
//! - `name` becomes the display title, dashes converted to spaces. It is the
//!   alt text unless a sidecar provides one.
//! - `@size` marks a named rendition of the asset with the same base name.
//!   A file without it is the original (`full`).
//!
//! ```text
//! 007-Red-Widget.png          → id 7, original, title "Red Widget"
//! 007-Red-Widget@large.png    → id 7, rendition "large"
//! 012.png                     → id 12, original, no title
//! logo.png                    → not an asset
//! ```

use crate::library::Id;
use crate::sanitize::sanitize_key;

/// Result of parsing a media filename like `007-Red-Widget@large.png`.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaName {
    /// Id prefix, if present and non-zero.
    pub id: Option<Id>,
    /// Filename without rendition suffix and extension (`007-Red-Widget`).
    /// Originals and renditions of one asset share it.
    pub base: String,
    /// Rendition name from an `@size` suffix, lowercased.
    pub size: Option<String>,
    /// Name part with dashes converted to spaces. Empty if id-only.
    pub display_title: String,
    /// Extension without the dot, as written. Empty if none.
    pub extension: String,
}

/// Parse a media filename.
///
/// - `"007-Red-Widget.png"` → id=Some(7), base="007-Red-Widget", size=None, display_title="Red Widget"
/// - `"007-Red-Widget@Large.png"` → id=Some(7), size=Some("large")
/// - `"012.png"` → id=Some(12), display_title=""
/// - `"wip-sketch.png"` → id=None, display_title="wip sketch"
/// - `"000-zero.png"` → id=None
pub fn parse_media_name(file_name: &str) -> MediaName {
    let (stem, extension) = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (file_name, ""),
    };

    let (base, size) = match stem.rsplit_once('@') {
        Some((base, size)) if !base.is_empty() => {
            let size = sanitize_key(size);
            (base, Some(size).filter(|s| !s.is_empty()))
        }
        _ => (stem, None),
    };

    let (id, name) = split_id(base);
    MediaName {
        id: id.filter(|&id| id != 0),
        base: base.to_string(),
        size,
        display_title: name.replace('-', " ").trim().to_string(),
        extension: extension.to_string(),
    }
}

fn split_id(base: &str) -> (Option<Id>, &str) {
    // Numeric prefix before the first dash
    if let Some((prefix, rest)) = base.split_once('-')
        && let Ok(id) = prefix.parse::<Id>()
    {
        return (Some(id), rest);
    }
    // Whole base is a number
    if let Ok(id) = base.parse::<Id>() {
        return (Some(id), "");
    }
    (None, base)
}
