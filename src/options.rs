//! Per-render display options.
//!
//! A render call starts from the stored [`GallerySettings`] and layers the
//! caller's [`GalleryOverrides`] on top (shortcode attributes or block
//! attributes). The result is a [`DisplayOptions`] value that is fixed for
//! the rest of the call.
//!
//! Overrides are sanitized the same way stored values are: numbers are
//! clamped to their bounds, colours must be valid hex, and enum values
//! outside their closed set fall back. An invalid override falls back to the
//! stored setting rather than the stock default, so a typo in one shortcode
//! never silently discards the site-wide configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::HexColor;
use crate::config::{Bounds, COLUMNS_LARGE, COLUMNS_MEDIUM, COLUMNS_SMALL, GAP, GallerySettings};
use crate::library::Id;
use crate::sanitize::{sanitize_key, sanitize_text_field};

/// Rendition used when the caller does not name one.
pub const DEFAULT_IMAGE_SIZE: &str = "large";
/// `rel` used when the caller does not give one.
pub const DEFAULT_LINK_REL: &str = "noopener";

/// Effect applied to a tile's image on hover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverMode {
    #[default]
    Zoom,
    Shadow,
    None,
}

impl HoverMode {
    /// Parse a sanitized key. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "zoom" => Some(Self::Zoom),
            "shadow" => Some(Self::Shadow),
            "none" => Some(Self::None),
            _ => Option::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zoom => "zoom",
            Self::Shadow => "shadow",
            Self::None => "none",
        }
    }

    /// CSS class carried by the grid container.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Zoom => "pog-hover-zoom",
            Self::Shadow => "pog-hover-shadow",
            Self::None => "pog-hover-none",
        }
    }
}

impl fmt::Display for HoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Browsing context for tile links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkTarget {
    #[default]
    SelfTab,
    Blank,
}

impl LinkTarget {
    /// Accepts `_self`/`_blank` and the underscore-less spellings.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "_self" | "self" => Some(Self::SelfTab),
            "_blank" | "blank" => Some(Self::Blank),
            _ => None,
        }
    }

    /// Value of the anchor's `target` attribute.
    pub fn as_attr(self) -> &'static str {
        match self {
            Self::SelfTab => "_self",
            Self::Blank => "_blank",
        }
    }
}

/// Caller-supplied overrides. `None` means "use the stored value".
///
/// Numeric fields hold already-coerced non-negative integers; clamping
/// happens in [`DisplayOptions::resolve`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalleryOverrides {
    /// Explicit image list. Non-empty switches the resolver to explicit mode.
    pub ids: Vec<Id>,
    pub overlay: Option<String>,
    pub background: Option<String>,
    pub columns_small: Option<u64>,
    pub columns_medium: Option<u64>,
    pub columns_large: Option<u64>,
    /// Legacy single column count; seeds any breakpoint not given explicitly.
    pub columns: Option<u64>,
    pub gap: Option<u64>,
    pub hover: Option<String>,
    pub size: Option<String>,
    pub target: Option<String>,
    pub rel: Option<String>,
}

/// Fully-resolved options for one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    pub overlay_color: HexColor,
    pub background_color: HexColor,
    pub columns_small: u8,
    pub columns_medium: u8,
    pub columns_large: u8,
    pub gap: u8,
    pub hover: HoverMode,
    pub image_size: String,
    pub link_target: LinkTarget,
    pub link_rel: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::from_settings(&GallerySettings::default())
    }
}

impl DisplayOptions {
    /// Options equal to the stored settings, with stock link/size defaults.
    pub fn from_settings(settings: &GallerySettings) -> Self {
        Self {
            overlay_color: settings.overlay_color.clone(),
            background_color: settings.background_color.clone(),
            columns_small: settings.columns_sm,
            columns_medium: settings.columns_md,
            columns_large: settings.columns_lg,
            gap: settings.gap,
            hover: settings.hover,
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
            link_target: LinkTarget::default(),
            link_rel: DEFAULT_LINK_REL.to_string(),
        }
    }

    /// Merge `overrides` over `settings`.
    pub fn resolve(settings: &GallerySettings, overrides: &GalleryOverrides) -> Self {
        let base = Self::from_settings(settings);

        let column = |explicit: Option<u64>, bounds: Bounds, stored: u8| {
            explicit
                .or(overrides.columns)
                .map_or(stored, |v| bounds.clamp(v))
        };

        let image_size = overrides
            .size
            .as_deref()
            .map(sanitize_key)
            .filter(|s| !s.is_empty())
            .unwrap_or(base.image_size);

        let link_rel = match overrides.rel.as_deref() {
            Some(rel) => sanitize_text_field(rel),
            None => base.link_rel,
        };

        Self {
            overlay_color: overrides
                .overlay
                .as_deref()
                .and_then(HexColor::parse)
                .unwrap_or(base.overlay_color),
            background_color: overrides
                .background
                .as_deref()
                .and_then(HexColor::parse)
                .unwrap_or(base.background_color),
            columns_small: column(overrides.columns_small, COLUMNS_SMALL, base.columns_small),
            columns_medium: column(overrides.columns_medium, COLUMNS_MEDIUM, base.columns_medium),
            columns_large: column(overrides.columns_large, COLUMNS_LARGE, base.columns_large),
            gap: overrides.gap.map_or(base.gap, |g| GAP.clamp(g)),
            hover: overrides
                .hover
                .as_deref()
                .and_then(|h| HoverMode::from_key(&sanitize_key(h)))
                .unwrap_or(base.hover),
            image_size,
            link_target: overrides
                .target
                .as_deref()
                .and_then(LinkTarget::parse)
                .unwrap_or(base.link_target),
            link_rel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> GallerySettings {
        GallerySettings {
            overlay_color: HexColor::parse("#111111").unwrap(),
            background_color: HexColor::parse("#eeeeee").unwrap(),
            columns_sm: 2,
            columns_md: 4,
            columns_lg: 6,
            gap: 12,
            hover: HoverMode::Shadow,
            images: vec![],
        }
    }

    #[test]
    fn no_overrides_uses_stored_values() {
        let options = DisplayOptions::resolve(&stored(), &GalleryOverrides::default());
        assert_eq!(options.overlay_color.as_str(), "#111111");
        assert_eq!(options.columns_large, 6);
        assert_eq!(options.gap, 12);
        assert_eq!(options.hover, HoverMode::Shadow);
        assert_eq!(options.image_size, "large");
        assert_eq!(options.link_target, LinkTarget::SelfTab);
        assert_eq!(options.link_rel, "noopener");
    }

    #[test]
    fn overrides_win() {
        let overrides = GalleryOverrides {
            overlay: Some("#ff0000".into()),
            background: Some("#00ff00".into()),
            columns_small: Some(1),
            columns_medium: Some(5),
            columns_large: Some(9),
            gap: Some(0),
            hover: Some("none".into()),
            size: Some("thumbnail".into()),
            target: Some("_blank".into()),
            rel: Some("noopener noreferrer".into()),
            ..GalleryOverrides::default()
        };
        let options = DisplayOptions::resolve(&stored(), &overrides);
        assert_eq!(options.overlay_color.as_str(), "#ff0000");
        assert_eq!(options.background_color.as_str(), "#00ff00");
        assert_eq!(
            (options.columns_small, options.columns_medium, options.columns_large),
            (1, 5, 9)
        );
        assert_eq!(options.gap, 0);
        assert_eq!(options.hover, HoverMode::None);
        assert_eq!(options.image_size, "thumbnail");
        assert_eq!(options.link_target, LinkTarget::Blank);
        assert_eq!(options.link_rel, "noopener noreferrer");
    }

    #[test]
    fn invalid_overrides_fall_back_to_stored() {
        let overrides = GalleryOverrides {
            overlay: Some("red".into()),
            hover: Some("spin".into()),
            target: Some("_top".into()),
            size: Some("!!!".into()),
            ..GalleryOverrides::default()
        };
        let options = DisplayOptions::resolve(&stored(), &overrides);
        assert_eq!(options.overlay_color.as_str(), "#111111");
        assert_eq!(options.hover, HoverMode::Shadow);
        assert_eq!(options.link_target, LinkTarget::SelfTab);
        assert_eq!(options.image_size, "large");
    }

    #[test]
    fn numeric_overrides_are_clamped() {
        let overrides = GalleryOverrides {
            columns_small: Some(50),
            columns_medium: Some(0),
            columns_large: Some(13),
            gap: Some(1000),
            ..GalleryOverrides::default()
        };
        let options = DisplayOptions::resolve(&stored(), &overrides);
        assert_eq!(options.columns_small, 8);
        assert_eq!(options.columns_medium, 1);
        assert_eq!(options.columns_large, 12);
        assert_eq!(options.gap, 64);
    }

    #[test]
    fn legacy_columns_seeds_missing_breakpoints() {
        let overrides = GalleryOverrides {
            columns: Some(10),
            columns_small: Some(1),
            ..GalleryOverrides::default()
        };
        let options = DisplayOptions::resolve(&stored(), &overrides);
        assert_eq!(options.columns_small, 1);
        assert_eq!(options.columns_medium, 10);
        assert_eq!(options.columns_large, 10);
    }

    #[test]
    fn rel_is_stripped_of_markup() {
        let overrides = GalleryOverrides {
            rel: Some("<b>nofollow</b>".into()),
            ..GalleryOverrides::default()
        };
        let options = DisplayOptions::resolve(&stored(), &overrides);
        assert_eq!(options.link_rel, "nofollow");
    }

    #[test]
    fn hover_key_is_case_insensitive() {
        assert_eq!(HoverMode::from_key(&sanitize_key("ZOOM")), Some(HoverMode::Zoom));
        assert_eq!(HoverMode::Shadow.css_class(), "pog-hover-shadow");
    }

    #[test]
    fn link_target_spellings() {
        assert_eq!(LinkTarget::parse("blank"), Some(LinkTarget::Blank));
        assert_eq!(LinkTarget::parse("_SELF"), Some(LinkTarget::SelfTab));
        assert_eq!(LinkTarget::parse("_parent"), None);
        assert_eq!(LinkTarget::Blank.as_attr(), "_blank");
    }
}
