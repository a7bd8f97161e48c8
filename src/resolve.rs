//! Item and tile resolution.
//!
//! Rendering a gallery is two passes over a flat list:
//!
//! ```text
//! caller ids / stored images ──resolve_items──▶ Vec<ImageEntry>
//!                                                    │
//!                        DisplayOptions ─────────────┤
//!                                                    ▼
//!                                     resolve_tiles ──▶ Vec<TileDescriptor>
//! ```
//!
//! Both passes drop entries instead of failing. An entry whose asset was
//! deleted, is not a PNG, or lacks the requested rendition simply contributes
//! no tile; the entries after it still render.
//!
//! ## Link resolution
//!
//! The first match wins:
//!
//! 1. `product_id` set, commerce active, product published → product permalink
//! 2. non-empty `link_url` → that URL
//! 3. no link; the tile renders as a plain block
//!
//! ## Tinting
//!
//! A tile is tinted only when `recolor_enabled` is set **and** the entry has a
//! foreground colour. A tinted tile draws a solid layer of that colour masked
//! by the image's alpha channel instead of the image itself. An untinted tile
//! draws the image over the overlay colour, which shows through transparent
//! pixels.

use crate::color::HexColor;
use crate::config::ImageEntry;
use crate::library::{AssetStore, Id, ProductCatalog};
use crate::options::DisplayOptions;

/// Where the items of a render come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource<'a> {
    /// Caller-supplied ids. Stored per-image metadata is not used.
    Explicit(&'a [Id]),
    /// The stored image list, verbatim.
    Stored(&'a [ImageEntry]),
}

impl<'a> ItemSource<'a> {
    /// Explicit mode when `ids` is non-empty, otherwise the stored list.
    pub fn choose(ids: &'a [Id], stored: &'a [ImageEntry]) -> Self {
        if ids.is_empty() {
            Self::Stored(stored)
        } else {
            Self::Explicit(ids)
        }
    }
}

/// Turn the caller's intent into an ordered list of entries.
///
/// Ids that do not currently resolve to a PNG are dropped in both modes.
pub fn resolve_items(source: ItemSource<'_>, assets: &dyn AssetStore) -> Vec<ImageEntry> {
    let items: Vec<ImageEntry> = match source {
        ItemSource::Explicit(ids) => ids
            .iter()
            .map(|&id| ImageEntry {
                id,
                ..ImageEntry::default()
            })
            .collect(),
        ItemSource::Stored(entries) => entries.to_vec(),
    };
    items
        .into_iter()
        .filter(|entry| {
            let keep = assets.is_png(entry.id);
            if !keep {
                tracing::debug!(id = entry.id, "skipping item: not an existing PNG");
            }
            keep
        })
        .collect()
}

/// Everything the serializer needs to draw one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileDescriptor {
    pub id: Id,
    pub source_url: String,
    pub alt_text: String,
    pub href: Option<String>,
    pub background: HexColor,
    /// Set when the tile is drawn as a tinted silhouette.
    pub tint: Option<HexColor>,
    pub label: Option<String>,
}

impl TileDescriptor {
    /// Whether the original raster is replaced by a tinted mask.
    pub fn uses_tint(&self) -> bool {
        self.tint.is_some()
    }
}

/// Resolve one entry. `None` when the requested rendition has no URL.
pub fn resolve_tile(
    entry: &ImageEntry,
    options: &DisplayOptions,
    assets: &dyn AssetStore,
    catalog: Option<&dyn ProductCatalog>,
) -> Option<TileDescriptor> {
    let Some(source_url) = assets.image_url(entry.id, &options.image_size) else {
        tracing::debug!(
            id = entry.id,
            size = %options.image_size,
            "skipping tile: rendition has no URL"
        );
        return None;
    };

    Some(TileDescriptor {
        id: entry.id,
        source_url: source_url.to_string(),
        alt_text: assets.alt_text(entry.id).unwrap_or_default().to_string(),
        href: resolve_href(entry, catalog),
        background: entry
            .background_color
            .clone()
            .unwrap_or_else(|| options.background_color.clone()),
        tint: entry
            .foreground_color
            .clone()
            .filter(|_| entry.recolor_enabled),
        label: entry.label.clone().filter(|l| !l.is_empty()),
    })
}

/// Link for an entry, by priority: published product, explicit URL, none.
pub fn resolve_href(entry: &ImageEntry, catalog: Option<&dyn ProductCatalog>) -> Option<String> {
    if let (Some(product_id), Some(catalog)) = (entry.product_id, catalog) {
        match catalog.published_permalink(product_id) {
            Some(permalink) => return Some(permalink.to_string()),
            None => tracing::debug!(product_id, "product not published, falling back to URL"),
        }
    }
    entry.link_url.clone().filter(|url| !url.is_empty())
}

/// Resolve every entry in order, skipping those without a usable rendition.
pub fn resolve_tiles(
    items: &[ImageEntry],
    options: &DisplayOptions,
    assets: &dyn AssetStore,
    catalog: Option<&dyn ProductCatalog>,
) -> Vec<TileDescriptor> {
    items
        .iter()
        .filter_map(|entry| resolve_tile(entry, options, assets, catalog))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{Library, ProductStatus};
    use crate::test_helpers::*;

    fn options() -> DisplayOptions {
        DisplayOptions::default()
    }

    fn tile(entry: &ImageEntry, library: &Library) -> TileDescriptor {
        resolve_tile(entry, &options(), library, library.catalog()).unwrap()
    }

    // =========================================================================
    // Item resolution
    // =========================================================================

    #[test]
    fn explicit_ids_drop_non_png() {
        let library = fixture_library();
        let ids = [PNG_ID, JPEG_ID];
        let items = resolve_items(ItemSource::Explicit(&ids), &library);
        assert_eq!(items, vec![entry(PNG_ID)]);
    }

    #[test]
    fn explicit_ids_ignore_stored_metadata() {
        let library = fixture_library();
        let stored = vec![ImageEntry {
            id: PNG_ID,
            link_url: Some("https://example.com".into()),
            label: Some("Stored".into()),
            ..ImageEntry::default()
        }];
        let ids = [PNG_ID];
        let items = resolve_items(ItemSource::choose(&ids, &stored), &library);
        assert_eq!(items, vec![entry(PNG_ID)]);
    }

    #[test]
    fn empty_ids_use_stored_list() {
        let library = fixture_library();
        let stored = vec![
            ImageEntry {
                id: SECOND_PNG_ID,
                label: Some("second".into()),
                ..ImageEntry::default()
            },
            entry(MISSING_ID),
            entry(PNG_ID),
        ];
        let items = resolve_items(ItemSource::choose(&[], &stored), &library);
        let ids: Vec<Id> = items.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![SECOND_PNG_ID, PNG_ID]);
        assert_eq!(items[0].label.as_deref(), Some("second"));
    }

    #[test]
    fn choose_picks_mode_from_ids() {
        let stored = vec![entry(PNG_ID)];
        let ids = [SECOND_PNG_ID];
        assert_eq!(ItemSource::choose(&ids, &stored), ItemSource::Explicit(&ids));
        assert_eq!(ItemSource::choose(&[], &stored), ItemSource::Stored(&stored));
        assert_ne!(ItemSource::choose(&[], &stored), ItemSource::Stored(&[]));
    }

    #[test]
    fn explicit_order_preserved() {
        let library = fixture_library();
        let ids = [SECOND_PNG_ID, PNG_ID, SECOND_PNG_ID];
        let items = resolve_items(ItemSource::Explicit(&ids), &library);
        let got: Vec<Id> = items.iter().map(|e| e.id).collect();
        assert_eq!(got, ids.to_vec());
    }

    // =========================================================================
    // Link resolution
    // =========================================================================

    #[test]
    fn published_product_beats_url() {
        let library = fixture_library();
        let e = ImageEntry {
            id: PNG_ID,
            product_id: Some(PUBLISHED_PRODUCT),
            link_url: Some("https://example.com".into()),
            ..ImageEntry::default()
        };
        assert_eq!(tile(&e, &library).href.as_deref(), Some("/shop/widget"));
    }

    #[test]
    fn draft_product_falls_back_to_url() {
        let library = fixture_library();
        let e = ImageEntry {
            id: PNG_ID,
            product_id: Some(DRAFT_PRODUCT),
            link_url: Some("https://example.com/x".into()),
            ..ImageEntry::default()
        };
        assert_eq!(tile(&e, &library).href.as_deref(), Some("https://example.com/x"));
    }

    #[test]
    fn product_ignored_without_commerce() {
        let library = fixture_library_without_commerce();
        let e = ImageEntry {
            id: PNG_ID,
            product_id: Some(PUBLISHED_PRODUCT),
            ..ImageEntry::default()
        };
        assert_eq!(tile(&e, &library).href, None);
    }

    #[test]
    fn missing_product_and_no_url_has_no_link() {
        let library = fixture_library();
        let e = ImageEntry {
            id: PNG_ID,
            product_id: Some(12345),
            ..ImageEntry::default()
        };
        assert_eq!(tile(&e, &library).href, None);
    }

    #[test]
    fn product_status_change_is_picked_up() {
        let mut library = fixture_library_without_commerce();
        library
            .insert_product(product(77, ProductStatus::Trash, "/shop/gone"))
            .unwrap();
        let e = ImageEntry {
            id: PNG_ID,
            product_id: Some(77),
            ..ImageEntry::default()
        };
        assert_eq!(tile(&e, &library).href, None);
    }

    // =========================================================================
    // Colours and tint
    // =========================================================================

    #[test]
    fn background_override_or_default() {
        let library = fixture_library();
        assert_eq!(tile(&entry(PNG_ID), &library).background.as_str(), "#ffffff");
        let e = ImageEntry {
            id: PNG_ID,
            background_color: HexColor::parse("#222222"),
            ..ImageEntry::default()
        };
        assert_eq!(tile(&e, &library).background.as_str(), "#222222");
    }

    #[test]
    fn tint_requires_flag_and_color() {
        let library = fixture_library();
        let tinted = ImageEntry {
            id: PNG_ID,
            recolor_enabled: true,
            foreground_color: HexColor::parse("#ff0000"),
            ..ImageEntry::default()
        };
        let t = tile(&tinted, &library);
        assert!(t.uses_tint());
        assert_eq!(t.tint.as_ref().map(HexColor::as_str), Some("#ff0000"));

        let flag_only = ImageEntry {
            foreground_color: None,
            ..tinted.clone()
        };
        assert!(!tile(&flag_only, &library).uses_tint());

        let color_only = ImageEntry {
            recolor_enabled: false,
            ..tinted
        };
        assert!(!tile(&color_only, &library).uses_tint());
    }

    #[test]
    fn label_and_alt_passed_through() {
        let library = fixture_library();
        let e = ImageEntry {
            id: PNG_ID,
            label: Some("Buy <now>".into()),
            ..ImageEntry::default()
        };
        let t = tile(&e, &library);
        assert_eq!(t.label.as_deref(), Some("Buy <now>"));
        assert_eq!(t.alt_text, "Red widget");
        assert_eq!(t.source_url, "/media/7-large.png");
    }

    #[test]
    fn empty_label_is_none() {
        let library = fixture_library();
        let e = ImageEntry {
            id: PNG_ID,
            label: Some(String::new()),
            ..ImageEntry::default()
        };
        assert_eq!(tile(&e, &library).label, None);
    }

    // =========================================================================
    // Missing renditions
    // =========================================================================

    #[test]
    fn missing_rendition_skips_only_that_tile() {
        let library = fixture_library();
        let items = vec![entry(PNG_ID), entry(FULL_ONLY_ID), entry(SECOND_PNG_ID)];
        let tiles = resolve_tiles(&items, &options(), &library, library.catalog());
        let ids: Vec<Id> = tiles.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![PNG_ID, SECOND_PNG_ID]);
    }

    #[test]
    fn full_size_resolves_everything() {
        let library = fixture_library();
        let opts = DisplayOptions {
            image_size: "full".into(),
            ..options()
        };
        let items = vec![entry(PNG_ID), entry(FULL_ONLY_ID)];
        let tiles = resolve_tiles(&items, &opts, &library, library.catalog());
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[1].source_url, "/media/10.png");
    }

    #[test]
    fn repeated_plain_ids_render_identically() {
        let library = fixture_library();
        let items = vec![entry(PNG_ID), entry(PNG_ID)];
        let tiles = resolve_tiles(&items, &options(), &library, library.catalog());
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0], tiles[1]);
    }

    #[test]
    fn repeated_ids_with_metadata_resolve_separately() {
        let library = fixture_library();
        let items = vec![
            entry(PNG_ID),
            ImageEntry {
                id: PNG_ID,
                label: Some("second".into()),
                ..ImageEntry::default()
            },
        ];
        let tiles = resolve_tiles(&items, &options(), &library, library.catalog());
        assert_eq!(tiles[0].label, None);
        assert_eq!(tiles[1].label.as_deref(), Some("second"));
    }
}
