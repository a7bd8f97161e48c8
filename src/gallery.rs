//! Composition root.
//!
//! [`Gallery`] wires the settings store, the asset library and the optional
//! product catalogue into the entry points:
//!
//! | Entry point | Input | Output |
//! |-------------|-------|--------|
//! | [`Gallery::save`] | admin submission | normalized record, persisted |
//! | [`Gallery::settings`] | stored record | re-validated record |
//! | [`Gallery::render`] | overrides | grid markup |
//! | [`Gallery::render_shortcode`] | shortcode attributes | grid markup |
//! | [`Gallery::expand`] | content with shortcodes | content with markup |
//! | [`Gallery::render_block`] | block attributes | grid markup |
//!
//! Every render reads the stored record once, merges the caller's overrides,
//! resolves items and tiles, then serializes. Nothing is cached between calls.

use maud::Markup;
use serde_json::Value;
use thiserror::Error;

use crate::block::BlockAttributes;
use crate::config::{GallerySettings, Normalized, normalize};
use crate::library::{AssetStore, Library, ProductCatalog};
use crate::options::{DisplayOptions, GalleryOverrides};
use crate::render::render_gallery_with_classes;
use crate::resolve::{ItemSource, resolve_items, resolve_tiles};
use crate::shortcode::{ShortcodeAttrs, expand_shortcodes};
use crate::store::{OPTION_KEY, SettingsStore, StoreError};

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Settings store error: {0}")]
    Store(#[from] StoreError),
}

pub struct Gallery<'a> {
    store: &'a dyn SettingsStore,
    assets: &'a dyn AssetStore,
    catalog: Option<&'a dyn ProductCatalog>,
}

impl<'a> Gallery<'a> {
    pub fn new(
        store: &'a dyn SettingsStore,
        assets: &'a dyn AssetStore,
        catalog: Option<&'a dyn ProductCatalog>,
    ) -> Self {
        Self {
            store,
            assets,
            catalog,
        }
    }

    /// Use a [`Library`] as both asset store and, when it has products,
    /// product catalogue.
    pub fn with_library(store: &'a dyn SettingsStore, library: &'a Library) -> Self {
        Self::new(store, library, library.catalog())
    }

    /// Validate a submission and replace the stored record with the result.
    pub fn save(&self, submission: &Value) -> Result<Normalized, GalleryError> {
        let normalized = normalize(submission, self.assets, self.catalog);
        self.store
            .save(OPTION_KEY, &normalized.settings.to_value())?;
        tracing::debug!(
            images = normalized.settings.images.len(),
            rejected = normalized.rejected.len(),
            truncated = normalized.truncated,
            "saved gallery settings"
        );
        Ok(normalized)
    }

    /// The stored record, re-validated against the current assets.
    ///
    /// Nothing stored yields defaults. An unreadable record is logged and
    /// also yields defaults; other store failures are errors.
    pub fn settings(&self) -> Result<GallerySettings, GalleryError> {
        match self.store.load(OPTION_KEY) {
            Ok(Some(stored)) => Ok(normalize(&stored, self.assets, self.catalog).settings),
            Ok(None) => Ok(GallerySettings::default()),
            Err(StoreError::Json(err)) => {
                tracing::warn!(%err, "stored gallery settings are corrupt, using defaults");
                Ok(GallerySettings::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Render the gallery with `overrides` merged over the stored settings.
    pub fn render(
        &self,
        overrides: &GalleryOverrides,
        extra_classes: &[String],
    ) -> Result<Markup, GalleryError> {
        let settings = self.settings()?;
        Ok(self.render_with(&settings, overrides, extra_classes))
    }

    pub fn render_shortcode(&self, attrs: &ShortcodeAttrs) -> Result<Markup, GalleryError> {
        self.render(&attrs.to_overrides(), &[])
    }

    /// Replace every shortcode in `content` with gallery markup.
    pub fn expand(&self, content: &str) -> Result<String, GalleryError> {
        let settings = self.settings()?;
        expand_shortcodes(content, |attrs| {
            Ok::<_, GalleryError>(
                self.render_with(&settings, &attrs.to_overrides(), &[])
                    .into_string(),
            )
        })
    }

    pub fn render_block(&self, attrs: &BlockAttributes) -> Result<Markup, GalleryError> {
        self.render(&attrs.to_overrides(), &attrs.container_classes())
    }

    fn render_with(
        &self,
        settings: &GallerySettings,
        overrides: &GalleryOverrides,
        extra_classes: &[String],
    ) -> Markup {
        let options = DisplayOptions::resolve(settings, overrides);
        let source = ItemSource::choose(&overrides.ids, &settings.images);
        let items = resolve_items(source, self.assets);
        let tiles = resolve_tiles(&items, &options, self.assets, self.catalog);
        render_gallery_with_classes(&tiles, &options, extra_classes)
    }
}
