//! Media and product lookups.
//!
//! The gallery never owns images or products; it asks two collaborators about
//! them at validation and render time:
//!
//! - [`AssetStore`]: MIME type, alt text and per-size URLs for an image id.
//! - [`ProductCatalog`]: publish status and permalink for a product id. Only
//!   present when a commerce backend is configured.
//!
//! [`Library`] implements both from a `library.toml` file (or from a media
//! directory walk, see [`crate::scan`]):
//!
//! ```toml
//! [[assets]]
//! id = 7
//! mime = "image/png"
//! alt = "Red widget"
//!
//! [assets.sizes]
//! full = "/media/007-widget.png"
//! large = "/media/007-widget@large.png"
//!
//! [[products]]
//! id = 42
//! status = "publish"
//! permalink = "/shop/widget"
//! title = "Widget"
//! ```
//!
//! The commerce collaborator is active when the `products` key is present,
//! even if the list is empty.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Attachment / product identifier. `0` means "none".
pub type Id = u64;

/// The only MIME type the gallery accepts.
pub const PNG_MIME: &str = "image/png";

/// Size key that always refers to the original upload.
pub const FULL_SIZE: &str = "full";

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Duplicate asset id {0}")]
    DuplicateAsset(Id),
    #[error("Duplicate product id {0}")]
    DuplicateProduct(Id),
}

/// Read access to uploaded media.
pub trait AssetStore {
    /// MIME type of the asset, or `None` if it does not exist.
    fn mime_type(&self, id: Id) -> Option<&str>;

    /// Alt text recorded for the asset.
    fn alt_text(&self, id: Id) -> Option<&str>;

    /// URL of the named size variant, or `None` if the asset or the variant
    /// is missing.
    fn image_url(&self, id: Id, size: &str) -> Option<&str>;

    /// Whether `id` refers to an existing PNG.
    fn is_png(&self, id: Id) -> bool {
        id != 0 && self.mime_type(id) == Some(PNG_MIME)
    }
}

/// Product publish state. Only [`ProductStatus::Publish`] produces links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Publish,
    Draft,
    Pending,
    Private,
    Future,
    Trash,
    #[serde(other)]
    Unknown,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Private => "private",
            Self::Future => "future",
            Self::Trash => "trash",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub status: ProductStatus,
    pub permalink: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
}

impl Product {
    pub fn is_published(&self) -> bool {
        self.status == ProductStatus::Publish
    }
}

/// Read access to a commerce product catalogue.
pub trait ProductCatalog {
    fn product(&self, id: Id) -> Option<&Product>;

    /// Permalink of a published product. Drafts, trashed and missing
    /// products yield `None`.
    fn published_permalink(&self, id: Id) -> Option<&str> {
        self.product(id)
            .filter(|p| p.is_published())
            .map(|p| p.permalink.as_str())
    }
}

/// A single uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Id,
    pub mime: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alt: String,
    /// Size name → URL. `full` is the original.
    #[serde(default)]
    pub sizes: BTreeMap<String, String>,
}

/// On-disk shape of `library.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LibraryFile {
    #[serde(default)]
    assets: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    products: Option<Vec<Product>>,
}

/// In-memory asset store and optional product catalogue.
#[derive(Debug, Default, Clone)]
pub struct Library {
    assets: BTreeMap<Id, Asset>,
    products: Option<BTreeMap<Id, Product>>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library from asset and product lists.
    ///
    /// `products: None` leaves the commerce collaborator inactive.
    pub fn from_parts(
        assets: Vec<Asset>,
        products: Option<Vec<Product>>,
    ) -> Result<Self, LibraryError> {
        let mut library = Self::new();
        for asset in assets {
            library.insert_asset(asset)?;
        }
        if let Some(products) = products {
            library.enable_commerce();
            for product in products {
                library.insert_product(product)?;
            }
        }
        Ok(library)
    }

    /// Parse a `library.toml` document.
    pub fn from_toml_str(content: &str) -> Result<Self, LibraryError> {
        let file: LibraryFile = toml::from_str(content)?;
        Self::from_parts(file.assets, file.products)
    }

    /// Load `library.toml` from disk. A missing file yields an empty library.
    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no library file, starting empty");
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, LibraryError> {
        let file = LibraryFile {
            assets: self.assets.values().cloned().collect(),
            products: self
                .products
                .as_ref()
                .map(|p| p.values().cloned().collect()),
        };
        Ok(toml::to_string_pretty(&file)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), LibraryError> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn insert_asset(&mut self, asset: Asset) -> Result<(), LibraryError> {
        if self.assets.contains_key(&asset.id) {
            return Err(LibraryError::DuplicateAsset(asset.id));
        }
        self.assets.insert(asset.id, asset);
        Ok(())
    }

    /// Activate the commerce collaborator with an empty catalogue.
    pub fn enable_commerce(&mut self) {
        self.products.get_or_insert_with(BTreeMap::new);
    }

    /// Add a product, activating commerce if it was not already.
    pub fn insert_product(&mut self, product: Product) -> Result<(), LibraryError> {
        let products = self.products.get_or_insert_with(BTreeMap::new);
        if products.contains_key(&product.id) {
            return Err(LibraryError::DuplicateProduct(product.id));
        }
        products.insert(product.id, product);
        Ok(())
    }

    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().flat_map(|p| p.values())
    }

    /// The product catalogue, when commerce is active.
    pub fn catalog(&self) -> Option<&dyn ProductCatalog> {
        self.products.as_ref().map(|_| self as &dyn ProductCatalog)
    }
}

impl AssetStore for Library {
    fn mime_type(&self, id: Id) -> Option<&str> {
        self.assets.get(&id).map(|a| a.mime.as_str())
    }

    fn alt_text(&self, id: Id) -> Option<&str> {
        self.assets
            .get(&id)
            .map(|a| a.alt.as_str())
            .filter(|alt| !alt.is_empty())
    }

    fn image_url(&self, id: Id, size: &str) -> Option<&str> {
        self.assets
            .get(&id)?
            .sizes
            .get(size)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }
}

impl ProductCatalog for Library {
    fn product(&self, id: Id) -> Option<&Product> {
        self.products.as_ref()?.get(&id)
    }
}

/// Returns a fully-commented stock `library.toml`.
///
/// Used by the `gen-library` CLI command.
pub fn stock_library_toml() -> &'static str {
    r##"# PNG Overlay Gallery media library
# =================================
# Lists the images (and optionally the products) the gallery may reference.
# Regenerate the asset list from a media directory with `pog scan <dir>`.

# ---------------------------------------------------------------------------
# Assets
# ---------------------------------------------------------------------------
# Only assets whose mime is exactly "image/png" can appear in a gallery.
# `sizes` maps a rendition name to its URL; "full" is the original upload.
# A gallery rendered with a size the asset lacks skips that asset.

[[assets]]
id = 7
mime = "image/png"
alt = "Red widget"

[assets.sizes]
full = "/media/007-red-widget.png"
large = "/media/007-red-widget@large.png"
thumbnail = "/media/007-red-widget@thumbnail.png"

# ---------------------------------------------------------------------------
# Products (optional)
# ---------------------------------------------------------------------------
# Declaring `products` (even as an empty list: `products = []`) enables
# product links. Only products with status "publish" are linked; others fall
# back to the image's own URL.

[[products]]
id = 42
status = "publish"
permalink = "/shop/red-widget"
title = "Red Widget"
"##
}
