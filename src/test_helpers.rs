//! Shared test utilities for the gallery test suite.
//!
//! Provides a fixture [`Library`] with a known mix of PNG, non-PNG, missing
//! and partially-sized assets plus published and draft products, and small
//! builders for entries and submissions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let library = fixture_library();
//! let entry = entry(PNG_ID);
//! assert!(library.is_png(entry.id));
//! ```

use serde_json::{Value, json};

use crate::config::ImageEntry;
use crate::library::{Asset, Id, Library, PNG_MIME, Product, ProductStatus};

// =========================================================================
// Fixture ids
// =========================================================================

/// PNG with `full` and `large` renditions, alt "Red widget".
pub const PNG_ID: Id = 7;
/// PNG with `full` and `large` renditions, alt "Blue gadget".
pub const SECOND_PNG_ID: Id = 8;
/// JPEG: exists, but never allowed in a gallery.
pub const JPEG_ID: Id = 9;
/// PNG with only the `full` rendition.
pub const FULL_ONLY_ID: Id = 10;
/// Not in the library at all.
pub const MISSING_ID: Id = 404;

pub const PUBLISHED_PRODUCT: Id = 42;
pub const DRAFT_PRODUCT: Id = 43;

// =========================================================================
// Builders
// =========================================================================

pub fn png_asset(id: Id, alt: &str, sizes: &[(&str, &str)]) -> Asset {
    Asset {
        id,
        mime: PNG_MIME.to_string(),
        alt: alt.to_string(),
        sizes: sizes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

pub fn product(id: Id, status: ProductStatus, permalink: &str) -> Product {
    Product {
        id,
        status,
        permalink: permalink.to_string(),
        title: format!("Product {id}"),
    }
}

/// Library with commerce active.
pub fn fixture_library() -> Library {
    let assets = vec![
        png_asset(
            PNG_ID,
            "Red widget",
            &[("full", "/media/7.png"), ("large", "/media/7-large.png")],
        ),
        png_asset(
            SECOND_PNG_ID,
            "Blue gadget",
            &[("full", "/media/8.png"), ("large", "/media/8-large.png")],
        ),
        Asset {
            id: JPEG_ID,
            mime: "image/jpeg".to_string(),
            alt: "A photo".to_string(),
            sizes: [("large".to_string(), "/media/9-large.jpg".to_string())]
                .into_iter()
                .collect(),
        },
        png_asset(FULL_ONLY_ID, "Outline", &[("full", "/media/10.png")]),
    ];
    let products = vec![
        product(PUBLISHED_PRODUCT, ProductStatus::Publish, "/shop/widget"),
        product(DRAFT_PRODUCT, ProductStatus::Draft, "/shop/draft"),
    ];
    Library::from_parts(assets, Some(products)).unwrap()
}

/// Same assets as [`fixture_library`], commerce inactive.
pub fn fixture_library_without_commerce() -> Library {
    let full = fixture_library();
    Library::from_parts(full.assets().cloned().collect(), None).unwrap()
}

/// An entry with only an id set.
pub fn entry(id: Id) -> ImageEntry {
    ImageEntry {
        id,
        ..ImageEntry::default()
    }
}

/// An admin submission row with only an id.
pub fn row(id: Id) -> Value {
    json!({ "id": id })
}

/// A submission containing `count` copies of a valid PNG row, each labelled
/// with its index so order can be checked.
pub fn rows_with_labels(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| json!({ "id": PNG_ID, "label": format!("item {i}") }))
        .collect()
}
