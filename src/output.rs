//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every entity (image row, asset, product) leads with its positional index
//! and human title; ids, URLs and colours follow as indented context lines.
//! The output reads as an inventory of what the gallery will show.
//!
//! # Output Format
//!
//! ## Save
//!
//! ```text
//! Saved 2 images
//!
//! Rejected
//! 002 id 9: not a PNG (image/jpeg)
//! 004 (no id): missing id
//!
//! Truncated 12 rows past the 600 image limit
//! ```
//!
//! ## Show
//!
//! ```text
//! Display
//!     Overlay: #000000
//!     Background: #ffffff
//!     Columns: 2 / 3 / 4
//!     Gap: 10px
//!     Hover: zoom
//!
//! Images
//! 001 Red widget (id 7)
//!     Link: https://example.com/widget
//!     Tint: #ff0000
//!     Label: Widget
//! ```
//!
//! ## Scan
//!
//! ```text
//! Assets
//! 001 Red widget (id 7, image/png)
//!     full: /media/007-Red-Widget.png
//!     large: /media/007-Red-Widget@large.png
//!
//! Products
//! 001 Widget (id 42, publish)
//!     Permalink: /shop/widget
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::config::{GallerySettings, ImageEntry, MAX_IMAGES, Normalized};
use crate::library::{AssetStore, Library};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Header line: positional index + title, with a parenthesised detail.
///
/// ```text
/// 001 Red widget (id 7)
/// 001 (id 12)            // untitled: the id IS the identity
/// ```
fn entity_header(index: usize, title: &str, detail: &str) -> String {
    if title.is_empty() {
        format!("{} ({})", format_index(index), detail)
    } else {
        format!("{} {} ({})", format_index(index), title, detail)
    }
}

fn context_line(depth: usize, key: &str, value: &str) -> String {
    format!("{}{}: {}", indent(depth), key, value)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// save
// ============================================================================

/// Summarise a save: kept rows, dropped rows and truncation.
pub fn format_save_report(normalized: &Normalized) -> Vec<String> {
    let mut lines = vec![format!(
        "Saved {}",
        plural(normalized.settings.images.len(), "image")
    )];

    if !normalized.rejected.is_empty() {
        lines.push(String::new());
        lines.push("Rejected".to_string());
        for row in &normalized.rejected {
            let id = if row.id == 0 {
                "(no id)".to_string()
            } else {
                format!("id {}", row.id)
            };
            lines.push(format!("{} {}: {}", format_index(row.index + 1), id, row.reason));
        }
    }

    if normalized.truncated > 0 {
        lines.push(String::new());
        lines.push(format!(
            "Truncated {} past the {} image limit",
            plural(normalized.truncated, "row"),
            MAX_IMAGES
        ));
    }

    lines
}

pub fn print_save_report(normalized: &Normalized) {
    for line in format_save_report(normalized) {
        println!("{}", line);
    }
}

// ============================================================================
// show
// ============================================================================

/// Display the stored settings. Image titles come from the asset alt text.
pub fn format_settings(settings: &GallerySettings, assets: &dyn AssetStore) -> Vec<String> {
    let mut lines = vec![
        "Display".to_string(),
        context_line(1, "Overlay", settings.overlay_color.as_str()),
        context_line(1, "Background", settings.background_color.as_str()),
        context_line(
            1,
            "Columns",
            &format!(
                "{} / {} / {}",
                settings.columns_sm, settings.columns_md, settings.columns_lg
            ),
        ),
        context_line(1, "Gap", &format!("{}px", settings.gap)),
        context_line(1, "Hover", settings.hover.as_str()),
        String::new(),
    ];

    if settings.images.is_empty() {
        lines.push("Images: none".to_string());
        return lines;
    }

    lines.push("Images".to_string());
    for (i, entry) in settings.images.iter().enumerate() {
        lines.extend(image_lines(i + 1, entry, assets));
    }
    lines
}

fn image_lines(index: usize, entry: &ImageEntry, assets: &dyn AssetStore) -> Vec<String> {
    let title = assets.alt_text(entry.id).unwrap_or_default();
    let mut lines = vec![entity_header(index, title, &format!("id {}", entry.id))];
    if let Some(url) = &entry.link_url {
        lines.push(context_line(1, "Link", url));
    }
    if let Some(product_id) = entry.product_id {
        lines.push(context_line(1, "Product", &product_id.to_string()));
    }
    if let Some(bg) = &entry.background_color {
        lines.push(context_line(1, "Background", bg.as_str()));
    }
    match (&entry.foreground_color, entry.recolor_enabled) {
        (Some(fg), true) => lines.push(context_line(1, "Tint", fg.as_str())),
        (Some(fg), false) => lines.push(context_line(1, "Tint", &format!("{fg} (off)"))),
        (None, true) => lines.push(context_line(1, "Tint", "on, no colour")),
        (None, false) => {}
    }
    if let Some(label) = &entry.label {
        lines.push(context_line(1, "Label", label));
    }
    lines
}

pub fn print_settings(settings: &GallerySettings, assets: &dyn AssetStore) {
    for line in format_settings(settings, assets) {
        println!("{}", line);
    }
}

// ============================================================================
// scan
// ============================================================================

/// List every asset with its renditions, then products if commerce is on.
pub fn format_library(library: &Library) -> Vec<String> {
    let mut lines = vec!["Assets".to_string()];
    for (i, asset) in library.assets().enumerate() {
        lines.push(entity_header(
            i + 1,
            &asset.alt,
            &format!("id {}, {}", asset.id, asset.mime),
        ));
        for (size, url) in &asset.sizes {
            lines.push(context_line(1, size, url));
        }
    }

    if library.catalog().is_some() {
        lines.push(String::new());
        lines.push("Products".to_string());
        for (i, product) in library.products().enumerate() {
            lines.push(entity_header(
                i + 1,
                &product.title,
                &format!("id {}, {}", product.id, product.status.as_str()),
            ));
            lines.push(context_line(1, "Permalink", &product.permalink));
        }
    }

    lines
}

pub fn print_library(library: &Library) {
    for line in format_library(library) {
        println!("{}", line);
    }
}

/// One-line summary after a scan writes the library file.
pub fn format_scan_summary(library: &Library, written_to: &str) -> String {
    let assets = library.assets().count();
    let png = library.assets().filter(|a| library.is_png(a.id)).count();
    format!(
        "Wrote {} ({} PNG) to {}",
        plural(assets, "asset"),
        png,
        written_to
    )
}
