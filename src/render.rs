//! Gallery markup and stylesheet.
//!
//! Turns resolved [`TileDescriptor`]s into HTML with
//! [maud](https://maud.lambda.xyz/). All interpolation is escaped by maud; the
//! only hand-escaping is for URLs placed inside CSS `url("…")` values
//! ([`css_url`]).
//!
//! ## Markup
//!
//! ```text
//! div.pog-gallery.pog-hover-{mode}  style="--pog-overlay; --pog-bg; --pog-cols-*; --pog-gap"
//! └── div.pog-item                  style="--pog-bg"          one per tile
//!     └── a.pog-link | span.pog-static
//!         ├── span.pog-overlay-layer + img     untinted
//!         │   or span.pog-tint                 tinted (alpha-masked colour)
//!         └── span.pog-label                   hover/focus caption, optional
//! ```
//!
//! An empty tile list renders a single `div.pog-gallery-empty` placeholder.
//!
//! ## Stylesheet
//!
//! `static/gallery.css` is embedded at compile time and reads every grid
//! parameter from the custom properties above: three breakpoints (<640px,
//! 640–1023px, ≥1024px), 1:1 tiles with a padding-based fallback where
//! `aspect-ratio` is unsupported, hover effects, and the hidden-until-hover
//! label.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::options::DisplayOptions;
use crate::resolve::TileDescriptor;

/// Text of the placeholder rendered for an empty gallery.
pub const EMPTY_MESSAGE: &str = "No PNG images found for gallery.";

const CSS: &str = include_str!("../static/gallery.css");

/// The gallery stylesheet.
pub fn stylesheet() -> &'static str {
    CSS
}

/// Render a gallery.
pub fn render_gallery(tiles: &[TileDescriptor], options: &DisplayOptions) -> Markup {
    render_gallery_with_classes(tiles, options, &[])
}

/// Render a gallery with extra classes on the grid container.
///
/// Classes are appended after `pog-gallery` and the hover class; they do not
/// apply to the empty placeholder.
pub fn render_gallery_with_classes(
    tiles: &[TileDescriptor],
    options: &DisplayOptions,
    extra_classes: &[String],
) -> Markup {
    if tiles.is_empty() {
        return html! {
            div.pog-gallery-empty { (EMPTY_MESSAGE) }
        };
    }

    let mut classes = vec!["pog-gallery", options.hover.css_class()];
    classes.extend(extra_classes.iter().map(String::as_str).filter(|c| !c.is_empty()));

    html! {
        div class=(classes.join(" ")) style=(grid_style(options)) {
            @for tile in tiles {
                (render_tile(tile, options))
            }
        }
    }
}

/// Custom properties carried by the grid container.
fn grid_style(options: &DisplayOptions) -> String {
    format!(
        "--pog-overlay:{}; --pog-bg:{}; --pog-cols-sm:{}; --pog-cols-md:{}; --pog-cols-lg:{}; --pog-gap:{}px;",
        options.overlay_color,
        options.background_color,
        options.columns_small,
        options.columns_medium,
        options.columns_large,
        options.gap,
    )
}

fn render_tile(tile: &TileDescriptor, options: &DisplayOptions) -> Markup {
    let rel = Some(options.link_rel.as_str()).filter(|r| !r.is_empty());
    let tile_style = format!("--pog-bg:{};", tile.background);

    html! {
        div.pog-item style=(tile_style) {
            @if let Some(href) = &tile.href {
                a.pog-link
                    href=(href)
                    target=(options.link_target.as_attr())
                    rel=[rel]
                    aria-label=[tile.label.as_deref()] {
                    (tile_body(tile))
                }
            } @else {
                span.pog-static {
                    (tile_body(tile))
                }
            }
        }
    }
}

fn tile_body(tile: &TileDescriptor) -> Markup {
    let alt = Some(tile.alt_text.as_str()).filter(|a| !a.is_empty());
    html! {
        @if let Some(tint) = &tile.tint {
            @let style = format!("--pog-tint:{}; --pog-mask:{};", tint, css_url(&tile.source_url));
            span.pog-tint
                role=[alt.map(|_| "img")]
                aria-label=[alt]
                aria-hidden=[alt.is_none().then_some("true")]
                style=(style) {}
        } @else {
            span.pog-overlay-layer aria-hidden="true" {}
            img src=(tile.source_url) alt=(tile.alt_text) loading="lazy" decoding="async";
        }
        @if let Some(label) = &tile.label {
            span.pog-label { (label) }
        }
    }
}

/// Quote a URL for use inside a CSS `url()` value.
///
/// ```
/// use png_overlay_gallery::render::css_url;
///
/// assert_eq!(css_url("/a.png"), r#"url("/a.png")"#);
/// assert_eq!(css_url(r#"/a".png"#), r#"url("/a\".png")"#);
/// ```
pub fn css_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len() + 7);
    out.push_str("url(\"");
    for c in url.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            '\r' | '\0' => {}
            _ => out.push(c),
        }
    }
    out.push_str("\")");
    out
}

/// Wrap a rendered gallery in a standalone HTML document with the stylesheet
/// inlined.
pub fn render_document(title: &str, gallery: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (gallery)
            }
        }
    }
}
