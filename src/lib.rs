//! # PNG Overlay Gallery
//!
//! Square-grid galleries of transparent PNGs. Each tile shows an image over a
//! background colour, with an overlay colour filling its transparent pixels
//! or, when recolouring is on, the image's silhouette painted in a single
//! tint. Tiles can link to a URL or a published product and carry a label
//! revealed on hover.
//!
//! # Architecture: Validate, Resolve, Serialize
//!
//! ```text
//! admin submission ──normalize──▶ GallerySettings ──▶ SettingsStore
//!
//! shortcode / block ─▶ GalleryOverrides ─┐
//!                        stored settings ─┴─▶ DisplayOptions
//!                                              │
//!        items (explicit ids | stored list) ───┴─▶ TileDescriptor[] ─▶ HTML
//! ```
//!
//! - **Validate**: every write goes through [`config::normalize`], which never
//!   fails. Bad rows are dropped and reported, bad values fall back to
//!   defaults, and the list is capped at [`config::MAX_IMAGES`].
//! - **Resolve**: [`resolve`] picks the items (explicit ids win over the stored
//!   list), keeps only existing PNGs, and turns each into a
//!   [`resolve::TileDescriptor`] with its link, colours and tint decided.
//! - **Serialize**: [`render`] draws descriptors with Maud. The grid and tiles
//!   are configured through CSS custom properties read by one static
//!   stylesheet.
//!
//! Media and products are collaborators behind the [`library::AssetStore`]
//! and [`library::ProductCatalog`] traits; [`library::Library`] implements
//! both from a TOML file that [`scan`] can build from a media directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`color`] | `HexColor` value type and hex colour validation |
//! | [`sanitize`] | Coercions for loosely-typed input: integers, flags, keys, text, URLs |
//! | [`config`] | Persisted settings record and its validator |
//! | [`options`] | Per-render display options and the override merge |
//! | [`library`] | Asset and product lookups; TOML-backed `Library` |
//! | [`naming`] | `NNN-name[@size].ext` media filename convention |
//! | [`scan`] | Media directory → `Library` |
//! | [`store`] | Settings persistence: JSON files or memory |
//! | [`resolve`] | Item and tile resolution |
//! | [`render`] | HTML serialization with Maud; embedded stylesheet |
//! | [`shortcode`] | `[png_overlay_gallery ...]` parsing and content expansion |
//! | [`block`] | Block editor attributes |
//! | [`gallery`] | Composition root wiring the above into the entry points |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Validation Never Fails
//!
//! A settings form should save whatever is salvageable. Rather than rejecting
//! a submission, [`config::normalize`] drops rows it cannot use and clamps or
//! defaults every field. The dropped rows come back in
//! [`config::Normalized`] so the CLI (or a form) can tell the user.
//!
//! ## Re-validate on Read
//!
//! Assets can be deleted or replaced after a save. Loading settings runs the
//! same validator against the current library, so a render never references
//! an asset that stopped being a PNG. It also migrates records written with
//! the legacy single `columns` count.
//!
//! ## CSS Custom Properties Over Inline Layout
//!
//! Colours, column counts and the gap travel as `--pog-*` custom properties
//! on the grid and tiles. The stylesheet is constant and can be cached; only
//! the properties vary per gallery. Breakpoints live in the stylesheet
//! (640px and 1024px).
//!
//! ## Tint as a Mask
//!
//! A tinted tile does not draw the raster at all. It paints the tint colour
//! through the image used as a CSS mask, so the silhouette takes the tint and
//! transparent pixels stay transparent.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). All interpolation
//! is escaped, so labels, alt text and URLs cannot break out of their
//! attributes. Malformed templates are compile errors.

pub mod block;
pub mod color;
pub mod config;
pub mod gallery;
pub mod library;
pub mod naming;
pub mod options;
pub mod output;
pub mod render;
pub mod resolve;
pub mod sanitize;
pub mod scan;
pub mod shortcode;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;
