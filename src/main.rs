use clap::{Parser, Subcommand};
use maud::PreEscaped;
use png_overlay_gallery::block::BlockAttributes;
use png_overlay_gallery::gallery::Gallery;
use png_overlay_gallery::library::{self, Library};
use png_overlay_gallery::options::GalleryOverrides;
use png_overlay_gallery::render::{self, render_document};
use png_overlay_gallery::shortcode::ShortcodeAttrs;
use png_overlay_gallery::store::JsonFileStore;
use png_overlay_gallery::{output, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pog")]
#[command(about = "Square-grid galleries of transparent PNGs")]
#[command(long_about = "\
Square-grid galleries of transparent PNGs

Each image sits on a background colour with an overlay colour showing through
its transparent pixels, or is recoloured to a single tint. Images can link to
a URL or a published product and carry a label revealed on hover.

Media layout for `pog scan`:

  media/
  ├── 007-Red-Widget.png          # asset 7 (original, \"full\")
  ├── 007-Red-Widget@large.png    # asset 7, \"large\" rendition
  ├── 007-Red-Widget.txt          # alt text (optional)
  └── shop/012-Blue-Gadget.png    # asset 12

Embedding:
  Shortcode:  [png_overlay_gallery ids=\"7,12\" gap=8 hover=\"shadow\"]
  Block:      {\"ids\": [7, 12], \"columnsLg\": 6, \"align\": \"wide\"}

Logging goes to stderr; set POG_LOG (e.g. POG_LOG=debug) to see dropped rows
and skipped tiles.

Run 'pog gen-library' to generate a documented library.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding the saved gallery settings
    #[arg(long, default_value = ".pog", global = true)]
    settings_dir: PathBuf,

    /// Asset and product library
    #[arg(long, default_value = "library.toml", global = true)]
    library: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the library's asset list from a media directory
    Scan {
        media_dir: PathBuf,
        /// URL prefix the media directory is served under
        #[arg(long, default_value = "/media")]
        base_url: String,
    },
    /// Validate a settings submission (JSON) and store it
    Save { submission: PathBuf },
    /// Print the stored settings
    Show,
    /// Render a shortcode, or the stored gallery when none is given
    Render {
        /// `[png_overlay_gallery ...]` or just its attributes
        shortcode: Option<String>,
        /// Wrap in a standalone HTML page with the stylesheet
        #[arg(long)]
        page: bool,
    },
    /// Expand every shortcode in a content file
    Expand {
        content: PathBuf,
        #[arg(long)]
        page: bool,
    },
    /// Render block attributes (JSON)
    Block {
        attrs: PathBuf,
        #[arg(long)]
        page: bool,
    },
    /// Print the gallery stylesheet
    Css,
    /// Print a stock library.toml with all options documented
    GenLibrary,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan {
            media_dir,
            base_url,
        } => {
            let scanned = scan::scan_media(&media_dir, &base_url)?;
            // Products are maintained by hand; keep them across rescans.
            let existing = Library::load(&cli.library)?;
            let products = existing
                .catalog()
                .map(|_| existing.products().cloned().collect());
            let library = Library::from_parts(scanned.assets().cloned().collect(), products)?;
            library.save(&cli.library)?;
            output::print_library(&library);
            println!();
            println!(
                "{}",
                output::format_scan_summary(&library, &cli.library.display().to_string())
            );
        }
        Command::Save { submission } => {
            let library = Library::load(&cli.library)?;
            let store = JsonFileStore::new(&cli.settings_dir);
            let input = read_json(&submission)?;
            let normalized = Gallery::with_library(&store, &library).save(&input)?;
            output::print_save_report(&normalized);
        }
        Command::Show => {
            let library = Library::load(&cli.library)?;
            let store = JsonFileStore::new(&cli.settings_dir);
            let settings = Gallery::with_library(&store, &library).settings()?;
            output::print_settings(&settings, &library);
        }
        Command::Render { shortcode, page } => {
            let library = Library::load(&cli.library)?;
            let store = JsonFileStore::new(&cli.settings_dir);
            let gallery = Gallery::with_library(&store, &library);
            let markup = match shortcode {
                Some(text) => {
                    let attrs = ShortcodeAttrs::parse_tag(&text)
                        .unwrap_or_else(|| ShortcodeAttrs::parse(&text));
                    gallery.render_shortcode(&attrs)?
                }
                None => gallery.render(&GalleryOverrides::default(), &[])?,
            };
            emit(markup.into_string(), page);
        }
        Command::Expand { content, page } => {
            let library = Library::load(&cli.library)?;
            let store = JsonFileStore::new(&cli.settings_dir);
            let text = std::fs::read_to_string(&content)?;
            let expanded = Gallery::with_library(&store, &library).expand(&text)?;
            emit(expanded, page);
        }
        Command::Block { attrs, page } => {
            let library = Library::load(&cli.library)?;
            let store = JsonFileStore::new(&cli.settings_dir);
            let attrs = BlockAttributes::from_value(&read_json(&attrs)?);
            let markup = Gallery::with_library(&store, &library).render_block(&attrs)?;
            emit(markup.into_string(), page);
        }
        Command::Css => {
            print!("{}", render::stylesheet());
        }
        Command::GenLibrary => {
            print!("{}", library::stock_library_toml());
        }
    }

    Ok(())
}

/// Log to stderr so rendered markup on stdout stays clean.
fn init_logging() {
    let filter = EnvFilter::try_from_env("POG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json(path: &Path) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

fn emit(html: String, page: bool) {
    if page {
        println!("{}", render_document("Gallery", PreEscaped(html)).into_string());
    } else {
        println!("{}", html);
    }
}
