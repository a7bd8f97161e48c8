//! Build a [`Library`] from a media directory.
//!
//! ```text
//! media/
//! ├── 007-Red-Widget.png           # asset 7, original ("full")
//! ├── 007-Red-Widget@large.png     # asset 7, "large" rendition
//! ├── 007-Red-Widget.txt           # alt text for asset 7 (optional)
//! ├── 009-Studio-Shot.jpg          # asset 9 (listed, rejected by the gallery)
//! ├── shop/
//! │   └── 012-Blue-Gadget.png      # asset 12, URL /media/shop/012-Blue-Gadget.png
//! └── logo.png                     # unnumbered: ignored
//! ```
//!
//! File naming follows [`crate::naming`]. The MIME type comes from the file
//! signature, not the extension, so a JPEG renamed to `.png` is still listed
//! as `image/jpeg`. Files whose format cannot be recognised are ignored, as
//! are hidden files and renditions without an original.
//!
//! ## Validation
//!
//! - No two originals may share an id, anywhere in the tree.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;
use walkdir::WalkDir;

use crate::library::{Asset, FULL_SIZE, Id, Library, LibraryError};
use crate::naming::{MediaName, parse_media_name};
use crate::sanitize::sanitize_text_field;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Library error: {0}")]
    Library(#[from] LibraryError),
    #[error("Duplicate asset id {id}: {} and {}", .first.display(), .second.display())]
    DuplicateId {
        id: Id,
        first: PathBuf,
        second: PathBuf,
    },
}

/// A recognised image file.
#[derive(Debug)]
struct MediaFile {
    path: PathBuf,
    /// Path relative to the scan root, `/`-separated.
    rel: String,
    name: MediaName,
    id: Id,
    mime: &'static str,
}

/// Walk `root` and list every numbered image as an asset.
///
/// URLs are `base_url` joined with the file's path relative to `root`.
pub fn scan_media(root: &Path, base_url: &str) -> Result<Library, ScanError> {
    let files = discover(root)?;

    let mut originals: BTreeMap<Id, &MediaFile> = BTreeMap::new();
    for file in files.iter().filter(|f| f.name.size.is_none()) {
        if let Some(first) = originals.insert(file.id, file) {
            return Err(ScanError::DuplicateId {
                id: file.id,
                first: first.path.clone(),
                second: file.path.clone(),
            });
        }
    }

    let mut library = Library::new();
    for (&id, original) in &originals {
        let mut sizes = BTreeMap::new();
        sizes.insert(FULL_SIZE.to_string(), media_url(base_url, &original.rel));

        for rendition in files.iter().filter(|f| is_rendition_of(f, original)) {
            let Some(size) = rendition.name.size.clone() else { continue };
            if size == FULL_SIZE || sizes.contains_key(&size) {
                tracing::warn!(
                    id,
                    %size,
                    path = %rendition.path.display(),
                    "ignoring duplicate rendition"
                );
                continue;
            }
            sizes.insert(size, media_url(base_url, &rendition.rel));
        }

        library.insert_asset(Asset {
            id,
            mime: original.mime.to_string(),
            alt: alt_text(original),
            sizes,
        })?;
    }

    for orphan in files
        .iter()
        .filter(|f| f.name.size.is_some() && !originals.contains_key(&f.id))
    {
        tracing::warn!(path = %orphan.path.display(), "rendition has no original, skipping");
    }

    Ok(library)
}

fn discover(root: &Path) -> Result<Vec<MediaFile>, ScanError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy();
        let name = parse_media_name(&file_name);
        let Some(id) = name.id else {
            tracing::debug!(path = %path.display(), "no id prefix, skipping");
            continue;
        };
        let Some(mime) = sniff_mime(path)? else {
            tracing::debug!(path = %path.display(), "not a recognised image, skipping");
            continue;
        };
        let rel = path
            .strip_prefix(root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push(MediaFile {
            path: path.to_path_buf(),
            rel,
            name,
            id,
            mime,
        });
    }
    Ok(files)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn is_rendition_of(file: &MediaFile, original: &MediaFile) -> bool {
    file.name.size.is_some()
        && file.id == original.id
        && file.name.base == original.name.base
        && file.path.parent() == original.path.parent()
}

/// MIME type from the file signature. `None` for unrecognised content.
fn sniff_mime(path: &Path) -> io::Result<Option<&'static str>> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.format().map(|f| f.to_mime_type()))
}

/// `base_url` joined with `rel`, each path segment percent-encoded.
fn media_url(base_url: &str, rel: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let encoded = Url::parse("http://localhost/").ok().and_then(|mut url| {
        url.path_segments_mut().ok()?.clear().extend(rel.split('/'));
        Some(url.path().to_string())
    });
    match encoded {
        Some(path) => format!("{base}{path}"),
        None => format!("{base}/{rel}"),
    }
}

/// Alt text from the `.txt` file beside the original, else the title
/// derived from its name.
fn alt_text(original: &MediaFile) -> String {
    std::fs::read_to_string(original.path.with_extension("txt"))
        .map(|text| sanitize_text_field(&text))
        .ok()
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| original.name.display_title.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{AssetStore, PNG_MIME};
    use std::fs;
    use tempfile::TempDir;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG_MAGIC: &[u8] = b"\xFF\xD8\xFF\xE0\0\x10JFIF\0";

    fn write(dir: &Path, rel: &str, content: &[u8]) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn media_fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, "007-Red-Widget.png", PNG_MAGIC);
        write(root, "007-Red-Widget@large.png", PNG_MAGIC);
        write(root, "007-Red-Widget@Thumbnail.png", PNG_MAGIC);
        write(root, "007-Red-Widget.txt", b"  A red widget  \n");
        write(root, "009-Studio-Shot.jpg", JPEG_MAGIC);
        write(root, "shop/012-Blue-Gadget.png", PNG_MAGIC);
        write(root, "logo.png", PNG_MAGIC);
        write(root, "020-notes.md", b"# not an image");
        write(root, ".cache/030-hidden.png", PNG_MAGIC);
        tmp
    }

    #[test]
    fn lists_numbered_images() {
        let tmp = media_fixture();
        let library = scan_media(tmp.path(), "/media").unwrap();
        let ids: Vec<Id> = library.assets().map(|a| a.id).collect();
        assert_eq!(ids, vec![7, 9, 12]);
    }

    #[test]
    fn mime_comes_from_signature() {
        let tmp = media_fixture();
        write(tmp.path(), "015-renamed.png", JPEG_MAGIC);
        let library = scan_media(tmp.path(), "/media").unwrap();
        assert_eq!(library.mime_type(7), Some(PNG_MIME));
        assert_eq!(library.mime_type(9), Some("image/jpeg"));
        assert_eq!(library.mime_type(15), Some("image/jpeg"));
        assert!(!library.is_png(15));
    }

    #[test]
    fn renditions_become_sizes() {
        let tmp = media_fixture();
        let library = scan_media(tmp.path(), "/media/").unwrap();
        assert_eq!(library.image_url(7, "full"), Some("/media/007-Red-Widget.png"));
        assert_eq!(
            library.image_url(7, "large"),
            Some("/media/007-Red-Widget@large.png")
        );
        assert_eq!(
            library.image_url(7, "thumbnail"),
            Some("/media/007-Red-Widget@Thumbnail.png")
        );
        assert_eq!(library.image_url(7, "medium"), None);
    }

    #[test]
    fn nested_paths_in_urls() {
        let tmp = media_fixture();
        let library = scan_media(tmp.path(), "https://cdn.example.com/m").unwrap();
        assert_eq!(
            library.image_url(12, "full"),
            Some("https://cdn.example.com/m/shop/012-Blue-Gadget.png")
        );
    }

    #[test]
    fn spaces_are_encoded_in_urls() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "001-Two Words.png", PNG_MAGIC);
        let library = scan_media(tmp.path(), "/media").unwrap();
        assert_eq!(library.image_url(1, "full"), Some("/media/001-Two%20Words.png"));
    }

    #[test]
    fn alt_text_from_sidecar_or_title() {
        let tmp = media_fixture();
        let library = scan_media(tmp.path(), "/media").unwrap();
        assert_eq!(library.alt_text(7), Some("A red widget"));
        assert_eq!(library.alt_text(12), Some("Blue Gadget"));
    }

    #[test]
    fn hidden_directories_are_skipped() {
        let tmp = media_fixture();
        let library = scan_media(tmp.path(), "/media").unwrap();
        assert_eq!(library.mime_type(30), None);
    }

    #[test]
    fn orphan_rendition_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "005-Ghost@large.png", PNG_MAGIC);
        let library = scan_media(tmp.path(), "/media").unwrap();
        assert_eq!(library.assets().count(), 0);
    }

    #[test]
    fn rendition_in_other_directory_is_not_attached() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "005-Logo.png", PNG_MAGIC);
        write(tmp.path(), "other/005-Logo@large.png", PNG_MAGIC);
        let library = scan_media(tmp.path(), "/media").unwrap();
        assert_eq!(library.image_url(5, "large"), None);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let tmp = media_fixture();
        write(tmp.path(), "shop/007-Other.png", PNG_MAGIC);
        let err = scan_media(tmp.path(), "/media").unwrap_err();
        match err {
            ScanError::DuplicateId { id, first, second } => {
                assert_eq!(id, 7);
                assert_ne!(first, second);
            }
            other => panic!("expected DuplicateId, got {other:?}"),
        }
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan_media(&tmp.path().join("nope"), "/media");
        assert!(matches!(result, Err(ScanError::Walk(_))));
    }

    #[test]
    fn reserved_url_characters_are_encoded() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "sale/001-50%-off#deal?.png", PNG_MAGIC);
        let library = scan_media(tmp.path(), "/media/").unwrap();
        assert_eq!(
            library.image_url(1, "full"),
            Some("/media/sale/001-50%25-off%23deal%3F.png")
        );
    }

    #[test]
    fn blank_sidecar_falls_back_to_title() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "001-Photo.png", PNG_MAGIC);
        write(tmp.path(), "001-Photo.txt", b"   \n\t");
        write(tmp.path(), "002-Logo.png", PNG_MAGIC);
        write(tmp.path(), "002-Logo.txt", b"\n  Our   <b>logo</b>\n");
        let library = scan_media(tmp.path(), "/media").unwrap();
        assert_eq!(library.alt_text(1), Some("Photo"));
        assert_eq!(library.alt_text(2), Some("Our logo"));
    }
}
