//! Image reference resolution: map image identifiers to usable references.
//!
//! The OCR response references images from page Markdown by identifier
//! (`![alt](img-1.jpeg)`), with the pixel data carried separately as base64
//! on the image record. Depending on the requested [`ImageMode`] this module
//! builds the map that the assembler later substitutes into the text:
//!
//! * `None`    — empty map; no image data leaves the response.
//! * `Inline`  — id → `data:` URI. Pure, no I/O.
//! * `Extract` — id → id (a relative path), with the decoded bytes written
//!   to `<dir>/<id>` as a side effect.
//!
//! Records missing either the id or the embedded data are silently skipped
//! in every mode. Identifiers are unique within a response; no dedup is
//! attempted, so a colliding id simply overwrites (last write wins).

use crate::config::ImageMode;
use crate::error::OcrMdError;
use crate::response::OcrResponse;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Mapping from image identifier to its resolved reference — a relative file
/// path in extract mode, a data URI in inline mode.
pub type ImageReferenceMap = BTreeMap<String, String>;

/// Matches an existing `data:<mime>;base64,` prefix on embedded image data.
static RE_DATA_URI_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:[^;,]+;base64,").unwrap());

/// Build the reference map for the given mode.
///
/// `dir` is only consulted in extract mode, where the caller must supply the
/// target directory (config validation guarantees this for pipeline runs).
pub fn resolve_images(
    response: &OcrResponse,
    mode: ImageMode,
    dir: Option<&Path>,
) -> Result<ImageReferenceMap, OcrMdError> {
    match mode {
        ImageMode::None => Ok(ImageReferenceMap::new()),
        ImageMode::Inline => Ok(inline_image_map(response)),
        ImageMode::Extract => {
            let dir = dir.ok_or_else(|| {
                OcrMdError::Internal("extract mode reached without a target directory".into())
            })?;
            extract_images(response, dir)
        }
    }
}

/// Map every image with embedded data to a `data:` URI.
///
/// Data that already carries a `data:` prefix is used verbatim; otherwise the
/// MIME type is inferred from the identifier's extension and prefixed.
/// Pure function — resolving twice over the same response yields the same map.
pub fn inline_image_map(response: &OcrResponse) -> ImageReferenceMap {
    let mut map = ImageReferenceMap::new();
    for image in response.images() {
        let (Some(id), Some(data)) = (&image.id, &image.image_base64) else {
            continue;
        };
        let uri = if data.starts_with("data:") {
            data.clone()
        } else {
            format!("data:{};base64,{}", mime_for_id(id), data)
        };
        map.insert(id.clone(), uri);
    }
    map
}

/// Decode every image with embedded data and write it to `<dir>/<id>`.
///
/// The directory is created if absent. The map value is the identifier
/// itself, a relative reference usable from the main artifact written next
/// to the images. The first decode or write failure aborts the extraction;
/// files already written are left in place.
pub fn extract_images(
    response: &OcrResponse,
    dir: &Path,
) -> Result<ImageReferenceMap, OcrMdError> {
    info!("Extracting images to directory: {}", dir.display());
    std::fs::create_dir_all(dir).map_err(|source| OcrMdError::OutputWriteFailed {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut map = ImageReferenceMap::new();
    for image in response.images() {
        let (Some(id), Some(data)) = (&image.id, &image.image_base64) else {
            continue;
        };

        let payload = RE_DATA_URI_PREFIX.replace(data, "");
        let bytes = STANDARD
            .decode(payload.as_bytes())
            .map_err(|e| OcrMdError::ImageDecodeFailed {
                id: id.clone(),
                detail: e.to_string(),
            })?;

        let path = dir.join(id);
        debug!("Saving image to: {}", path.display());
        std::fs::write(&path, &bytes).map_err(|source| OcrMdError::ImageWriteFailed {
            path,
            source,
        })?;

        map.insert(id.clone(), id.clone());
    }

    info!("Extracted {} images", map.len());
    Ok(map)
}

/// Infer a MIME type from the identifier's file extension.
///
/// Defaults to `image/jpeg` when the extension is absent or unrecognised.
fn mime_for_id(id: &str) -> &'static str {
    let ext = id.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "image/jpeg",
    }
}
