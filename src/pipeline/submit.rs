//! Document submission: choose the upload path by file type and keep track
//! of any remote temporary object that needs deleting afterwards.
//!
//! Two variants, selected by file extension:
//!
//! * **Image** (`.png`, `.jpg`, `.jpeg`) — the bytes are base64-encoded and
//!   sent straight to the OCR endpoint as a data URI, with the declared MIME
//!   type derived from the actual extension. Nothing is created remotely, so
//!   there is nothing to clean up.
//! * **Document** (anything else, notably PDF) — the bytes are uploaded to
//!   the service's object store under the `ocr` purpose tag, a signed URL
//!   (1-hour expiry) is fetched, and that URL is submitted for processing.
//!   If processing fails after a successful upload, the uploaded object is
//!   deleted best-effort before the failure propagates. On success the
//!   object id travels back with the response so the orchestrator can delete
//!   it once downstream work finishes.
//!
//! Errors during encode/upload/submit are logged and propagated unchanged;
//! no retries happen at this layer.

use crate::client::{DocumentSource, OcrApi, SIGNED_URL_EXPIRY_HOURS};
use crate::config::ConversionConfig;
use crate::error::OcrMdError;
use crate::response::OcrResponse;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::{error, info, warn};

/// Result of a submission: the OCR response plus the remote object id to
/// delete after use, when the document path created one.
pub struct Submission {
    pub response: OcrResponse,
    pub uploaded_file_id: Option<String>,
}

/// Extensions routed through the direct image path.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Whether the input takes the image variant (data-URI submission).
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Declared MIME type for direct image submission, from the true extension.
fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

/// Submit the file at `path` for OCR, dispatching on its extension.
pub async fn submit(
    api: &dyn OcrApi,
    path: &Path,
    config: &ConversionConfig,
) -> Result<Submission, OcrMdError> {
    let include_images = config.image_mode.wants_image_data();

    if is_image_file(path) {
        submit_image(api, path, config, include_images).await
    } else {
        submit_document(api, path, config, include_images).await
    }
}

/// Image variant: encode as a data URI and process directly.
async fn submit_image(
    api: &dyn OcrApi,
    path: &Path,
    config: &ConversionConfig,
    include_images: bool,
) -> Result<Submission, OcrMdError> {
    info!("Processing image file: {}", path.display());
    config.report("Processing image with OCR...");

    let bytes = read_input(path)?;
    let data_url = format!("data:{};base64,{}", image_mime(path), STANDARD.encode(&bytes));

    let response = api
        .process(
            config.model_id(),
            DocumentSource::ImageUrl {
                image_url: data_url,
            },
            include_images,
        )
        .await
        .map_err(|e| {
            error!("Error processing image: {e}");
            e
        })?;

    info!("Image processing completed successfully");
    Ok(Submission {
        response,
        uploaded_file_id: None,
    })
}

/// Document variant: upload, fetch a signed URL, then process.
async fn submit_document(
    api: &dyn OcrApi,
    path: &Path,
    config: &ConversionConfig,
    include_images: bool,
) -> Result<Submission, OcrMdError> {
    info!("Processing document file: {}", path.display());
    let file_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();

    config.report(&format!("Uploading file {}...", file_name));
    let bytes = read_input(path)?;

    let uploaded = api.upload_for_ocr(&file_name, bytes).await.map_err(|e| {
        error!("Error uploading document: {e}");
        e
    })?;

    // From here on the remote object exists; a failure before the response is
    // handed back must delete it best-effort before propagating.
    let result = async {
        let url = api
            .signed_url(&uploaded.id, SIGNED_URL_EXPIRY_HOURS)
            .await?;

        config.report(&format!(
            "Processing with OCR model: {}...",
            config.model_id()
        ));

        api.process(
            config.model_id(),
            DocumentSource::DocumentUrl { document_url: url },
            include_images,
        )
        .await
    }
    .await;

    match result {
        Ok(response) => {
            info!("Document processing completed successfully");
            Ok(Submission {
                response,
                uploaded_file_id: Some(uploaded.id),
            })
        }
        Err(e) => {
            error!("Error processing document: {e}");
            if let Err(del_err) = api.delete_file(&uploaded.id).await {
                warn!(
                    "Could not delete uploaded file {} after failure: {del_err}",
                    uploaded.id
                );
            }
            Err(e)
        }
    }
}

/// Read the input file, mapping io errors to the user-facing variants.
fn read_input(path: &Path) -> Result<Vec<u8>, OcrMdError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => OcrMdError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => OcrMdError::FileNotFound {
            path: path.to_path_buf(),
        },
    })
}
