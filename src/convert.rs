//! Top-level conversion entry point.
//!
//! Wires the pipeline stages together for one file:
//! validate options → submit → resolve image references → assemble →
//! write, with a guaranteed single delete attempt for any remote temporary
//! object the submission created. The run is strictly sequential; every
//! network call blocks until complete and is attempted exactly once.

use crate::client::OcrApi;
use crate::config::ConversionConfig;
use crate::error::OcrMdError;
use crate::pipeline::{assemble, images, submit, write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of a conversion run.
#[derive(Debug)]
pub struct ConversionOutput {
    /// The assembled artifact text (also written to the destination).
    pub text: String,
    /// Path of the main artifact file, or `None` for stdout.
    pub written_to: Option<PathBuf>,
    /// Number of images materialised (inline entries or extracted files).
    pub resolved_images: usize,
}

/// Convert a PDF or image file through the OCR service.
///
/// This is the primary entry point for the library. `api` is the upstream
/// client — [`crate::client::MistralClient`] in production, anything
/// implementing [`OcrApi`] in tests.
///
/// # Errors
/// Validation errors surface before any network call. Upstream errors are
/// propagated after best-effort cleanup of any uploaded remote object;
/// cleanup failures themselves are only logged.
pub async fn convert(
    api: &dyn OcrApi,
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, OcrMdError> {
    let input = input.as_ref();
    info!("Starting OCR process for file: {}", input.display());

    // ── Step 1: Validate before touching the network ─────────────────────
    config.validate()?;

    if let Some(name) = input.file_name().and_then(|n| n.to_str()) {
        config.report(&format!("Processing {name}..."));
    }

    // ── Step 2: Submit (image path or upload + signed URL) ───────────────
    let submission = submit::submit(api, input, config).await?;

    // ── Steps 3–5 run with the remote object still alive; its deletion is
    // guaranteed exactly once below, whether they succeed or fail. ────────
    let outcome = finalize(&submission.response, config);

    if let Some(ref file_id) = submission.uploaded_file_id {
        match api.delete_file(file_id).await {
            Ok(()) => {
                debug!("Temporary file deleted");
                config.report("Temporary file deleted.");
            }
            Err(e) => {
                warn!("Could not delete temporary file {file_id}: {e}");
                config.report(&format!("Warning: Could not delete temporary file: {e}"));
            }
        }
    }

    outcome
}

/// Resolve images, assemble the artifact, and write it out.
fn finalize(
    response: &crate::response::OcrResponse,
    config: &ConversionConfig,
) -> Result<ConversionOutput, OcrMdError> {
    let target_dir = config.destination.directory();

    // ── Step 3: Image reference map ──────────────────────────────────────
    let image_map = images::resolve_images(response, config.image_mode, target_dir)?;
    if config.image_mode == crate::config::ImageMode::Extract {
        if let Some(dir) = target_dir {
            config.report(&format!(
                "Extracted {} images to {}",
                image_map.len(),
                dir.display()
            ));
        }
    }

    // ── Step 4: Assemble the artifact ────────────────────────────────────
    let text = assemble::render(response, config.format, &image_map)?;
    debug!("Generated {:?} content ({} bytes)", config.format, text.len());

    // ── Step 5: Write ────────────────────────────────────────────────────
    let written_to = write::write_artifact(&text, config.format, &config.destination)?;
    if let Some(ref path) = written_to {
        config.report(&format!("Results saved to {}", path.display()));
    }

    info!("OCR process completed successfully");
    Ok(ConversionOutput {
        text,
        written_to,
        resolved_images: image_map.len(),
    })
}
