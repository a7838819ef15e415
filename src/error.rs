//! Error types for the ocr2md library.
//!
//! The taxonomy mirrors how failures are handled, not where they occur:
//!
//! * **Validation** ([`OcrMdError::MissingApiKey`], [`OcrMdError::InvalidOptions`])
//!   — reported before any network call; no partial side effects.
//! * **Upstream** ([`OcrMdError::Transport`], [`OcrMdError::ApiStatus`],
//!   [`OcrMdError::InvalidResponse`], plus the input-file variants) — logged
//!   with context and propagated after best-effort cleanup of any uploaded
//!   remote object.
//! * **Output** ([`OcrMdError::ImageWriteFailed`], [`OcrMdError::OutputWriteFailed`])
//!   — local filesystem failures while materialising the artifact.
//!
//! Cleanup failures (delete-after-use of the uploaded object) are deliberately
//! *not* represented here: they are logged as warnings and never escalate.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the ocr2md library.
#[derive(Debug, Error)]
pub enum OcrMdError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// No API credential was supplied.
    #[error("No API key provided and MISTRAL_API_KEY environment variable not set.")]
    MissingApiKey,

    /// The requested combination of format, destination, and image mode is
    /// invalid. Checked before any network activity.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the input file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    // ── Upstream errors ───────────────────────────────────────────────────
    /// The HTTP request itself failed (connection, TLS, timeout).
    #[error("Request to the OCR API failed during {operation}: {detail}")]
    Transport {
        operation: &'static str,
        detail: String,
    },

    /// The API answered with a non-success status code.
    #[error("OCR API returned HTTP {status} during {operation}: {detail}")]
    ApiStatus {
        operation: &'static str,
        status: u16,
        detail: String,
    },

    /// The API answered 2xx but the body did not match the expected shape.
    #[error("Failed to parse the {operation} response: {source}")]
    InvalidResponse {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    // ── Image handling errors ─────────────────────────────────────────────
    /// Embedded base64 data for an image could not be decoded.
    #[error("Failed to decode embedded image data for '{id}': {detail}")]
    ImageDecodeFailed { id: String, detail: String },

    /// An extracted image file could not be written. Aborts the extraction;
    /// files already written are left in place.
    #[error("Failed to write image '{path}': {source}")]
    ImageWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output artifact.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_display() {
        let e = OcrMdError::ApiStatus {
            operation: "file upload",
            status: 401,
            detail: "Unauthorized".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("401"), "got: {msg}");
        assert!(msg.contains("file upload"));
    }

    #[test]
    fn invalid_options_display() {
        let e = OcrMdError::InvalidOptions("cannot combine JSON with a directory".into());
        assert!(e.to_string().contains("cannot combine"));
    }

    #[test]
    fn output_write_failed_has_source() {
        use std::error::Error as _;
        let e = OcrMdError::OutputWriteFailed {
            path: PathBuf::from("/tmp/out.md"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/tmp/out.md"));
    }
}
