//! Injectable status reporting for user-facing progress messages.
//!
//! The pipeline emits short human-readable status lines ("Uploading file…",
//! "Extracted 3 images to out/") through a [`StatusSink`] carried in
//! [`crate::config::ConversionConfig`]. Diagnostics still go through
//! `tracing`; the sink exists only for the messages an interactive user
//! expects on stderr, so a host application can route them to a UI, a log
//! record, or nowhere at all — and the library holds no process-wide state.
//!
//! When no sink is configured the pipeline stays silent, which is exactly
//! the behaviour of the `--silent` CLI flag.

use std::sync::Arc;

/// Receives user-facing status messages as the pipeline progresses.
///
/// Implementations must be `Send + Sync`; messages arrive strictly in order
/// since the pipeline is sequential.
pub trait StatusSink: Send + Sync {
    /// Called with a single human-readable status line (no trailing newline).
    fn status(&self, message: &str);
}

/// Writes each status line to standard error.
///
/// This is what the CLI installs unless `--silent` is given, matching the
/// convention that stdout is reserved for the artifact itself.
pub struct StderrStatus;

impl StatusSink for StderrStatus {
    fn status(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type StatusCallback = Arc<dyn StatusSink>;
