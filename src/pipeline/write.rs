//! Output writing: persist the assembled artifact.
//!
//! Three destinations:
//!
//! * **Stdout** — the artifact is printed (with a trailing newline ensured)
//!   and nothing touches the filesystem.
//! * **File** — written verbatim to the given path.
//! * **Directory** — the directory is created if absent and a single main
//!   file is written into it, named `index.html` for HTML output and
//!   `README.md` otherwise. Extracted images (written earlier by the image
//!   resolver) sit next to it.
//!
//! Writes overwrite directly; no atomic temp-file-and-rename dance, the
//! artifact is a single small text file produced once per invocation.

use crate::config::{Destination, OutputFormat};
use crate::error::OcrMdError;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Write the artifact to its destination.
///
/// Returns the path written, or `None` for stdout.
pub fn write_artifact(
    text: &str,
    format: OutputFormat,
    destination: &Destination,
) -> Result<Option<PathBuf>, OcrMdError> {
    match destination {
        Destination::Stdout => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            let result = handle.write_all(text.as_bytes()).and_then(|_| {
                if text.ends_with('\n') {
                    Ok(())
                } else {
                    handle.write_all(b"\n")
                }
            });
            result.map_err(|source| OcrMdError::OutputWriteFailed {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
            Ok(None)
        }
        Destination::File(path) => {
            write_file(path.clone(), text)?;
            Ok(Some(path.clone()))
        }
        Destination::Directory(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| OcrMdError::OutputWriteFailed {
                path: dir.clone(),
                source,
            })?;
            let path = dir.join(format.artifact_name());
            write_file(path.clone(), text)?;
            Ok(Some(path))
        }
    }
}

fn write_file(path: PathBuf, text: &str) -> Result<(), OcrMdError> {
    debug!("Writing artifact to: {}", path.display());
    std::fs::write(&path, text).map_err(|source| OcrMdError::OutputWriteFailed { path, source })
}
