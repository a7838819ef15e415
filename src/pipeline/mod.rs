//! Pipeline stages for OCR-to-document conversion.
//!
//! Each submodule implements exactly one transformation step, keeping every
//! stage independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! submit ──▶ images ──▶ assemble ──▶ write
//! (API)      (id map)   (md/html/json)  (stdout/file/dir)
//! ```
//!
//! 1. [`submit`]   — dispatch to the image or document upload path and track
//!    the remote temporary object; the only stage with network I/O
//! 2. [`images`]   — build the identifier → reference map (inline data URIs
//!    or extracted files)
//! 3. [`assemble`] — concatenate page fragments, substitute references, and
//!    render the requested format
//! 4. [`write`]    — persist to stdout, a file, or a directory

pub mod assemble;
pub mod images;
pub mod submit;
pub mod write;
