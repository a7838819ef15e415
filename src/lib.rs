//! # ocr2md
//!
//! Convert PDF and image files to Markdown, HTML, or raw JSON using the
//! Mistral-hosted OCR API.
//!
//! ## What this crate does
//!
//! The OCR inference itself is remote and opaque; this crate is the
//! orchestration and transformation layer around it. The interesting logic
//! is (a) picking an upload strategy by file type, (b) rewriting image
//! references between the service's per-page image records and the final
//! document, and (c) assembling the output artifact — a stream to stdout,
//! a single file, or a directory with companion images.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF / image
//!  │
//!  ├─ 1. Submit    direct data-URI for images; upload + signed URL for PDFs
//!  ├─ 2. Resolve   image id → data URI (inline) or extracted file (extract)
//!  ├─ 3. Assemble  join page Markdown, substitute references, render format
//!  └─ 4. Write     stdout / file / directory (+ deferred remote cleanup)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocr2md::{convert, ConversionConfig, MistralClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MistralClient::new(std::env::var("MISTRAL_API_KEY")?);
//!     let config = ConversionConfig::default();
//!     let output = convert(&client, "document.pdf", &config).await?;
//!     println!("{}", output.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ocr2md` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! ocr2md = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod response;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{DocumentSource, MistralClient, OcrApi, UploadedFile, DEFAULT_BASE_URL};
pub use config::{
    ConversionConfig, ConversionConfigBuilder, Destination, ImageMode, OutputFormat,
    DEFAULT_MODEL,
};
pub use convert::{convert, ConversionOutput};
pub use error::OcrMdError;
pub use pipeline::images::ImageReferenceMap;
pub use progress::{StatusCallback, StatusSink, StderrStatus};
pub use response::{OcrResponse, Page, PageImage};
