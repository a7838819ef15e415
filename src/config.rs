//! Configuration types for an OCR conversion run.
//!
//! All behaviour is controlled through [`ConversionConfig`], built via its
//! [`ConversionConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across calls and to validate option
//! combinations in one place — before any network activity happens.

use crate::error::OcrMdError;
use crate::progress::StatusCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default OCR model identifier.
pub const DEFAULT_MODEL: &str = "mistral-ocr-latest";

/// Format of the final text artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Raw JSON: the full API response, pretty-printed. Image references are
    /// never substituted in this format.
    Json,
    /// Concatenated per-page Markdown with image references resolved. (default)
    #[default]
    Markdown,
    /// The Markdown result rendered to a standalone HTML document.
    Html,
}

impl OutputFormat {
    /// File name of the main artifact when writing to a directory.
    pub fn artifact_name(self) -> &'static str {
        match self {
            OutputFormat::Html => "index.html",
            _ => "README.md",
        }
    }
}

/// How embedded images in the response are materialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageMode {
    /// Images are excluded; the reference map stays empty. (default)
    #[default]
    None,
    /// Images become `data:` URIs substituted into the document text.
    Inline,
    /// Images are written as files next to the main artifact; references in
    /// the text keep the original identifier, which doubles as the relative
    /// path. Requires a directory destination.
    Extract,
}

impl ImageMode {
    /// Whether the OCR request should ask for embedded image data.
    pub fn wants_image_data(self) -> bool {
        !matches!(self, ImageMode::None)
    }
}

/// Where the assembled artifact goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Destination {
    /// Print to standard output. (default)
    #[default]
    Stdout,
    /// Write verbatim to a single file.
    File(PathBuf),
    /// Write into a directory: one main file (`index.html` or `README.md`)
    /// plus any extracted images as siblings.
    Directory(PathBuf),
}

impl Destination {
    /// The target directory, when this is a directory destination.
    pub fn directory(&self) -> Option<&Path> {
        match self {
            Destination::Directory(dir) => Some(dir),
            _ => None,
        }
    }
}

/// Configuration for a single conversion run.
///
/// Built via [`ConversionConfig::builder()`]; [`ConversionConfigBuilder::build`]
/// rejects invalid combinations so a config that exists is a config that can
/// run.
///
/// # Example
/// ```rust
/// use ocr2md::{ConversionConfig, ImageMode, OutputFormat, Destination};
///
/// let config = ConversionConfig::builder()
///     .format(OutputFormat::Html)
///     .image_mode(ImageMode::Inline)
///     .destination(Destination::File("result.html".into()))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Default)]
pub struct ConversionConfig {
    /// OCR model identifier sent with every processing request.
    pub model: Option<String>,

    /// Output artifact format.
    pub format: OutputFormat,

    /// Image-handling mode.
    pub image_mode: ImageMode,

    /// Output destination.
    pub destination: Destination,

    /// Optional user-facing status sink. `None` means silent.
    pub status: Option<StatusCallback>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("model", &self.model)
            .field("format", &self.format)
            .field("image_mode", &self.image_mode)
            .field("destination", &self.destination)
            .field("status", &self.status.as_ref().map(|_| "<dyn StatusSink>"))
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model identifier to use, falling back to [`DEFAULT_MODEL`].
    pub fn model_id(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Emit a user-facing status line if a sink is configured.
    pub fn report(&self, message: &str) {
        if let Some(ref sink) = self.status {
            sink.status(message);
        }
    }

    /// Check option combinations. Called by the builder and again by
    /// [`crate::convert::convert`] before any network call, so configs
    /// assembled by hand get the same guarantees as built ones.
    pub fn validate(&self) -> Result<(), OcrMdError> {
        if self.format == OutputFormat::Json && self.destination.directory().is_some() {
            return Err(OcrMdError::InvalidOptions(
                "JSON output is not supported with a directory destination".into(),
            ));
        }
        if self.image_mode == ImageMode::Extract && self.destination.directory().is_none() {
            return Err(OcrMdError::InvalidOptions(
                "extracting images requires a directory destination".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn image_mode(mut self, mode: ImageMode) -> Self {
        self.config.image_mode = mode;
        self
    }

    pub fn destination(mut self, destination: Destination) -> Self {
        self.config.destination = destination;
        self
    }

    pub fn status(mut self, sink: StatusCallback) -> Self {
        self.config.status = Some(sink);
        self
    }

    /// Build the configuration, validating option combinations.
    pub fn build(self) -> Result<ConversionConfig, OcrMdError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_markdown_to_stdout_without_images() {
        let config = ConversionConfig::builder().build().unwrap();
        assert_eq!(config.format, OutputFormat::Markdown);
        assert_eq!(config.image_mode, ImageMode::None);
        assert_eq!(config.destination, Destination::Stdout);
        assert_eq!(config.model_id(), DEFAULT_MODEL);
    }

    #[test]
    fn json_with_directory_is_rejected() {
        let err = ConversionConfig::builder()
            .format(OutputFormat::Json)
            .destination(Destination::Directory("out".into()))
            .build()
            .unwrap_err();
        assert!(matches!(err, OcrMdError::InvalidOptions(_)));
    }

    #[test]
    fn extract_without_directory_is_rejected() {
        let err = ConversionConfig::builder()
            .image_mode(ImageMode::Extract)
            .destination(Destination::File("out.md".into()))
            .build()
            .unwrap_err();
        assert!(matches!(err, OcrMdError::InvalidOptions(_)));
    }

    #[test]
    fn extract_with_directory_is_accepted() {
        let config = ConversionConfig::builder()
            .image_mode(ImageMode::Extract)
            .destination(Destination::Directory("out".into()))
            .build()
            .unwrap();
        assert!(config.image_mode.wants_image_data());
    }

    #[test]
    fn artifact_name_by_format() {
        assert_eq!(OutputFormat::Html.artifact_name(), "index.html");
        assert_eq!(OutputFormat::Markdown.artifact_name(), "README.md");
        assert_eq!(OutputFormat::Json.artifact_name(), "README.md");
    }
}
