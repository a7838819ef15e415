//! CLI binary for ocr2md.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `ConversionConfig`, validates flag combinations, and runs the conversion.
//! Progress messages go to stderr; stdout is reserved for the artifact.

use anyhow::{bail, Context, Result};
use clap::Parser;
use ocr2md::{
    convert, ConversionConfig, Destination, ImageMode, MistralClient, OutputFormat, StderrStatus,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Markdown to stdout
  ocr2md document.pdf

  # Markdown to a file
  ocr2md document.pdf -o document.md

  # Standalone HTML with images embedded as data URIs
  ocr2md scan.png --html --inline-images -o scan.html

  # Directory layout: README.md plus one file per extracted image
  ocr2md report.pdf --extract-images -d report/

  # Raw API response
  ocr2md document.pdf --json > response.json

OUTPUT FORMATS:
  Markdown (default)   Concatenated page text with image references resolved
  HTML (--html)        Markdown rendered into a standalone HTML document
  JSON (--json)        The raw OCR API response, pretty-printed

OUTPUT DESTINATIONS:
  stdout (default)     Prints the artifact to standard output
  -o/--output FILE     Writes to the given file
  -d/--output-dir DIR  Writes index.html (HTML) or README.md (otherwise),
                       with extracted images as siblings

IMAGE HANDLING:
  (default)            Images are excluded
  -i/--inline-images   Images embedded as data URIs in the output
  -e/--extract-images  Images saved as files (requires --output-dir)

ENVIRONMENT VARIABLES:
  MISTRAL_API_KEY      API key used when --api-key is not given
"#;

/// Process a PDF or image file with the Mistral OCR API.
#[derive(Parser, Debug)]
#[command(
    name = "ocr2md",
    version,
    about = "Convert PDF and image files to Markdown, HTML, or JSON via the Mistral OCR API",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF or image file to process (PDF, PNG, JPG, JPEG).
    file_path: PathBuf,

    /// Mistral API key. Falls back to the MISTRAL_API_KEY environment variable.
    #[arg(long, env = "MISTRAL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Output file path. If not provided, prints to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Save output to a directory: index.html for HTML, README.md otherwise,
    /// with images in the same directory.
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Mistral OCR model to use.
    #[arg(long, default_value = ocr2md::DEFAULT_MODEL)]
    model: String,

    /// Return the raw JSON response instead of Markdown.
    #[arg(short, long)]
    json: bool,

    /// Convert the Markdown result to HTML.
    #[arg(long)]
    html: bool,

    /// Include images inline as data URIs.
    #[arg(short, long)]
    inline_images: bool,

    /// Extract images as separate files (requires --output-dir).
    #[arg(short, long)]
    extract_images: bool,

    /// Suppress all output except the requested data.
    #[arg(short, long)]
    silent: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Validate flag combinations (before any network call) ─────────────
    validate_flags(&cli)?;

    let api_key = match cli.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => key.trim().to_string(),
        _ => return Err(ocr2md::OcrMdError::MissingApiKey.into()),
    };

    let config = build_config(&cli)?;
    let client = MistralClient::new(api_key);

    convert(&client, &cli.file_path, &config)
        .await
        .context("OCR conversion failed")?;

    Ok(())
}

/// Reject invalid flag combinations with user-facing messages.
fn validate_flags(cli: &Cli) -> Result<()> {
    if cli.output.is_some() && cli.output_dir.is_some() {
        bail!("Cannot specify both --output and --output-dir");
    }
    if cli.json && cli.html {
        bail!("Cannot specify both --json and --html");
    }
    if cli.json && cli.output_dir.is_some() {
        bail!("JSON output is not supported with --output-dir");
    }
    if cli.extract_images && cli.output_dir.is_none() {
        bail!("--extract-images requires --output-dir");
    }
    if cli.inline_images && cli.extract_images {
        bail!("Cannot specify both --inline-images and --extract-images");
    }
    Ok(())
}

/// Map CLI flags to a `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let format = if cli.json {
        OutputFormat::Json
    } else if cli.html {
        OutputFormat::Html
    } else {
        OutputFormat::Markdown
    };

    let image_mode = if cli.extract_images {
        ImageMode::Extract
    } else if cli.inline_images {
        ImageMode::Inline
    } else {
        ImageMode::None
    };

    let destination = if let Some(ref dir) = cli.output_dir {
        Destination::Directory(dir.clone())
    } else if let Some(ref file) = cli.output {
        Destination::File(file.clone())
    } else {
        Destination::Stdout
    };

    let mut builder = ConversionConfig::builder()
        .model(cli.model.clone())
        .format(format)
        .image_mode(image_mode)
        .destination(destination);

    if !cli.silent {
        builder = builder.status(Arc::new(StderrStatus));
    }

    builder.build().context("Invalid options")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ocr2md").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn json_and_html_together_is_rejected() {
        let cli = parse(&["doc.pdf", "--json", "--html"]);
        assert!(validate_flags(&cli).is_err());
    }

    #[test]
    fn output_and_output_dir_together_is_rejected() {
        let cli = parse(&["doc.pdf", "-o", "out.md", "-d", "out/"]);
        assert!(validate_flags(&cli).is_err());
    }

    #[test]
    fn extract_without_output_dir_is_rejected() {
        let cli = parse(&["doc.pdf", "--extract-images"]);
        assert!(validate_flags(&cli).is_err());
    }

    #[test]
    fn inline_and_extract_together_is_rejected() {
        let cli = parse(&["doc.pdf", "-d", "out/", "-i", "-e"]);
        assert!(validate_flags(&cli).is_err());
    }

    #[test]
    fn default_flags_build_markdown_to_stdout() {
        let cli = parse(&["doc.pdf"]);
        validate_flags(&cli).unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.format, OutputFormat::Markdown);
        assert_eq!(config.image_mode, ImageMode::None);
        assert_eq!(config.destination, Destination::Stdout);
    }

    #[test]
    fn extract_with_dir_builds_directory_destination() {
        let cli = parse(&["doc.pdf", "-e", "-d", "out"]);
        validate_flags(&cli).unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.image_mode, ImageMode::Extract);
        assert_eq!(config.destination, Destination::Directory("out".into()));
    }

    #[test]
    fn silent_flag_disables_status_sink() {
        let cli = parse(&["doc.pdf", "--silent"]);
        let config = build_config(&cli).unwrap();
        assert!(config.status.is_none());
    }
}
