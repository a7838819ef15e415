//! Content assembly: turn the OCR response into the final text artifact.
//!
//! Three output paths, in increasing amounts of transformation:
//!
//! * **JSON** — the full response pretty-printed. The image map is ignored
//!   entirely: embedded base64 data (if requested) stays inside the
//!   structure, and no reference substitution happens.
//! * **Markdown** — per-page fragments concatenated in page order with a
//!   blank line between them, then every `![alt](id)` whose id appears in
//!   the reference map rewritten to `![alt](resolved)`. The id match is
//!   literal (regex-escaped); unresolved identifiers are left untouched.
//! * **HTML** — the Markdown result (substitutions included) rendered via
//!   pulldown-cmark with table support, wrapped in a minimal standalone
//!   document shell with a readable default style and responsive images.

use crate::config::OutputFormat;
use crate::error::OcrMdError;
use crate::pipeline::images::ImageReferenceMap;
use crate::response::OcrResponse;
use pulldown_cmark::{html, Options, Parser};
use regex::{Captures, Regex};

/// Render the response in the requested format.
pub fn render(
    response: &OcrResponse,
    format: OutputFormat,
    image_map: &ImageReferenceMap,
) -> Result<String, OcrMdError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(response)
            .map_err(|e| OcrMdError::Internal(format!("failed to serialise response: {e}"))),
        OutputFormat::Markdown => Ok(assemble_markdown(response, image_map)),
        OutputFormat::Html => Ok(html_document(&markdown_to_html(&assemble_markdown(
            response, image_map,
        )))),
    }
}

/// Concatenate page fragments and substitute resolved image references.
fn assemble_markdown(response: &OcrResponse, image_map: &ImageReferenceMap) -> String {
    let mut text = response
        .pages
        .iter()
        .map(|p| p.markdown.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    for (id, resolved) in image_map {
        text = substitute_image_reference(&text, id, resolved);
    }

    text
}

/// Replace every `![alt](id)` with `![alt](resolved)`, preserving alt text.
///
/// The replacement goes through a closure so characters like `$` in the
/// resolved reference are taken literally rather than as capture-group
/// syntax.
fn substitute_image_reference(text: &str, id: &str, resolved: &str) -> String {
    let pattern = format!(r"!\[([^\]]*)\]\({}\)", regex::escape(id));
    // The pattern is built from a literal escape; it cannot fail to compile.
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => return text.to_string(),
    };
    re.replace_all(text, |caps: &Captures<'_>| {
        format!("![{}]({})", &caps[1], resolved)
    })
    .into_owned()
}

/// Render Markdown to an HTML fragment with GFM tables enabled.
fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}

/// Wrap an HTML fragment in the fixed standalone document shell.
fn html_document(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>OCR Result</title>
    <style>
        body {{
            font-family: Arial, sans-serif;
            line-height: 1.6;
            margin: 0 auto;
            max-width: 800px;
            padding: 20px;
        }}
        img {{ max-width: 100%; height: auto; }}
        h1, h2, h3 {{ margin-top: 1.5em; }}
        p {{ margin: 1em 0; }}
    </style>
</head>
<body>
{body}
</body>
</html>"#
    )
}
