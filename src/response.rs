//! Typed records for the Mistral OCR wire response.
//!
//! The upstream client in other ecosystems hands back a dynamic object that
//! gets serialised to an untyped map before any downstream logic runs. Here
//! the response is deserialised directly into explicit records: the fields
//! the pipeline actually reads (`pages[].markdown`, `pages[].images[].id`,
//! `pages[].images[].image_base64`) are typed, and everything else the
//! service returns (model name, usage info, page dimensions, bounding boxes)
//! is preserved verbatim through `#[serde(flatten)]` maps so that raw-JSON
//! output reproduces the full response.
//!
//! The response is immutable once received; image maps and artifacts are
//! derived from it without mutation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The OCR service's result — an ordered sequence of pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResponse {
    /// Pages in document order.
    #[serde(default)]
    pub pages: Vec<Page>,

    /// All other response fields (`model`, `usage_info`, …), kept as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A single OCR'd page: a Markdown text fragment plus its image records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Markdown-formatted page text. Image references inside it use the
    /// image `id` as the link target: `![alt](img-1.jpeg)`.
    #[serde(default)]
    pub markdown: String,

    /// Images detected on this page.
    #[serde(default)]
    pub images: Vec<PageImage>,

    /// Other page fields (`index`, `dimensions`, …), kept as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// An image record attached to a page.
///
/// Both fields are optional on the wire: the service omits `image_base64`
/// unless embedded image data was requested, and a record missing either
/// field is skipped by the reference resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageImage {
    /// Identifier, used as the Markdown link target in the page text.
    /// Its file extension (if any) doubles as the MIME hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Base64-encoded pixel data, possibly already a full data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,

    /// Other image fields (bounding-box coordinates, …), kept as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl OcrResponse {
    /// Iterate over every image record across all pages, in page order.
    pub fn images(&self) -> impl Iterator<Item = &PageImage> {
        self.pages.iter().flat_map(|p| p.images.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_preserves_unknown_fields() {
        let raw = r##"{
            "model": "mistral-ocr-latest",
            "pages": [{
                "index": 0,
                "markdown": "# Title",
                "images": [{"id": "img-0.jpeg", "image_base64": "AAAA", "top_left_x": 10}],
                "dimensions": {"dpi": 200, "height": 2200, "width": 1700}
            }],
            "usage_info": {"pages_processed": 1}
        }"##;

        let response: OcrResponse = serde_json::from_str(raw).expect("valid response");
        assert_eq!(response.pages.len(), 1);
        assert_eq!(response.pages[0].markdown, "# Title");
        assert_eq!(response.pages[0].images[0].id.as_deref(), Some("img-0.jpeg"));
        assert_eq!(response.extra["model"], "mistral-ocr-latest");
        assert_eq!(response.pages[0].extra["dimensions"]["dpi"], 200);
        assert_eq!(response.pages[0].images[0].extra["top_left_x"], 10);

        // Round-trip keeps everything for raw-JSON output.
        let back = serde_json::to_value(&response).expect("serialise");
        assert_eq!(back["usage_info"]["pages_processed"], 1);
        assert_eq!(back["pages"][0]["index"], 0);
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let raw = r#"{"pages": [{"markdown": "text", "images": [{"id": "a.png"}]}]}"#;
        let response: OcrResponse = serde_json::from_str(raw).expect("valid response");
        assert!(response.pages[0].images[0].image_base64.is_none());
    }

    #[test]
    fn images_iterates_in_page_order() {
        let raw = r#"{"pages": [
            {"markdown": "", "images": [{"id": "a"}, {"id": "b"}]},
            {"markdown": "", "images": [{"id": "c"}]}
        ]}"#;
        let response: OcrResponse = serde_json::from_str(raw).expect("valid response");
        let ids: Vec<_> = response
            .images()
            .filter_map(|i| i.id.as_deref())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
