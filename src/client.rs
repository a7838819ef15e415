//! The OCR API seam: a small trait covering the four upstream operations,
//! plus a thin reqwest implementation for the hosted Mistral endpoints.
//!
//! The core's only contract with the service is these four request/response
//! shapes — upload, signed URL, OCR processing, delete. Auth, retry, and
//! transport internals stay behind [`OcrApi`], which also gives the tests a
//! place to plug in a scripted in-memory implementation instead of a live
//! endpoint. Every operation is attempted exactly once; there is no retry
//! policy at this layer.

use crate::error::OcrMdError;
use crate::response::OcrResponse;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default base URL of the hosted OCR service.
pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai";

/// Signed-URL expiry for uploaded documents, in hours.
pub const SIGNED_URL_EXPIRY_HOURS: u32 = 1;

/// The document payload of an OCR processing request.
///
/// Serialises to the service's tagged chunk format:
/// `{"type": "image_url", "image_url": …}` or
/// `{"type": "document_url", "document_url": …}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentSource {
    /// An image supplied directly as a base64 data URI.
    ImageUrl { image_url: String },
    /// A document reachable at a (signed) URL.
    DocumentUrl { document_url: String },
}

/// Handle to a file uploaded to the service's object store.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    /// Server-assigned object identifier, used for the signed-URL fetch and
    /// the delete-after-use call.
    pub id: String,
}

/// The four upstream operations the pipeline depends on.
#[async_trait]
pub trait OcrApi: Send + Sync {
    /// Upload raw file bytes under the `ocr` purpose tag.
    async fn upload_for_ocr(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, OcrMdError>;

    /// Fetch a short-lived signed URL for an uploaded object.
    async fn signed_url(&self, file_id: &str, expiry_hours: u32) -> Result<String, OcrMdError>;

    /// Run OCR over an image data URI or a document URL.
    async fn process(
        &self,
        model: &str,
        document: DocumentSource,
        include_image_base64: bool,
    ) -> Result<OcrResponse, OcrMdError>;

    /// Delete an uploaded object by identifier.
    async fn delete_file(&self, file_id: &str) -> Result<(), OcrMdError>;
}

/// reqwest-backed client for the hosted Mistral API.
pub struct MistralClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl MistralClient {
    /// Create a client for the default hosted endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (self-hosted or test server).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into [`OcrMdError::ApiStatus`] with as much
    /// of the body as the server gave us.
    async fn check_status(
        operation: &'static str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, OcrMdError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(OcrMdError::ApiStatus {
            operation,
            status: status.as_u16(),
            detail,
        })
    }

    /// Deserialise a 2xx body, distinguishing transport from shape errors.
    async fn parse_json<T: serde::de::DeserializeOwned>(
        operation: &'static str,
        response: reqwest::Response,
    ) -> Result<T, OcrMdError> {
        let body = response
            .text()
            .await
            .map_err(|e| transport(operation, e))?;
        serde_json::from_str(&body).map_err(|source| OcrMdError::InvalidResponse {
            operation,
            source,
        })
    }
}

fn transport(operation: &'static str, e: reqwest::Error) -> OcrMdError {
    OcrMdError::Transport {
        operation,
        detail: e.to_string(),
    }
}

#[async_trait]
impl OcrApi for MistralClient {
    async fn upload_for_ocr(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, OcrMdError> {
        const OP: &str = "file upload";
        debug!("Uploading {} bytes as '{}'", bytes.len(), file_name);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("purpose", "ocr")
            .part("file", part);

        let response = self
            .http
            .post(self.url("/v1/files"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport(OP, e))?;

        let response = Self::check_status(OP, response).await?;
        let uploaded: UploadedFile = Self::parse_json(OP, response).await?;
        debug!("File uploaded with id: {}", uploaded.id);
        Ok(uploaded)
    }

    async fn signed_url(&self, file_id: &str, expiry_hours: u32) -> Result<String, OcrMdError> {
        const OP: &str = "signed URL fetch";

        #[derive(Deserialize)]
        struct SignedUrl {
            url: String,
        }

        let response = self
            .http
            .get(self.url(&format!("/v1/files/{file_id}/url")))
            .query(&[("expiry", expiry_hours)])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| transport(OP, e))?;

        let response = Self::check_status(OP, response).await?;
        let signed: SignedUrl = Self::parse_json(OP, response).await?;
        debug!("Got signed URL for file {}", file_id);
        Ok(signed.url)
    }

    async fn process(
        &self,
        model: &str,
        document: DocumentSource,
        include_image_base64: bool,
    ) -> Result<OcrResponse, OcrMdError> {
        const OP: &str = "OCR processing";

        #[derive(Serialize)]
        struct OcrRequest<'a> {
            model: &'a str,
            document: DocumentSource,
            include_image_base64: bool,
        }

        let response = self
            .http
            .post(self.url("/v1/ocr"))
            .bearer_auth(&self.api_key)
            .json(&OcrRequest {
                model,
                document,
                include_image_base64,
            })
            .send()
            .await
            .map_err(|e| transport(OP, e))?;

        let response = Self::check_status(OP, response).await?;
        Self::parse_json(OP, response).await
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), OcrMdError> {
        const OP: &str = "file deletion";

        let response = self
            .http
            .delete(self.url(&format!("/v1/files/{file_id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| transport(OP, e))?;

        Self::check_status(OP, response).await?;
        debug!("Deleted uploaded file: {}", file_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_source_wire_format() {
        let image = DocumentSource::ImageUrl {
            image_url: "data:image/png;base64,AAAA".into(),
        };
        let v = serde_json::to_value(&image).unwrap();
        assert_eq!(v["type"], "image_url");
        assert_eq!(v["image_url"], "data:image/png;base64,AAAA");

        let doc = DocumentSource::DocumentUrl {
            document_url: "https://signed.example/doc".into(),
        };
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["type"], "document_url");
        assert_eq!(v["document_url"], "https://signed.example/doc");
    }

    #[test]
    fn base_url_trailing_slash_is_normalised() {
        let client = MistralClient::with_base_url("key", "https://api.example/");
        assert_eq!(client.url("/v1/ocr"), "https://api.example/v1/ocr");
    }

    #[test]
    fn uploaded_file_deserialises_id() {
        let uploaded: UploadedFile =
            serde_json::from_str(r#"{"id": "file-abc", "object": "file", "bytes": 1024}"#).unwrap();
        assert_eq!(uploaded.id, "file-abc");
    }
}
