//! Backend traits and the request/result types that cross them.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

pub use adcraft_utils::error::LlmError;

/// MIME type requested for structured text responses.
pub const JSON_MIME_TYPE: &str = "application/json";

/// MIME type requested for generated images.
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// A single-turn prompt whose answer must be JSON matching `response_schema`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRequest {
    pub prompt: String,
    /// OpenAPI-style schema object understood by the provider.
    pub response_schema: Value,
    pub response_mime_type: String,
}

impl StructuredRequest {
    /// Request a JSON response constrained by `schema`.
    #[must_use]
    pub fn json(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: schema,
            response_mime_type: JSON_MIME_TYPE.to_string(),
        }
    }
}

/// Raw output of a structured text call.
///
/// `raw_response` is untrusted model output; it may be empty or not JSON at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResult {
    pub raw_response: String,
    /// Provider name (e.g., "gemini")
    pub provider: String,
    pub model: String,
    /// Why the provider stopped or blocked, when it says so.
    pub finish_reason: Option<String>,
}

impl TextResult {
    #[must_use]
    pub fn new(
        raw_response: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            raw_response: raw_response.into(),
            provider: provider.into(),
            model: model.into(),
            finish_reason: None,
        }
    }
}

/// Image generation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub number_of_images: u32,
    pub mime_type: String,
    /// Width:height, e.g. `"1:1"`.
    pub aspect_ratio: String,
}

impl ImageRequest {
    /// Exactly one square JPEG.
    #[must_use]
    pub fn single_square_jpeg(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            number_of_images: 1,
            mime_type: JPEG_MIME_TYPE.to_string(),
            aspect_ratio: "1:1".to_string(),
        }
    }
}

/// One generated image as returned by the provider: base64 text plus its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub base64_data: String,
}

impl GeneratedImage {
    #[must_use]
    pub fn new(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64_data: base64_data.into(),
        }
    }

    /// Decode the payload into raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns the decode error if the payload is not standard base64.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.base64_data.trim())
    }

    /// Displayable reference: `data:<mime>;base64,<payload>`.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data.trim())
    }

    /// Parse a `data:<mime>;base64,<payload>` reference back into an image.
    ///
    /// Returns `None` for anything that is not a base64 data URI.
    #[must_use]
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.trim().strip_prefix("data:")?;
        let (mime_type, payload) = rest.split_once(";base64,")?;
        if mime_type.is_empty() {
            return None;
        }
        Some(Self::new(mime_type, payload))
    }
}

/// Output of an image call. May hold zero images; callers decide whether that is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    pub images: Vec<GeneratedImage>,
    pub provider: String,
    pub model: String,
}

/// Structured (schema-constrained JSON) text generation.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `LlmError` for transport, auth, quota, outage or timeout failures.
    async fn generate_structured(&self, req: StructuredRequest) -> Result<TextResult, LlmError>;
}

/// Image generation.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `LlmError` for transport, auth, quota, outage or timeout failures.
    async fn generate_images(&self, req: ImageRequest) -> Result<ImageResult, LlmError>;
}
