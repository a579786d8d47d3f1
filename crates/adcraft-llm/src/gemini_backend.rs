//! Gemini / Imagen REST backend
//!
//! Structured text goes through `models/{model}:generateContent` with a response
//! schema; images go through `models/{model}:predict`. Both authenticate with the
//! `x-goog-api-key` header.

use adcraft_config::Config;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::LlmError;
use crate::http_client::HttpClient;
use crate::types::{
    GeneratedImage, ImageBackend, ImageRequest, ImageResult, StructuredRequest, TextBackend,
    TextResult,
};

const PROVIDER: &str = "gemini";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini backend for both structured text and image generation.
#[derive(Clone)]
pub struct GeminiBackend {
    client: Arc<HttpClient>,
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
    request_timeout: Duration,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl GeminiBackend {
    /// Create a new Gemini backend
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be constructed
    pub fn new(
        api_key: String,
        base_url: impl Into<String>,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = HttpClient::new()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            text_model: text_model.into(),
            image_model: image_model.into(),
            request_timeout,
        })
    }

    /// Create a new Gemini backend from configuration
    ///
    /// The API key is read once, here, from the variable named by
    /// `[llm.gemini] api_key_env` (default `API_KEY`).
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if:
    /// - The API key environment variable is not set or is blank
    /// - The HTTP client cannot be constructed
    pub fn new_from_config(config: &Config) -> Result<Self, LlmError> {
        let api_key_env = config.api_key_env();

        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LlmError::Misconfiguration(format!(
                    "Gemini API key not found in environment variable '{api_key_env}'. \
                     Please set this variable or configure a different api_key_env in [llm.gemini]."
                ))
            })?;

        Self::new(
            api_key,
            config.base_url(),
            config.text_model(),
            config.image_model(),
            config.request_timeout(),
        )
    }

    #[must_use]
    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    #[must_use]
    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, LlmError> {
        let request = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("content-type", "application/json")
            .json(body);

        self.client
            .execute_once(request, self.request_timeout, PROVIDER)
            .await
    }
}

#[async_trait]
impl TextBackend for GeminiBackend {
    async fn generate_structured(&self, req: StructuredRequest) -> Result<TextResult, LlmError> {
        debug!(
            provider = PROVIDER,
            model = %self.text_model,
            prompt_chars = req.prompt.len(),
            "Requesting structured content"
        );

        let body = GenerateContentRequest::from_structured(req);
        let url = self.endpoint(&self.text_model, "generateContent");
        let response = self.post_json(&url, &body).await?;

        let response_body: GenerateContentResponse = response.json().await.map_err(|e| {
            LlmError::Transport(format!("Failed to parse Gemini response: {e}"))
        })?;

        let mut result = TextResult::new(
            response_body.first_candidate_text(),
            PROVIDER,
            self.text_model.clone(),
        );
        result.finish_reason = response_body.stop_reason();

        debug!(
            provider = PROVIDER,
            response_chars = result.raw_response.len(),
            finish_reason = ?result.finish_reason,
            "Structured content received"
        );

        Ok(result)
    }
}

#[async_trait]
impl ImageBackend for GeminiBackend {
    async fn generate_images(&self, req: ImageRequest) -> Result<ImageResult, LlmError> {
        debug!(
            provider = PROVIDER,
            model = %self.image_model,
            count = req.number_of_images,
            aspect_ratio = %req.aspect_ratio,
            "Requesting image"
        );

        let default_mime = req.mime_type.clone();
        let body = PredictRequest::from_image_request(req);
        let url = self.endpoint(&self.image_model, "predict");
        let response = self.post_json(&url, &body).await?;

        let response_body: PredictResponse = response.json().await.map_err(|e| {
            LlmError::Transport(format!("Failed to parse Imagen response: {e}"))
        })?;

        let images: Vec<GeneratedImage> = response_body
            .predictions
            .into_iter()
            .filter_map(|prediction| {
                if let Some(reason) = &prediction.rai_filtered_reason {
                    debug!(provider = PROVIDER, reason = %reason, "Image filtered by provider");
                }
                let data = prediction.bytes_base64_encoded?;
                let mime = prediction.mime_type.unwrap_or_else(|| default_mime.clone());
                Some(GeneratedImage::new(mime, data))
            })
            .collect();

        debug!(provider = PROVIDER, images = images.len(), "Image response received");

        Ok(ImageResult {
            images,
            provider: PROVIDER.to_string(),
            model: self.image_model.clone(),
        })
    }
}

/// `generateContent` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    fn from_structured(req: StructuredRequest) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: req.prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: req.response_mime_type,
                response_schema: req.response_schema,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

/// `generateContent` response body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate; empty when there is none.
    fn first_candidate_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn stop_reason(&self) -> Option<String> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone())
            .or_else(|| {
                self.candidates
                    .first()
                    .and_then(|candidate| candidate.finish_reason.clone())
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// `predict` request body
#[derive(Debug, Clone, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

impl PredictRequest {
    fn from_image_request(req: ImageRequest) -> Self {
        Self {
            instances: vec![PredictInstance { prompt: req.prompt }],
            parameters: PredictParameters {
                sample_count: req.number_of_images,
                output_options: OutputOptions {
                    mime_type: req.mime_type,
                },
                aspect_ratio: req.aspect_ratio,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    output_options: OutputOptions,
    aspect_ratio: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: String,
}

/// `predict` response body
#[derive(Debug, Clone, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
    rai_filtered_reason: Option<String>,
}
