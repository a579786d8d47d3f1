//! Ad Generation Orchestrator
//!
//! Runs the content and image sub-tasks concurrently on the current task and
//! merges them into one [`AdData`]. The first sub-task failure wins; the other
//! future is dropped and its result discarded.

use std::sync::Arc;
use std::time::Instant;

use adcraft_utils::error::{ContentGenerationError, GenerationError, ImageGenerationError};
use adcraft_utils::logging::{
    generation_span, log_advisory, log_generation_complete, log_generation_error,
    log_generation_start,
};
use async_trait::async_trait;
use tracing::{Instrument, debug};

use crate::config::Config;
use crate::llm::{Backends, ImageBackend, ImageRequest, LlmError, StructuredRequest, TextBackend};
use crate::model::{AdContent, AdData, AdFormData};
use crate::parse::parse_ad_content;
use crate::prompts::{content_prompt, image_prompt};
use crate::schema::ad_content_schema;

/// Anything that can turn form data into a complete ad.
///
/// The wizard session is generic over this so tests can script outcomes.
#[async_trait]
pub trait AdGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns a single [`GenerationError`] if either sub-task fails.
    async fn generate_full_ad(&self, form: AdFormData) -> Result<AdData, GenerationError>;
}

#[async_trait]
impl<G: AdGenerator + ?Sized> AdGenerator for Arc<G> {
    async fn generate_full_ad(&self, form: AdFormData) -> Result<AdData, GenerationError> {
        (**self).generate_full_ad(form).await
    }
}

/// Issues the two generation requests and reconciles their results.
#[derive(Clone)]
pub struct AdOrchestrator {
    text: Arc<dyn TextBackend>,
    image: Arc<dyn ImageBackend>,
    text_model: String,
    image_model: String,
}

impl std::fmt::Debug for AdOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdOrchestrator")
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish_non_exhaustive()
    }
}

impl AdOrchestrator {
    #[must_use]
    pub fn new(text: Arc<dyn TextBackend>, image: Arc<dyn ImageBackend>) -> Self {
        Self {
            text,
            image,
            text_model: "unknown".to_string(),
            image_model: "unknown".to_string(),
        }
    }

    #[must_use]
    pub fn from_backends(backends: Backends) -> Self {
        Self::new(backends.text, backends.image)
    }

    /// Build the Gemini backends from configuration.
    ///
    /// Reads the API key from the environment once.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the key is missing.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let backends = adcraft_llm::from_config(config)?;
        Ok(Self::from_backends(backends).with_model_labels(config.text_model(), config.image_model()))
    }

    /// Model names recorded on the `ad_generation` span.
    #[must_use]
    pub fn with_model_labels(
        mut self,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
    ) -> Self {
        self.text_model = text_model.into();
        self.image_model = image_model.into();
        self
    }

    /// Content sub-task: structured copy and targeting.
    ///
    /// # Errors
    ///
    /// Backend failures, empty output and schema mismatches all surface as
    /// [`ContentGenerationError`].
    pub async fn generate_content(
        &self,
        form: &AdFormData,
    ) -> Result<AdContent, ContentGenerationError> {
        let request = StructuredRequest::json(content_prompt(form), ad_content_schema());
        let result = self.text.generate_structured(request).await?;

        if result.raw_response.trim().is_empty()
            && let Some(reason) = &result.finish_reason
        {
            debug!(finish_reason = %reason, "Content response was empty");
        }

        let content = parse_ad_content(&result.raw_response)?;
        for advisory in content.advisories() {
            log_advisory(advisory.field, &advisory.detail);
        }
        Ok(content)
    }

    /// Image sub-task: one square JPEG as a `data:` URI.
    ///
    /// # Errors
    ///
    /// Backend failures, zero images and undecodable payloads all surface as
    /// [`ImageGenerationError`].
    pub async fn generate_image(&self, form: &AdFormData) -> Result<String, ImageGenerationError> {
        let request = ImageRequest::single_square_jpeg(image_prompt(form));
        let result = self.image.generate_images(request).await?;

        let image = result
            .images
            .into_iter()
            .find(|image| !image.base64_data.trim().is_empty())
            .ok_or(ImageGenerationError::NoImage)?;

        let bytes = image
            .decode()
            .map_err(|e| ImageGenerationError::InvalidPayload(e.to_string()))?;
        debug!(bytes = bytes.len(), mime = %image.mime_type, "Image decoded");

        Ok(image.to_data_uri())
    }

    /// Generate the complete ad.
    ///
    /// Performs no validation of `form`. Both sub-tasks are polled together;
    /// the first failure aborts the join and becomes the single error returned.
    /// No retries are attempted.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] ("Ad generation failed: ...") wrapping the
    /// failing sub-task's error.
    pub async fn generate_full_ad(&self, form: AdFormData) -> Result<AdData, GenerationError> {
        let span = generation_span(&form.product_name, &self.text_model, &self.image_model);
        let start = Instant::now();

        async {
            log_generation_start(&form.product_name);

            let content_task = async {
                self.generate_content(&form)
                    .await
                    .map_err(GenerationError::from)
            };
            let image_task = async {
                self.generate_image(&form)
                    .await
                    .map_err(GenerationError::from)
            };

            match tokio::try_join!(content_task, image_task) {
                Ok((content, image_url)) => {
                    log_generation_complete(&form.product_name, start.elapsed().as_millis());
                    Ok(AdData::from_parts(content, image_url))
                }
                Err(err) => {
                    log_generation_error(
                        &form.product_name,
                        &err.to_string(),
                        start.elapsed().as_millis(),
                    );
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl AdGenerator for AdOrchestrator {
    async fn generate_full_ad(&self, form: AdFormData) -> Result<AdData, GenerationError> {
        AdOrchestrator::generate_full_ad(self, form).await
    }
}
