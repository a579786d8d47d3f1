//! Test doubles and fixtures for the orchestrator and wizard.
//!
//! Available to other crates through the `test-utils` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use adcraft_utils::error::{GenerationError, ImageGenerationError};
use adcraft_utils::test_support::tiny_jpeg_base64;
use async_trait::async_trait;

use crate::llm::{
    GeneratedImage, ImageBackend, ImageRequest, ImageResult, LlmError, StructuredRequest,
    TextBackend, TextResult,
};
use crate::model::{AdContent, AdCreative, AdData, AdFormData, TargetingSuggestions};
use crate::orchestrator::AdGenerator;

/// Shared call counter handed out before a double is moved into an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicU32>);

impl CallCounter {
    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Last value a double received.
#[derive(Debug)]
pub struct Recorded<T>(Arc<Mutex<Option<T>>>);

impl<T> Clone for Recorded<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Default for Recorded<T> {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(None)))
    }
}

impl<T: Clone> Recorded<T> {
    fn set(&self, value: T) {
        *self.0.lock().unwrap_or_else(|e| e.into_inner()) = Some(value);
    }

    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Text backend returning a fixed answer.
pub struct FakeTextBackend {
    outcome: Result<String, LlmError>,
    calls: CallCounter,
    last_request: Recorded<StructuredRequest>,
}

impl FakeTextBackend {
    #[must_use]
    pub fn responding(raw: impl Into<String>) -> Self {
        Self {
            outcome: Ok(raw.into()),
            calls: CallCounter::default(),
            last_request: Recorded::default(),
        }
    }

    #[must_use]
    pub fn failing(err: LlmError) -> Self {
        Self {
            outcome: Err(err),
            calls: CallCounter::default(),
            last_request: Recorded::default(),
        }
    }

    #[must_use]
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }

    #[must_use]
    pub fn last_request(&self) -> Recorded<StructuredRequest> {
        self.last_request.clone()
    }
}

#[async_trait]
impl TextBackend for FakeTextBackend {
    async fn generate_structured(&self, req: StructuredRequest) -> Result<TextResult, LlmError> {
        self.calls.bump();
        self.last_request.set(req);
        self.outcome
            .clone()
            .map(|raw| TextResult::new(raw, "fake", "fake-text"))
    }
}

/// Image backend returning a fixed set of images.
pub struct FakeImageBackend {
    outcome: Result<Vec<GeneratedImage>, LlmError>,
    calls: CallCounter,
    last_request: Recorded<ImageRequest>,
}

impl FakeImageBackend {
    #[must_use]
    pub fn returning(images: Vec<GeneratedImage>) -> Self {
        Self {
            outcome: Ok(images),
            calls: CallCounter::default(),
            last_request: Recorded::default(),
        }
    }

    #[must_use]
    pub fn failing(err: LlmError) -> Self {
        Self {
            outcome: Err(err),
            calls: CallCounter::default(),
            last_request: Recorded::default(),
        }
    }

    #[must_use]
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }

    #[must_use]
    pub fn last_request(&self) -> Recorded<ImageRequest> {
        self.last_request.clone()
    }
}

#[async_trait]
impl ImageBackend for FakeImageBackend {
    async fn generate_images(&self, req: ImageRequest) -> Result<ImageResult, LlmError> {
        self.calls.bump();
        self.last_request.set(req);
        self.outcome.clone().map(|images| ImageResult {
            images,
            provider: "fake".to_string(),
            model: "fake-image".to_string(),
        })
    }
}

/// Generator that plays back queued outcomes, then succeeds with the sample ad.
#[derive(Default)]
pub struct ScriptedGenerator {
    outcomes: Mutex<VecDeque<Result<AdData, GenerationError>>>,
    calls: CallCounter,
    last_form: Recorded<AdFormData>,
    delay: Option<Duration>,
}

impl ScriptedGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for the next call.
    #[must_use]
    pub fn then(self, outcome: Result<AdData, GenerationError>) -> Self {
        self.outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcome);
        self
    }

    /// Queue the "No image was generated." failure.
    #[must_use]
    pub fn then_no_image(self) -> Self {
        self.then(Err(GenerationError::new(ImageGenerationError::NoImage)))
    }

    /// Sleep this long before answering each call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    #[must_use]
    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }

    #[must_use]
    pub fn last_form(&self) -> Recorded<AdFormData> {
        self.last_form.clone()
    }
}

#[async_trait]
impl AdGenerator for ScriptedGenerator {
    async fn generate_full_ad(&self, form: AdFormData) -> Result<AdData, GenerationError> {
        self.calls.bump();
        self.last_form.set(form);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self
            .outcomes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        next.unwrap_or_else(|| Ok(artisan_coffee_ad()))
    }
}

#[must_use]
pub fn artisan_coffee_form() -> AdFormData {
    AdFormData::new(
        "Artisan Coffee",
        "Small-batch roasted coffee beans",
        "Urban professionals 25-40 who value sustainability",
    )
}

#[must_use]
pub fn artisan_coffee_content() -> AdContent {
    AdContent {
        creative: AdCreative {
            headline: "Fresh Roasted Daily".to_string(),
            primary_text: "Taste the difference of small-batch coffee.".to_string(),
        },
        targeting: TargetingSuggestions {
            interests: vec!["coffee".to_string(), "sustainability".to_string()],
            locations: vec!["Seattle".to_string(), "Portland".to_string()],
            age_range: "25-40".to_string(),
        },
    }
}

/// The content fixture as the text model would return it.
#[must_use]
pub fn artisan_coffee_content_json() -> String {
    serde_json::to_string(&artisan_coffee_content()).unwrap_or_default()
}

/// A JPEG-shaped 4-byte payload.
#[must_use]
pub fn tiny_image() -> GeneratedImage {
    GeneratedImage::new("image/jpeg", tiny_jpeg_base64())
}

#[must_use]
pub fn artisan_coffee_ad() -> AdData {
    AdData::from_parts(artisan_coffee_content(), tiny_image().to_data_uri())
}
