//! Generative backends for adcraft
//!
//! Two capabilities are abstracted behind traits so the orchestrator can be
//! driven by test doubles: [`TextBackend`] for schema-constrained JSON and
//! [`ImageBackend`] for image generation. [`GeminiBackend`] implements both
//! against the Gemini REST API.

mod gemini_backend;
pub(crate) mod http_client;
mod types;

pub use adcraft_config as config;

pub use gemini_backend::GeminiBackend;
pub use types::{
    GeneratedImage, ImageBackend, ImageRequest, ImageResult, JPEG_MIME_TYPE, JSON_MIME_TYPE,
    StructuredRequest, TextBackend, TextResult,
};
pub use adcraft_utils::error::LlmError;

use std::sync::Arc;

use crate::config::Config;

/// The pair of backends an ad generation needs.
#[derive(Clone)]
pub struct Backends {
    pub text: Arc<dyn TextBackend>,
    pub image: Arc<dyn ImageBackend>,
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends").finish_non_exhaustive()
    }
}

/// Create the text and image backends from configuration.
///
/// ## Supported Providers
///
/// - **`gemini`**: Gemini `generateContent` for text, Imagen `predict` for images
///
/// If no provider is specified in the configuration, defaults to `gemini`.
/// The API key is read from the environment here, once; callers treat a
/// `Misconfiguration` as a fatal startup condition.
///
/// # Errors
///
/// Returns `LlmError::Unsupported` if the provider is unknown.
///
/// Returns `LlmError::Misconfiguration` if the API key is missing or the HTTP
/// client cannot be constructed.
pub fn from_config(config: &Config) -> Result<Backends, LlmError> {
    match config.provider() {
        "gemini" => {
            let backend = Arc::new(GeminiBackend::new_from_config(config)?);
            Ok(Backends {
                text: backend.clone(),
                image: backend,
            })
        }
        unknown => Err(LlmError::Unsupported(format!(
            "Unknown LLM provider '{unknown}'. Supported providers: gemini."
        ))),
    }
}

#[cfg(test)]
mod factory_tests {
    use super::*;

    #[test]
    fn test_unknown_provider_fails_cleanly() {
        let mut config = Config::minimal_for_testing();
        config.llm.provider = Some("invalid-provider".to_string());

        match from_config(&config) {
            Err(LlmError::Unsupported(msg)) => {
                assert!(msg.contains("invalid-provider"));
                assert!(msg.contains("Unknown LLM provider"));
            }
            other => panic!("Expected LlmError::Unsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_key_is_misconfiguration() {
        let mut config = Config::minimal_for_testing();
        config.llm.gemini.api_key_env = Some("ADCRAFT_FACTORY_KEY_NEVER_SET".to_string());

        assert!(matches!(
            from_config(&config),
            Err(LlmError::Misconfiguration(_))
        ));
    }
}
