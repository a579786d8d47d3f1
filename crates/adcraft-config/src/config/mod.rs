//! Configuration management for adcraft
//!
//! This module provides hierarchical configuration with discovery and precedence:
//! CLI > file > defaults. Supports TOML configuration files with `[defaults]`,
//! `[llm]` and `[llm.gemini]` sections.

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use adcraft_utils::types::ConfigSource;
pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use model::*;

use std::time::Duration;

impl Config {
    /// Transport timeout applied to every provider request.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.defaults
                .request_timeout
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.defaults.verbose.unwrap_or(false)
    }

    #[must_use]
    pub fn provider(&self) -> &str {
        self.llm.provider.as_deref().unwrap_or(DEFAULT_PROVIDER)
    }

    #[must_use]
    pub fn text_model(&self) -> &str {
        self.llm
            .gemini
            .text_model
            .as_deref()
            .unwrap_or(DEFAULT_TEXT_MODEL)
    }

    #[must_use]
    pub fn image_model(&self) -> &str {
        self.llm
            .gemini
            .image_model
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_MODEL)
    }

    /// Name of the environment variable holding the API key.
    #[must_use]
    pub fn api_key_env(&self) -> &str {
        self.llm
            .gemini
            .api_key_env
            .as_deref()
            .unwrap_or(DEFAULT_API_KEY_ENV)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.llm
            .gemini
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Config {
    /// Create a minimal Config for testing purposes
    ///
    /// This creates a Config with default values suitable for unit tests
    /// that don't require full configuration discovery.
    #[must_use]
    pub fn minimal_for_testing() -> Self {
        Config {
            defaults: Defaults::default(),
            llm: LlmConfig::default(),
            source_attribution: std::collections::HashMap::new(),
        }
    }
}
