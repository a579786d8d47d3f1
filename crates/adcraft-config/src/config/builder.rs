use std::collections::HashMap;
use std::time::Duration;

use adcraft_utils::error::ConfigError;

use super::{Config, ConfigSource, Defaults, GeminiConfig, LlmConfig};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when you need to configure adcraft without relying on config
    /// files. This is the recommended approach for embedding the wizard in other
    /// applications.
    ///
    /// # Example
    ///
    /// ```rust
    /// use adcraft_config::Config;
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .text_model("gemini-2.5-flash")
    ///     .request_timeout(Duration::from_secs(60))
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.request_timeout(), Duration::from_secs(60));
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for programmatic configuration of adcraft.
///
/// All values set via the builder are attributed to `ConfigSource::Programmatic`
/// in the resulting `Config`'s source attribution map. Unset values fall back
/// to the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    request_timeout: Option<Duration>,
    verbose: Option<bool>,
    text_model: Option<String>,
    image_model: Option<String>,
    api_key_env: Option<String>,
    base_url: Option<String>,
}

impl ConfigBuilder {
    /// Create a new `ConfigBuilder` with no values set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transport timeout (5 to 300 seconds, whole seconds).
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    #[must_use]
    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = Some(model.into());
        self
    }

    #[must_use]
    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = Some(model.into());
        self
    }

    /// Name of the environment variable the backend reads the API key from.
    #[must_use]
    pub fn api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = Some(name.into());
        self
    }

    /// Override the REST base URL (used by tests to point at a mock server).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Build the configuration and validate it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is out of range.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut source_attribution = HashMap::new();
        let mut defaults = Defaults::default();
        let mut gemini = GeminiConfig::default();

        let mut attribute = |key: &str, set: bool| {
            let source = if set {
                ConfigSource::Programmatic
            } else {
                ConfigSource::Default
            };
            source_attribution.insert(key.to_string(), source);
        };

        attribute("request_timeout", self.request_timeout.is_some());
        if let Some(timeout) = self.request_timeout {
            defaults.request_timeout = Some(timeout.as_secs());
        }
        attribute("verbose", self.verbose.is_some());
        if self.verbose.is_some() {
            defaults.verbose = self.verbose;
        }

        attribute("text_model", self.text_model.is_some());
        attribute("image_model", self.image_model.is_some());
        attribute("api_key_env", self.api_key_env.is_some());
        attribute("base_url", self.base_url.is_some());
        attribute("llm_provider", false);
        gemini.text_model = self.text_model;
        gemini.image_model = self.image_model;
        gemini.api_key_env = self.api_key_env;
        gemini.base_url = self.base_url;

        let config = Config {
            defaults,
            llm: LlmConfig {
                provider: None,
                gemini,
            },
            source_attribution,
        };

        config.validate()?;
        Ok(config)
    }
}
