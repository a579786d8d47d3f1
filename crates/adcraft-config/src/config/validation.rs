use adcraft_utils::error::ConfigError;

use super::{Config, DEFAULT_PROVIDER, MAX_REQUEST_TIMEOUT_SECS, MIN_REQUEST_TIMEOUT_SECS};

fn invalid(key: &str, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    }
}

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if let Some(request_timeout) = self.defaults.request_timeout {
            if request_timeout < MIN_REQUEST_TIMEOUT_SECS {
                return Err(invalid(
                    "request_timeout",
                    format!("must be at least {MIN_REQUEST_TIMEOUT_SECS} seconds"),
                ));
            }
            if request_timeout > MAX_REQUEST_TIMEOUT_SECS {
                return Err(invalid(
                    "request_timeout",
                    format!("exceeds maximum limit of {MAX_REQUEST_TIMEOUT_SECS} seconds"),
                ));
            }
        }

        if let Some(provider) = &self.llm.provider
            && provider != DEFAULT_PROVIDER
        {
            return Err(invalid(
                "llm_provider",
                format!("'{provider}' is not supported (only '{DEFAULT_PROVIDER}')"),
            ));
        }

        let gemini = &self.llm.gemini;
        for (key, value) in [
            ("text_model", &gemini.text_model),
            ("image_model", &gemini.image_model),
            ("api_key_env", &gemini.api_key_env),
            ("base_url", &gemini.base_url),
        ] {
            if let Some(value) = value
                && value.trim().is_empty()
            {
                return Err(invalid(key, "must not be empty"));
            }
        }

        if let Some(base_url) = &gemini.base_url
            && !(base_url.starts_with("https://") || base_url.starts_with("http://"))
        {
            return Err(invalid(
                "base_url",
                format!("'{base_url}' must start with http:// or https://"),
            ));
        }

        Ok(())
    }
}
