use std::collections::BTreeMap;

use super::{Config, ConfigSource};

fn source_label(source: Option<&ConfigSource>) -> String {
    source.copied().unwrap_or(ConfigSource::Default).as_str().to_string()
}

impl Config {
    /// Get effective configuration as key-value pairs with source attribution
    ///
    /// Keys are sorted so `adcraft config` output is stable.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add_config = |key: &str, value: String| {
            let source = source_label(self.source_attribution.get(key));
            config.insert(key.to_string(), (value, source));
        };

        add_config("llm_provider", self.provider().to_string());
        add_config("text_model", self.text_model().to_string());
        add_config("image_model", self.image_model().to_string());
        add_config("api_key_env", self.api_key_env().to_string());
        add_config("base_url", self.base_url().to_string());
        add_config(
            "request_timeout",
            self.request_timeout().as_secs().to_string(),
        );
        add_config("verbose", self.verbose().to_string());

        config
    }
}
