use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use adcraft_utils::types::ConfigSource;

/// Default transport timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
/// Lower bound for `request_timeout`.
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 5;
/// Upper bound for `request_timeout`.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for adcraft.
///
/// `Config` provides hierarchical configuration with discovery and precedence:
/// CLI arguments > config file > built-in defaults.
///
/// # Discovery
///
/// Use [`Config::discover()`] for CLI-like behavior that:
/// - Searches for `.adcraft/config.toml` upward from the current directory
/// - Stops at repository root markers (`.git`, `.hg`, `.svn`)
/// - Applies built-in defaults for unspecified values
///
/// # Programmatic Configuration
///
/// For embedding scenarios use [`Config::builder()`], which never touches the
/// filesystem.
///
/// # Source Attribution
///
/// Each configuration value tracks its source (`cli`, `config`, `programmatic`, or `default`)
/// for `adcraft config` output.
///
/// # Example
///
/// ```rust,no_run
/// use adcraft_config::{CliArgs, Config};
///
/// let config = Config::discover(&CliArgs::default())?;
/// println!("Text model: {}", config.text_model());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Configuration File Format
///
/// ```toml
/// [defaults]
/// request_timeout = 120
/// verbose = false
///
/// [llm]
/// provider = "gemini"
///
/// [llm.gemini]
/// api_key_env = "API_KEY"
/// text_model = "gemini-2.5-flash"
/// image_model = "imagen-4.0-generate-001"
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Default values for general settings.
    pub defaults: Defaults,
    /// LLM provider configuration.
    pub llm: LlmConfig,
    /// Source attribution for each setting (for `adcraft config`).
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// Default configuration values
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    pub verbose: Option<bool>,
    /// Transport timeout in seconds for each provider request.
    pub request_timeout: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            verbose: Some(false),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Only `"gemini"` is supported.
    pub provider: Option<String>,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Gemini / Imagen REST provider configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeminiConfig {
    /// Environment variable that holds the API key.
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    /// Model used for structured ad copy and targeting.
    pub text_model: Option<String>,
    /// Model used for the ad image.
    pub image_model: Option<String>,
}
