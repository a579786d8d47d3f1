use std::fmt;
use std::io;
use std::time::Duration;
use thiserror::Error;

use crate::redaction::redact_secrets;

/// Library-level error type with rich context and user-friendly reporting.
///
/// `AdcraftError` is the primary error type returned by adcraft library operations.
/// It provides:
/// - Detailed error information for programmatic handling
/// - User-friendly messages with context and suggestions
/// - Mapping to CLI exit codes for consistent error reporting
///
/// # Exit Code Mapping
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration, missing credential, invalid input |
/// | 10 | Provider timeout |
/// | 70 | Generation or provider failure |
/// | 1 | Other errors |
///
/// # Example
///
/// ```rust
/// use adcraft_utils::error::{AdcraftError, ConfigError};
/// use adcraft_utils::exit_codes::ExitCode;
///
/// let err = AdcraftError::Config(ConfigError::InvalidFile("bad toml".to_string()));
/// assert_eq!(err.to_exit_code(), ExitCode::CLI_ARGS);
/// assert!(err.display_for_user().contains("Suggestions:"));
/// ```
///
/// Library code returns `AdcraftError` and does NOT call `std::process::exit()`.
#[derive(Error, Debug)]
pub enum AdcraftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM backend error: {0}")]
    Llm(#[from] LlmError),

    #[error("{0}")]
    Generation(#[from] GenerationError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Provider,
    Generation,
    Navigation,
    FileSystem,
    Validation,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Provider => write!(f, "Provider"),
            Self::Generation => write!(f, "Generation"),
            Self::Navigation => write!(f, "Navigation"),
            Self::FileSystem => write!(f, "File System"),
            Self::Validation => write!(f, "Validation"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Configuration discovery failed: {reason}")]
    DiscoveryFailed { reason: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::MissingRequired(key) => {
                format!("Required configuration '{key}' is missing")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => {
                format!("Configuration file not found: {path}")
            }
            Self::DiscoveryFailed { reason } => {
                format!("Failed to discover configuration: {reason}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "Configuration files must be valid TOML with optional [defaults] and [llm.gemini] sections."
                    .to_string(),
            ),
            Self::MissingRequired(_) => None,
            Self::InvalidValue { key, .. } => Some(format!(
                "The '{key}' configuration option has specific format requirements."
            )),
            Self::NotFound { .. } | Self::DiscoveryFailed { .. } => Some(
                "adcraft searches for .adcraft/config.toml starting from the current directory upward."
                    .to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax using a TOML validator".to_string(),
                "Remove unknown keys from the file".to_string(),
            ],
            Self::MissingRequired(key) => vec![format!(
                "Add '{key}' to .adcraft/config.toml or pass it as a CLI flag"
            )],
            Self::InvalidValue { key, .. } => match key.as_str() {
                "request_timeout" => vec![
                    "Use a timeout between 5 and 300 seconds".to_string(),
                    "Remove the option to use the default of 120 seconds".to_string(),
                ],
                "text_model" | "image_model" => vec![
                    "Use a non-empty model name (e.g., 'gemini-2.5-flash', 'imagen-4.0-generate-001')"
                        .to_string(),
                ],
                _ => vec!["Remove the option to use the default value".to_string()],
            },
            Self::NotFound { .. } => vec![
                "Check the path passed to --config".to_string(),
                "Omit --config to use discovery and built-in defaults".to_string(),
            ],
            Self::DiscoveryFailed { .. } => vec![
                "Check read permissions on the current directory and its parents".to_string(),
                "Use --config <path> to specify a configuration file explicitly".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Errors that can occur during LLM backend operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmError {
    /// Transport-level failure (HTTP connectivity, undecodable body)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider authentication failure (401, 403)
    #[error("Provider authentication error: {0}")]
    ProviderAuth(String),

    /// Provider quota/rate limit exceeded (429)
    #[error("Provider quota exceeded: {0}")]
    ProviderQuota(String),

    /// Provider service outage (5xx errors)
    #[error("Provider outage: {0}")]
    ProviderOutage(String),

    /// Invocation timed out
    #[error("Timeout after {duration:?}")]
    Timeout { duration: Duration },

    /// Configuration error, including a missing API key
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    /// Unsupported feature or provider
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl UserFriendlyError for LlmError {
    fn user_message(&self) -> String {
        match self {
            Self::Transport(msg) => format!("LLM transport error: {msg}"),
            Self::ProviderAuth(msg) => format!("LLM provider authentication failed: {msg}"),
            Self::ProviderQuota(msg) => format!("LLM provider quota exceeded: {msg}"),
            Self::ProviderOutage(msg) => format!("LLM provider service outage: {msg}"),
            Self::Timeout { duration } => {
                format!("LLM invocation timed out after {duration:?}")
            }
            Self::Misconfiguration(msg) => format!("LLM configuration error: {msg}"),
            Self::Unsupported(msg) => format!("LLM feature not supported: {msg}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Transport(_) => Some(
                "Transport errors occur when the Gemini API cannot be reached or returns an unreadable body."
                    .to_string(),
            ),
            Self::ProviderAuth(_) => {
                Some("Authentication errors indicate a missing or invalid API key.".to_string())
            }
            Self::ProviderQuota(_) => Some(
                "Quota errors occur when rate limits or usage limits are exceeded.".to_string(),
            ),
            Self::ProviderOutage(_) => {
                Some("Provider outages are temporary service disruptions.".to_string())
            }
            Self::Timeout { .. } => Some(
                "Timeouts occur when a request takes longer than the configured request_timeout."
                    .to_string(),
            ),
            Self::Misconfiguration(_) => Some(
                "The API key is read from the environment once, when adcraft starts.".to_string(),
            ),
            Self::Unsupported(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Transport(_) => vec![
                "Verify network connectivity".to_string(),
                "Try running with --verbose to see detailed error information".to_string(),
            ],
            Self::ProviderAuth(_) => vec![
                "Verify the API key is valid and has access to the Gemini and Imagen models"
                    .to_string(),
            ],
            Self::ProviderQuota(_) | Self::ProviderOutage(_) => vec![
                "Wait a few minutes and try again".to_string(),
                "Check your usage dashboard in Google AI Studio".to_string(),
            ],
            Self::Timeout { .. } => vec![
                "Increase the timeout with --request-timeout or [defaults] request_timeout"
                    .to_string(),
            ],
            Self::Misconfiguration(_) => vec![
                "Export the API key, e.g. `export API_KEY=...`".to_string(),
                "Or point [llm.gemini] api_key_env at the variable that holds your key".to_string(),
            ],
            Self::Unsupported(_) => vec!["Use provider = \"gemini\"".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Misconfiguration(_) | Self::Unsupported(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::Provider,
        }
    }
}

/// Failure of the text/targeting sub-task.
#[derive(Debug, Error)]
pub enum ContentGenerationError {
    #[error("Failed to generate ad content: {0}")]
    Backend(#[from] LlmError),

    #[error("Failed to generate ad content: the model returned an empty response")]
    EmptyResponse,

    #[error("Failed to generate ad content: response does not match the ad schema: {0}")]
    Malformed(String),
}

/// Failure of the image sub-task.
#[derive(Debug, Error)]
pub enum ImageGenerationError {
    #[error("Failed to generate ad image: {0}")]
    Backend(#[from] LlmError),

    #[error("Failed to generate ad image: No image was generated.")]
    NoImage,

    #[error("Failed to generate ad image: image payload is not valid base64: {0}")]
    InvalidPayload(String),
}

/// Which sub-task sank the generation cycle.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error(transparent)]
    Content(#[from] ContentGenerationError),

    #[error(transparent)]
    Image(#[from] ImageGenerationError),
}

/// The single consolidated failure raised by the ad generation orchestrator.
///
/// Its display text is what the wizard shows in the error banner:
/// `Ad generation failed: <cause>`.
#[derive(Debug, Error)]
#[error("Ad generation failed: {cause}")]
pub struct GenerationError {
    #[source]
    cause: GenerationFailure,
}

impl GenerationError {
    #[must_use]
    pub fn new(cause: impl Into<GenerationFailure>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    #[must_use]
    pub fn cause(&self) -> &GenerationFailure {
        &self.cause
    }

    /// The backend error underneath, if the failure came from the provider.
    #[must_use]
    pub fn llm_error(&self) -> Option<&LlmError> {
        match &self.cause {
            GenerationFailure::Content(ContentGenerationError::Backend(e))
            | GenerationFailure::Image(ImageGenerationError::Backend(e)) => Some(e),
            _ => None,
        }
    }
}

impl From<ContentGenerationError> for GenerationError {
    fn from(err: ContentGenerationError) -> Self {
        Self::new(err)
    }
}

impl From<ImageGenerationError> for GenerationError {
    fn from(err: ImageGenerationError) -> Self {
        Self::new(err)
    }
}

impl UserFriendlyError for GenerationError {
    fn user_message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Option<String> {
        match &self.cause {
            GenerationFailure::Content(_) => Some(
                "Ad copy and targeting are requested as schema-constrained JSON; any failure discards the whole ad."
                    .to_string(),
            ),
            GenerationFailure::Image(_) => Some(
                "The ad image is requested separately; any failure discards the whole ad."
                    .to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        let mut suggestions = self
            .llm_error()
            .map(|e| e.suggestions())
            .unwrap_or_default();
        suggestions.push("Run the generation again; nothing is retried automatically".to_string());
        if matches!(
            self.cause,
            GenerationFailure::Image(ImageGenerationError::NoImage)
        ) {
            suggestions.push(
                "Rephrase the product description; the image model may have filtered the prompt"
                    .to_string(),
            );
        }
        suggestions
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Generation
    }
}

/// Rejected wizard navigation or mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// A stage guard failed; this is UI-local validation and carries no banner text.
    #[error("Cannot leave the {stage} stage: required fields are blank")]
    GuardRejected { stage: &'static str },

    #[error("Cannot {action} from the {stage} stage")]
    InvalidTransition {
        stage: &'static str,
        action: &'static str,
    },

    #[error("Form fields cannot change while an ad is being generated")]
    FormLocked,

    #[error("Generation result for entry {got} does not match the active entry {expected:?}")]
    StaleGeneration { expected: Option<u64>, got: u64 },
}

impl UserFriendlyError for WizardError {
    fn user_message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Option<String> {
        None
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::GuardRejected { .. } => {
                vec!["Fill in every field on this step before continuing".to_string()]
            }
            _ => Vec::new(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::GuardRejected { .. } => ErrorCategory::Validation,
            _ => ErrorCategory::Navigation,
        }
    }
}

impl UserFriendlyError for AdcraftError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(e) => e.user_message(),
            Self::Llm(e) => e.user_message(),
            Self::Generation(e) => e.user_message(),
            Self::Wizard(e) => e.user_message(),
            Self::Io(e) => format!("File operation failed: {e}"),
            Self::InvalidInput { field, reason } => format!("Invalid {field}: {reason}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(e) => e.context(),
            Self::Llm(e) => e.context(),
            Self::Generation(e) => e.context(),
            Self::Wizard(e) => e.context(),
            Self::Io(_) => None,
            Self::InvalidInput { .. } => Some(
                "Product name, description and target audience must all contain text.".to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::Llm(e) => e.suggestions(),
            Self::Generation(e) => e.suggestions(),
            Self::Wizard(e) => e.suggestions(),
            Self::Io(_) => vec!["Check that the target directory exists and is writable".to_string()],
            Self::InvalidInput { field, .. } => {
                vec![format!("Pass a non-blank value for --{field}")]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(e) => e.category(),
            Self::Llm(e) => e.category(),
            Self::Generation(e) => e.category(),
            Self::Wizard(e) => e.category(),
            Self::Io(_) => ErrorCategory::FileSystem,
            Self::InvalidInput { .. } => ErrorCategory::Validation,
        }
    }
}

impl AdcraftError {
    /// Get a user-friendly error message with context and actionable suggestions.
    ///
    /// ```text
    /// Error: <user message>
    ///
    /// Context: <context if available>
    ///
    /// Suggestions:
    ///   • <suggestion 1>
    /// ```
    ///
    /// The output is passed through [`redact_secrets`] before it is returned.
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error: {}\n", self.user_message()));

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        redact_secrets(&output)
    }

    /// Map this error to the appropriate CLI exit code.
    ///
    /// | Exit Code | Name | Description |
    /// |-----------|------|-------------|
    /// | 1 | INTERNAL | General failure |
    /// | 2 | CLI_ARGS | Config, credential or input problem |
    /// | 10 | TIMEOUT | Provider request timed out |
    /// | 70 | GENERATION_FAILED | Generation or provider failure |
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            AdcraftError::Config(_) => ExitCode::CLI_ARGS,
            AdcraftError::InvalidInput { .. } => ExitCode::CLI_ARGS,
            AdcraftError::Llm(llm_err) => llm_exit_code(llm_err),
            AdcraftError::Generation(generation_err) => match generation_err.llm_error() {
                Some(llm_err) => llm_exit_code(llm_err),
                None => ExitCode::GENERATION_FAILED,
            },
            AdcraftError::Wizard(WizardError::GuardRejected { .. }) => ExitCode::CLI_ARGS,
            AdcraftError::Wizard(_) | AdcraftError::Io(_) => ExitCode::INTERNAL,
        }
    }
}

fn llm_exit_code(err: &LlmError) -> crate::exit_codes::ExitCode {
    use crate::exit_codes::ExitCode;

    match err {
        LlmError::Misconfiguration(_) | LlmError::Unsupported(_) => ExitCode::CLI_ARGS,
        LlmError::Timeout { .. } => ExitCode::TIMEOUT,
        LlmError::Transport(_)
        | LlmError::ProviderAuth(_)
        | LlmError::ProviderQuota(_)
        | LlmError::ProviderOutage(_) => ExitCode::GENERATION_FAILED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::ExitCode;

    #[test]
    fn test_image_failure_message_carries_cause() {
        let err = GenerationError::from(ImageGenerationError::NoImage);
        let message = err.to_string();
        assert!(message.starts_with("Ad generation failed: "));
        assert!(message.contains("No image was generated."));
    }

    #[test]
    fn test_content_failure_message_carries_backend_cause() {
        let err = GenerationError::from(ContentGenerationError::Backend(LlmError::ProviderQuota(
            "gemini rate limit exceeded: 429".to_string(),
        )));
        let message = err.to_string();
        assert!(message.contains("Ad generation failed"));
        assert!(message.contains("Failed to generate ad content"));
        assert!(message.contains("429"));
    }

    #[test]
    fn test_generation_error_source_chain() {
        use std::error::Error as _;

        let err = GenerationError::from(ContentGenerationError::EmptyResponse);
        let source = err.source().expect("generation error should expose its cause");
        assert!(source.to_string().contains("empty response"));
    }

    #[test]
    fn test_exit_code_mapping() {
        let cases: Vec<(AdcraftError, ExitCode)> = vec![
            (
                AdcraftError::Config(ConfigError::InvalidFile("x".to_string())),
                ExitCode::CLI_ARGS,
            ),
            (
                AdcraftError::Llm(LlmError::Misconfiguration("no key".to_string())),
                ExitCode::CLI_ARGS,
            ),
            (
                AdcraftError::Generation(GenerationError::from(ImageGenerationError::Backend(
                    LlmError::Timeout {
                        duration: Duration::from_secs(5),
                    },
                ))),
                ExitCode::TIMEOUT,
            ),
            (
                AdcraftError::Generation(GenerationError::from(ImageGenerationError::NoImage)),
                ExitCode::GENERATION_FAILED,
            ),
            (
                AdcraftError::InvalidInput {
                    field: "product-name".to_string(),
                    reason: "blank".to_string(),
                },
                ExitCode::CLI_ARGS,
            ),
            (
                AdcraftError::Wizard(WizardError::FormLocked),
                ExitCode::INTERNAL,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.to_exit_code(), expected, "unexpected exit code for {err}");
        }
    }

    #[test]
    fn test_display_for_user_redacts_keys() {
        let key = format!("AIza{}", "k".repeat(35));
        let err = AdcraftError::Llm(LlmError::Transport(format!("request to ?key={key} failed")));
        let report = err.display_for_user();
        assert!(report.starts_with("Error: "));
        assert!(!report.contains(&key));
        assert!(report.contains("Suggestions:"));
    }

    #[test]
    fn test_no_image_suggests_rephrasing() {
        let err = GenerationError::from(ImageGenerationError::NoImage);
        assert!(err.suggestions().iter().any(|s| s.contains("Rephrase")));
        assert_eq!(err.category(), ErrorCategory::Generation);
    }

    #[test]
    fn test_guard_rejection_is_validation() {
        let err = WizardError::GuardRejected { stage: "audience" };
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(
            AdcraftError::from(err).to_exit_code(),
            ExitCode::CLI_ARGS
        );
    }
}
