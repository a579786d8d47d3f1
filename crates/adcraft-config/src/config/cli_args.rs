use std::path::PathBuf;

/// CLI arguments that participate in configuration precedence.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file; skips upward discovery.
    pub config_path: Option<PathBuf>,
    pub text_model: Option<String>,
    pub image_model: Option<String>,
    pub request_timeout: Option<u64>,
    pub verbose: Option<bool>,
}
