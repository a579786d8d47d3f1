use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use adcraft_utils::error::ConfigError;

use super::{CliArgs, Config, ConfigSource, Defaults, LlmConfig};

const CONFIG_DIR: &str = ".adcraft";
const CONFIG_FILE: &str = "config.toml";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
struct TomlConfig {
    defaults: Option<TomlDefaults>,
    llm: Option<LlmConfig>,
}

/// `[defaults]` as written in the file; absent keys stay `None`.
#[derive(Debug, Default, Deserialize, Serialize)]
struct TomlDefaults {
    verbose: Option<bool>,
    request_timeout: Option<u64>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Uses current working directory for config file discovery when no explicit
    /// path is provided in cli_args.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// This is the path-driven variant used by tests to avoid process-global state.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let mut source_attribution = HashMap::new();

        let mut defaults = Defaults::default();
        let mut llm = LlmConfig::default();

        for key in [
            "verbose",
            "request_timeout",
            "llm_provider",
            "text_model",
            "image_model",
            "api_key_env",
            "base_url",
        ] {
            source_attribution.insert(key.to_string(), ConfigSource::Default);
        }

        let config_path = if let Some(explicit_path) = &cli_args.config_path {
            Some(explicit_path.clone())
        } else {
            Self::discover_config_file_from(start_dir)?
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;

            let config_source = ConfigSource::Config;

            if let Some(file_defaults) = file_config.defaults {
                if file_defaults.verbose.is_some() {
                    defaults.verbose = file_defaults.verbose;
                    source_attribution.insert("verbose".to_string(), config_source);
                }
                if file_defaults.request_timeout.is_some() {
                    defaults.request_timeout = file_defaults.request_timeout;
                    source_attribution.insert("request_timeout".to_string(), config_source);
                }
            }

            if let Some(file_llm) = file_config.llm {
                if file_llm.provider.is_some() {
                    llm.provider = file_llm.provider;
                    source_attribution.insert("llm_provider".to_string(), config_source);
                }
                let gemini = file_llm.gemini;
                if gemini.text_model.is_some() {
                    llm.gemini.text_model = gemini.text_model;
                    source_attribution.insert("text_model".to_string(), config_source);
                }
                if gemini.image_model.is_some() {
                    llm.gemini.image_model = gemini.image_model;
                    source_attribution.insert("image_model".to_string(), config_source);
                }
                if gemini.api_key_env.is_some() {
                    llm.gemini.api_key_env = gemini.api_key_env;
                    source_attribution.insert("api_key_env".to_string(), config_source);
                }
                if gemini.base_url.is_some() {
                    llm.gemini.base_url = gemini.base_url;
                    source_attribution.insert("base_url".to_string(), config_source);
                }
            }
        }

        // Apply CLI overrides (highest priority)
        if let Some(text_model) = &cli_args.text_model {
            llm.gemini.text_model = Some(text_model.clone());
            source_attribution.insert("text_model".to_string(), ConfigSource::Cli);
        }
        if let Some(image_model) = &cli_args.image_model {
            llm.gemini.image_model = Some(image_model.clone());
            source_attribution.insert("image_model".to_string(), ConfigSource::Cli);
        }
        if let Some(request_timeout) = cli_args.request_timeout {
            defaults.request_timeout = Some(request_timeout);
            source_attribution.insert("request_timeout".to_string(), ConfigSource::Cli);
        }
        if let Some(verbose) = cli_args.verbose {
            defaults.verbose = Some(verbose);
            source_attribution.insert("verbose".to_string(), ConfigSource::Cli);
        }

        let config = Self {
            defaults,
            llm,
            source_attribution,
        };

        config.validate()?;

        Ok(config)
    }

    /// Discover config file by searching upward from a given directory
    ///
    /// Walks up the directory tree looking for `.adcraft/config.toml`, stopping
    /// at repository root markers (.git, .hg, .svn) or filesystem root.
    pub fn discover_config_file_from(start_dir: &Path) -> Result<Option<PathBuf>> {
        let mut current_dir = start_dir;

        loop {
            let config_path = current_dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Ok(Some(config_path));
            }

            if current_dir.join(".git").exists()
                || current_dir.join(".hg").exists()
                || current_dir.join(".svn").exists()
            {
                break;
            }

            match current_dir.parent() {
                Some(parent) => current_dir = parent,
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from TOML file
    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config: TomlConfig = toml::from_str(&content).map_err(|e| {
                    ConfigError::InvalidFile(format!("{}: {}", path.display(), e.message()))
                })?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound {
                path: path.display().to_string(),
            }
            .into()),
            Err(e) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            )),
        }
    }
}
