//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and the subcommand enum.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use adcraft_config::CliArgs;

/// adcraft - ad creative and targeting generator
#[derive(Parser, Debug)]
#[command(name = "adcraft")]
#[command(about = "Generate ad copy, targeting suggestions and a product image with Gemini")]
#[command(long_about = r#"
adcraft walks you through a four-step wizard (Product Info, Audience, Generate,
Review) and produces a headline, primary text, targeting suggestions and a
square product image.

EXAMPLES:
  # Run the interactive wizard
  adcraft wizard

  # Generate one ad from flags and print it as JSON
  adcraft generate --product-name "Artisan Coffee" \
    --product-description "Small-batch roasted coffee beans" \
    --target-audience "Urban professionals 25-40" --json

  # Save the generated image
  adcraft generate ... --image-out ad.jpg

  # Show the effective configuration and where each value came from
  adcraft config

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .adcraft/config.toml
  Use --config to specify an explicit config file path

CREDENTIALS:
  The Gemini API key is read from the API_KEY environment variable
  (configurable with api_key_env under [llm.gemini])
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model used for ad copy and targeting
    #[arg(long, global = true)]
    pub text_model: Option<String>,

    /// Model used for the product image
    #[arg(long, global = true)]
    pub image_model: Option<String>,

    /// Transport timeout in seconds (default: 120, min: 5, max: 300)
    #[arg(long, global = true)]
    pub request_timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `wizard` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Overrides that take part in configuration precedence.
    #[must_use]
    pub fn config_overrides(&self) -> CliArgs {
        CliArgs {
            config_path: self.config.clone(),
            text_model: self.text_model.clone(),
            image_model: self.image_model.clone(),
            request_timeout: self.request_timeout,
            // Only an explicit -v overrides the config file.
            verbose: self.verbose.then_some(true),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the interactive four-step ad wizard
    Wizard,

    /// Generate one ad non-interactively from flags
    Generate(GenerateArgs),

    /// Print the effective configuration with source attribution
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Operation name used in error reports.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Wizard => "wizard",
            Self::Generate(_) => "generate",
            Self::Config { .. } => "config",
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Name of the product being advertised
    #[arg(long)]
    pub product_name: String,

    /// What the product is and does
    #[arg(long)]
    pub product_description: String,

    /// Who the ad should reach
    #[arg(long)]
    pub target_audience: String,

    /// Emit the generated ad as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the decoded image bytes to this file
    #[arg(long)]
    pub image_out: Option<PathBuf>,
}

/// Build the CLI command structure for testing and introspection
#[must_use]
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
