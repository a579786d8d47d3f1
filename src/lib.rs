//! adcraft - ad creative and targeting generator
//!
//! A four-step wizard collects a product name, description and target audience,
//! then asks Gemini for ad copy with targeting suggestions and Imagen for a
//! square product image. Both requests run concurrently and either both
//! succeed or the whole generation fails with a single error.
//!
//! adcraft can be used in two ways:
//! - **CLI**: run `adcraft wizard` for the interactive flow, or
//!   `adcraft generate` for a one-shot run from flags
//! - **Library**: drive [`AdOrchestrator`] or [`WizardSession`] from your own code
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! export API_KEY=...
//!
//! # Interactive wizard
//! adcraft wizard
//!
//! # One-shot, JSON output, image written to disk
//! adcraft generate \
//!   --product-name "Artisan Coffee" \
//!   --product-description "Small-batch roasted coffee beans" \
//!   --target-audience "Urban professionals 25-40" \
//!   --json --image-out ad.jpg
//!
//! # Show effective configuration and where each value came from
//! adcraft config
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use adcraft::{AdFormData, AdOrchestrator, Config};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::builder().build()?;
//! let orchestrator = AdOrchestrator::from_config(&config)?;
//! let ad = orchestrator
//!     .generate_full_ad(AdFormData::new(
//!         "Artisan Coffee",
//!         "Small-batch roasted coffee beans",
//!         "Urban professionals 25-40",
//!     ))
//!     .await?;
//! println!("{}", ad.creative.headline);
//! # Ok(())
//! # }
//! ```
//!
//! # Stable Public API
//!
//! - [`AdFormData`], [`AdData`] and their parts - the data model
//! - [`AdOrchestrator`] and the [`AdGenerator`] trait - ad generation
//! - [`WizardController`] and [`WizardSession`] - the wizard state machine
//! - [`Config`] and [`ConfigBuilder`] - configuration management
//! - [`AdcraftError`] - library error type
//! - [`ExitCode`] - CLI exit codes
//!
//! Internal modules are accessible via module paths but are marked `#[doc(hidden)]`
//! and are not covered by semver stability guarantees.

// ============================================================================
// Stable Public API
// ============================================================================

pub use adcraft_engine::{
    AdContent, AdCreative, AdData, AdFormData, AdGenerator, AdOrchestrator, Advisory, FormField,
    GenerationRequest, GenerationTicket, Stage, StepProgress, TargetingSuggestions,
    WizardController, WizardSession, WizardView,
};

/// Configuration for adcraft.
///
/// `Config` provides hierarchical configuration with discovery and precedence:
/// CLI arguments > config file > built-in defaults.
///
/// Use [`Config::discover()`] for CLI-like behavior or [`Config::builder()`]
/// for programmatic configuration.
pub use adcraft_config::Config;

/// Builder for programmatic configuration.
///
/// # Example
///
/// ```rust,no_run
/// use adcraft::Config;
/// use std::time::Duration;
///
/// let config = Config::builder()
///     .text_model("gemini-2.5-pro")
///     .request_timeout(Duration::from_secs(60))
///     .build()
///     .expect("Failed to build config");
/// ```
pub use adcraft_config::ConfigBuilder;

/// CLI argument structure for configuration override.
pub use adcraft_config::CliArgs;

/// Library-level error type.
///
/// Provides user-facing reports via
/// [`display_for_user()`](AdcraftError::display_for_user) and exit code mapping
/// via [`to_exit_code()`](AdcraftError::to_exit_code).
pub use adcraft_utils::error::AdcraftError;

/// Exit codes matching the documented exit code table.
pub use adcraft_utils::exit_codes::ExitCode;

/// The single error an ad generation fails with: `Ad generation failed: <cause>`.
pub use adcraft_utils::error::GenerationError;

pub use adcraft_utils::error::{ErrorCategory, UserFriendlyError};

// ============================================================================
// Internal modules - accessible but not stable
// ============================================================================

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub use adcraft_engine::test_support;

#[doc(hidden)]
pub use adcraft_utils::{error, exit_codes, logging, redaction};

#[doc(hidden)]
pub use adcraft_config as config;

#[doc(hidden)]
pub use adcraft_llm as llm;

#[doc(hidden)]
pub use adcraft_engine::{model, orchestrator, parse, progress, prompts, schema, session, wizard};

// Exported with #[doc(hidden)] to allow white-box testing of CLI flag parsing
#[doc(hidden)]
pub mod cli;
#[doc(hidden)]
pub mod render;
