//! Logging and observability infrastructure for adcraft
//!
//! Structured logging goes through `tracing`. The CLI installs a compact
//! subscriber on stderr so that log lines never interleave with the wizard
//! prompts or JSON written to stdout.

use tracing::{Level, error, info, span, warn};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::redaction::redact_secrets;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise verbose mode enables debug output for the
/// adcraft crates and span close events with timings; the default only shows
/// warnings so the interactive wizard stays readable.
///
/// # Errors
///
/// Returns an error if a global subscriber was already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new(
                    "adcraft=debug,adcraft_engine=debug,adcraft_llm=debug,adcraft_config=debug,info",
                )
            } else {
                EnvFilter::try_new("warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Span covering one full ad generation cycle (both sub-tasks).
pub fn generation_span(product_name: &str, text_model: &str, image_model: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "ad_generation",
        product = %product_name,
        text_model = %text_model,
        image_model = %image_model,
    )
}

pub fn log_generation_start(product_name: &str) {
    info!(product = %product_name, "Starting ad generation");
}

pub fn log_generation_complete(product_name: &str, duration_ms: u128) {
    info!(
        product = %product_name,
        duration_ms = %duration_ms,
        "Ad generation completed"
    );
}

/// Log a failed generation cycle.
///
/// Error messages are redacted to prevent secrets from appearing in logs.
pub fn log_generation_error(product_name: &str, error: &str, duration_ms: u128) {
    let sanitized_error = redact_secrets(error);
    error!(
        product = %product_name,
        duration_ms = %duration_ms,
        error = %sanitized_error,
        "Ad generation failed"
    );
}

/// Log a soft deviation from a copy/targeting intent (e.g. an over-long headline).
pub fn log_advisory(field: &str, detail: &str) {
    warn!(field = %field, detail = %detail, "Generated ad deviates from requested format");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_span_can_be_entered() {
        let span = generation_span("Artisan Coffee", "gemini-2.5-flash", "imagen-4.0-generate-001");
        let _guard = span.enter();
        log_generation_start("Artisan Coffee");
        log_generation_error("Artisan Coffee", "Transport error: ?key=secret", 12);
        log_generation_complete("Artisan Coffee", 34);
        log_advisory("headline", "41 characters, limit 40");
    }
}
