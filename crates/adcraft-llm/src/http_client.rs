//! Shared HTTP client infrastructure for the Gemini REST backend
//!
//! This module provides a shared `reqwest::Client` configured once per process.
//! Every request is sent exactly once; there is no retry policy.

use adcraft_utils::redaction::redact_secrets;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::LlmError;

/// Default maximum HTTP timeout (5 minutes)
const DEFAULT_MAX_HTTP_TIMEOUT: Duration = Duration::from_secs(300);

/// Default connect timeout (30 seconds)
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest provider error detail carried into an `LlmError`.
const MAX_ERROR_DETAIL_CHARS: usize = 300;

/// Shared HTTP client for provider calls
///
/// Provides connection reuse, a per-request timeout capped by `max_timeout`,
/// and mapping of HTTP failures to [`LlmError`] variants.
#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Arc<Client>,
    max_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the client cannot be constructed
    pub fn new() -> Result<Self, LlmError> {
        Self::with_max_timeout(DEFAULT_MAX_HTTP_TIMEOUT)
    }

    /// Create a new HTTP client with a custom maximum timeout
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the client cannot be constructed
    pub fn with_max_timeout(max_timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| LlmError::Misconfiguration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client: Arc::new(client),
            max_timeout,
        })
    }

    /// Start a POST request on the shared client.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Send a request once, with timeout and status mapping
    ///
    /// - Per-request timeout: `min(request_timeout, max_timeout)`
    /// - Exactly one attempt; failures are returned to the caller immediately
    ///
    /// # Errors
    ///
    /// - `LlmError::ProviderAuth` for 401/403 errors
    /// - `LlmError::ProviderQuota` for 429 errors
    /// - `LlmError::Transport` for other 4xx errors and network failures
    /// - `LlmError::ProviderOutage` for 5xx errors
    /// - `LlmError::Timeout` for timeouts
    pub async fn execute_once(
        &self,
        request_builder: RequestBuilder,
        request_timeout: Duration,
        provider_name: &str,
    ) -> Result<Response, LlmError> {
        let effective_timeout = request_timeout.min(self.max_timeout);

        let request = request_builder
            .timeout(effective_timeout)
            .build()
            .map_err(|e| {
                LlmError::Transport(format!(
                    "Failed to build request: {}",
                    redact_secrets(&e.to_string())
                ))
            })?;

        debug!(
            provider = provider_name,
            timeout_secs = effective_timeout.as_secs(),
            "Executing HTTP request"
        );

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();

                if status.is_client_error() || status.is_server_error() {
                    let detail = error_detail(response).await;
                    warn!(
                        provider = provider_name,
                        status = status.as_u16(),
                        "Provider returned an error status"
                    );
                    return Err(map_status_error(status, provider_name, detail.as_deref()));
                }

                Ok(response)
            }
            Err(e) if e.is_timeout() => Err(LlmError::Timeout {
                duration: effective_timeout,
            }),
            Err(e) => Err(LlmError::Transport(format!(
                "{} request failed: {}",
                provider_name,
                redact_secrets(&e.to_string())
            ))),
        }
    }
}

/// Google APIs wrap failures as `{"error": {"message": ..., "status": ...}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

async fn error_detail(response: Response) -> Option<String> {
    let body = response.text().await.ok()?;
    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.message?,
        Err(_) => body,
    };
    let message = message.trim();
    if message.is_empty() {
        return None;
    }
    let truncated: String = message.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
    Some(redact_secrets(&truncated))
}

/// Map HTTP error status codes to LlmError variants
///
/// - 401/403 → `LlmError::ProviderAuth`
/// - 429 → `LlmError::ProviderQuota`
/// - 5xx → `LlmError::ProviderOutage`
/// - Other 4xx → `LlmError::Transport`
fn map_status_error(status: StatusCode, provider_name: &str, detail: Option<&str>) -> LlmError {
    let suffix = detail.map(|d| format!(" ({d})")).unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::ProviderAuth(format!(
            "{provider_name} authentication failed: {status}{suffix}"
        )),
        StatusCode::TOO_MANY_REQUESTS => LlmError::ProviderQuota(format!(
            "{provider_name} rate limit exceeded: {status}{suffix}"
        )),
        s if s.is_server_error() => LlmError::ProviderOutage(format!(
            "{provider_name} returned server error: {status}{suffix}"
        )),
        _ => LlmError::Transport(format!(
            "{provider_name} returned client error: {status}{suffix}"
        )),
    }
}
