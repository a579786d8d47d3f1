//! Credential redaction for log lines and user-facing error output.
//!
//! Error text coming back from HTTP transports can echo request URLs, headers or
//! API keys. Everything that reaches a log sink or the terminal passes through
//! [`redact_secrets`] first.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern to match URLs with embedded credentials
static URL_WITH_CREDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https?://)[^:@\s/]+:[^@\s/]+@").unwrap());

/// Google API keys (`AIza` prefix, 39 characters total)
static GOOGLE_API_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"AIza[0-9A-Za-z_-]{35}").unwrap());

/// `key=` query parameters and `x-goog-api-key` header echoes
static KEY_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)((?:[?&]key=)|(?:x-goog-api-key:\s*))[^&\s]+").unwrap());

/// Pattern to match potential API keys (long alphanumeric strings)
///
/// Matches sequences of 32+ characters that are alphanumeric, underscore, or dash.
static POTENTIAL_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^A-Za-z0-9_-])[A-Za-z0-9_-]{32,}([^A-Za-z0-9_-]|$)").unwrap()
});

/// Remove potentially sensitive information from a message.
///
/// Redaction rules:
/// - URLs with embedded credentials keep scheme and host, lose `user:pass@`
/// - Google API keys and `key=` parameters are replaced
/// - Any remaining 32+ character token is treated as a key
///
/// Base64 image payloads never pass through here; callers redact messages, not data.
#[must_use]
pub fn redact_secrets(message: &str) -> String {
    let redacted = URL_WITH_CREDS.replace_all(message, "$1[REDACTED]@");
    let redacted = GOOGLE_API_KEY.replace_all(&redacted, "[REDACTED_KEY]");
    let redacted = KEY_PARAM.replace_all(&redacted, "$1[REDACTED_KEY]");
    let redacted = POTENTIAL_KEY.replace_all(&redacted, "$1[REDACTED_KEY]$2");
    redacted.into_owned()
}
