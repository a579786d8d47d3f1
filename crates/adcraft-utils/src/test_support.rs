//! Helpers shared by unit and integration tests.

/// Name of the env var that opts into tests hitting the real Gemini API.
pub const REAL_LLM_TESTS_ENV: &str = "ADCRAFT_REAL_LLM_TESTS";

/// Check whether real LLM integration tests should run.
///
/// `ADCRAFT_SKIP_LLM_TESTS=1` always disables real LLM tests.
/// `ADCRAFT_REAL_LLM_TESTS=1` enables real LLM tests.
#[must_use]
pub fn llm_tests_enabled() -> bool {
    let flag = |name: &str| {
        std::env::var(name)
            .ok()
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };

    if flag("ADCRAFT_SKIP_LLM_TESTS") {
        return false;
    }
    flag(REAL_LLM_TESTS_ENV)
}

/// A fake Google API key with the right shape, for redaction tests.
#[must_use]
pub fn google_api_key() -> String {
    const ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut key = String::from("AIza");
    let mut idx = 3;
    for _ in 0..35 {
        key.push(ALNUM[idx] as char);
        idx = (idx + 7) % ALNUM.len();
    }
    key
}

/// Base64 of a tiny JPEG-like payload (SOI + EOI markers).
#[must_use]
pub fn tiny_jpeg_base64() -> &'static str {
    "/9j/2Q=="
}
