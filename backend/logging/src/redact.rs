//! Log Redaction
//!
//! Scrubs bearer tokens, OAuth access tokens, and PEM private keys from
//! strings before they reach logs or user-facing replies.

use regex::Regex;
use std::sync::LazyLock;

static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());
static PEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-----BEGIN [A-Z ]*PRIVATE KEY-----[\s\S]*?-----END [A-Z ]*PRIVATE KEY-----")
        .unwrap()
});
static ACCESS_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ya29\.[a-zA-Z0-9\-_\.]+").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = PEM_RE.replace_all(input, "[REDACTED_KEY]");
    let redacted = BEARER_RE.replace_all(&redacted, "[REDACTED_TOKEN]");
    ACCESS_TOKEN_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}
