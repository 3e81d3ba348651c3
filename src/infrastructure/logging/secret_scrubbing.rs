use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Pattern and replacement pairs, applied in order.
static PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // Anthropic API keys: sk-ant-api03-...
        (r"sk-ant-[a-zA-Z0-9_-]{8,}", "[API_KEY_REDACTED]"),
        // Authorization headers
        (r"Bearer\s+[a-zA-Z0-9_.-]+", "Bearer [TOKEN_REDACTED]"),
        // The Anthropic auth header as it appears in request dumps
        (r#"(?i)x-api-key["']?\s*[:=]\s*["']?[^"'\s,}]+"#, "x-api-key: [REDACTED]"),
        // Key/value pairs in config or JSON dumps
        (
            r#"(?i)["']?(api_key|apikey|token|secret)["']?\s*[:=]\s*["']?[a-zA-Z0-9_.-]{8,}["']?"#,
            "$1: [REDACTED]",
        ),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// Redacts credentials from text shown to the user.
#[derive(Clone, Copy, Default)]
pub struct SecretScrubber;

impl SecretScrubber {
    pub const fn new() -> Self {
        Self
    }

    /// Scrub a message of sensitive data
    pub fn scrub_message(&self, message: &str) -> String {
        PATTERNS
            .iter()
            .fold(message.to_string(), |text, (pattern, replacement)| {
                pattern.replace_all(&text, *replacement).into_owned()
            })
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}
