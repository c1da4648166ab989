use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

pub const MAX_INPUT_CHARS: usize = 10_000;

pub(crate) const EMPTY_INPUT: &str = "Please enter a valid message.";
pub(crate) const UNSAFE_INPUT: &str = "Input contains potentially dangerous content.";
pub(crate) const REFUSAL: &str = "Sorry, I can't process this kind of content.";

static INJECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)<script[^>]*>.*?</script>",
        r"(?i)javascript:",
        r"(?i)on\w+\s*=",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

#[derive(Debug, Clone, PartialEq)]
pub struct InputCheck {
    pub valid: bool,
    pub message: String,
    /// Trimmed input; `None` when rejected.
    pub sanitized: Option<String>,
}

impl InputCheck {
    fn reject(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
            sanitized: None,
        }
    }
}

/// Validate raw user input. Pure apart from logging.
pub fn validate_input(text: &str) -> InputCheck {
    if text.trim().is_empty() {
        info!(reason = "empty", "input rejected");
        return InputCheck::reject(EMPTY_INPUT);
    }

    let chars = text.chars().count();
    if chars > MAX_INPUT_CHARS {
        info!(reason = "too_long", chars, "input rejected");
        return InputCheck::reject(format!(
            "Message too long. Maximum allowed: {MAX_INPUT_CHARS} characters."
        ));
    }

    let sanitized = text.trim();
    if INJECTION_PATTERNS.iter().any(|re| re.is_match(sanitized)) {
        info!(reason = "injection_pattern", "input rejected");
        return InputCheck::reject(UNSAFE_INPUT);
    }

    InputCheck {
        valid: true,
        message: "Valid input".to_string(),
        sanitized: Some(sanitized.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Appropriateness {
    pub appropriate: bool,
    pub reason: String,
}

/// Case-insensitive substring check against the configured blocklist.
pub fn check_appropriateness(text: &str, blocked_terms: &[String]) -> Appropriateness {
    let lower = text.to_lowercase();
    let hit = blocked_terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .any(|t| !t.is_empty() && lower.contains(&t));

    if hit {
        info!(reason = "blocked_term", "input rejected");
        Appropriateness {
            appropriate: false,
            reason: "Inappropriate content detected".to_string(),
        }
    } else {
        Appropriateness {
            appropriate: true,
            reason: "Appropriate content".to_string(),
        }
    }
}
