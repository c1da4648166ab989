use concierge_ai::{Message, Role};

pub const MIN_RESPONSE_CHARS: usize = 10;

pub(crate) const EMPTY_RESPONSE_APOLOGY: &str =
    "Sorry, I couldn't generate a proper answer. Please try rephrasing your question.";
pub(crate) const TRUNCATION_NOTE: &str =
    "[Note: The answer may have been truncated. Try asking a more specific question.]";
pub(crate) const INCOMPLETE_NOTE: &str =
    "[Note: The answer may be incomplete due to length limits.]";
pub(crate) const NO_RESPONSE: &str = "Error: no response was generated.";
pub(crate) const UNEXPECTED_FORMAT: &str = "Error: unexpected response format.";

const TERMINATORS: [char; 5] = ['.', '!', '?', ':', ')'];

#[derive(Debug, Clone, PartialEq)]
pub struct OutputCheck {
    pub valid: bool,
    pub message: String,
    pub processed: String,
}

/// Validate a final answer. Never rejects outright: empty answers are
/// replaced by an apology and very short ones get a truncation note.
pub fn validate_output(text: &str) -> OutputCheck {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return OutputCheck {
            valid: false,
            message: "Empty response generated".to_string(),
            processed: EMPTY_RESPONSE_APOLOGY.to_string(),
        };
    }

    if trimmed.chars().count() < MIN_RESPONSE_CHARS {
        return OutputCheck {
            valid: false,
            message: "Response too short (possible truncation)".to_string(),
            processed: format!("{trimmed}\n\n{TRUNCATION_NOTE}"),
        };
    }

    OutputCheck {
        valid: true,
        message: "Valid response".to_string(),
        processed: trimmed.to_string(),
    }
}

/// Take the answer from the last turn, marking it when it stops mid-sentence.
pub fn ensure_complete_response(turns: &[Message]) -> String {
    let Some(last) = turns.last() else {
        return NO_RESPONSE.to_string();
    };
    if last.role != Role::Assistant {
        return UNEXPECTED_FORMAT.to_string();
    }

    let content = &last.content;
    // Blank answers get no note; validate_output replaces them with an apology.
    if !content.trim().is_empty() && !content.trim_end().ends_with(TERMINATORS) {
        return format!("{content}\n\n{INCOMPLETE_NOTE}");
    }
    content.clone()
}
