use std::collections::HashSet;

use concierge_ai::Message;

/// Turn count above which a session gets the length advisory.
pub const MAX_TURNS: usize = 50;
/// Trailing turns inspected by the loop detector.
pub const LOOP_WINDOW: usize = 6;

pub const LOOP_NOTICE: &str =
    "It looks like we're going in circles. Can I help with something different?";

#[derive(Debug, Clone, PartialEq)]
pub struct LengthCheck {
    pub exceeded: bool,
    pub message_count: usize,
    pub warning: Option<String>,
}

pub fn check_length(turns: &[Message]) -> LengthCheck {
    let message_count = turns.len();
    let exceeded = message_count > MAX_TURNS;
    LengthCheck {
        exceeded,
        message_count,
        warning: exceeded.then(|| {
            format!(
                "This conversation has {message_count} messages. \
                 Consider starting a new conversation for better performance."
            )
        }),
    }
}

/// True when the last [`LOOP_WINDOW`] turns hold at most two distinct contents.
pub fn detect_loop(turns: &[Message]) -> bool {
    if turns.len() < LOOP_WINDOW {
        return false;
    }
    let distinct: HashSet<&str> = turns[turns.len() - LOOP_WINDOW..]
        .iter()
        .map(|t| t.content.as_str())
        .collect();
    distinct.len() <= 2
}
