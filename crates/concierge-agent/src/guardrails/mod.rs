//! Safety filters on both ends of the pipeline.
//!
//! - [`input`]: rejects empty, oversized, or script-injection input before any
//!   state is touched, plus the configurable appropriateness check
//! - [`output`]: substitutes or annotates degenerate answers
//! - [`conversation`]: advisory length and loop checks over a session
//! - [`friendly`]: user-safe wording for faults, tagged with where they happened
//!
//! Everything here is pure; nothing blocks or truncates history.

pub mod conversation;
pub mod friendly;
pub mod input;
pub mod output;

pub use conversation::{check_length, detect_loop, LengthCheck, LOOP_NOTICE, LOOP_WINDOW, MAX_TURNS};
pub use friendly::friendly_error;
pub use input::{check_appropriateness, validate_input, Appropriateness, InputCheck, MAX_INPUT_CHARS};
pub use output::{ensure_complete_response, validate_output, OutputCheck, MIN_RESPONSE_CHARS};
