//! Types shared by every concierge crate: the top-level error taxonomy
//! and identifier helpers.

pub mod errors;
pub mod id;

pub use errors::{ConciergeError, ConfigError};
pub use id::{new_id, new_request_id, SessionId};

pub type Result<T> = std::result::Result<T, ConciergeError>;
