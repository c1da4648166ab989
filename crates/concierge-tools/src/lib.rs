//! Capabilities the generation service may invoke.
//!
//! - [`calculator`]: restricted-grammar arithmetic evaluator
//! - [`datetime`]: timezone-aware clock read and calendar-day difference
//! - [`retrieval`]: knowledge-base passage search
//! - [`web_search`]: ranked web results
//!
//! [`definitions`] holds the descriptors offered to the model for each one.

pub mod calculator;
pub mod datetime;
pub mod definitions;
pub mod retrieval;
pub mod web_search;

pub use calculator::{evaluate, CalcError};
pub use datetime::{current_datetime, current_datetime_at, date_difference, DateTimeError};
pub use retrieval::{format_passages, KeywordIndex, Passage, RetrievalError, RetrievalIndex};
pub use web_search::{
    clamp_num_results, format_hits, SearchHit, SerpApiSearch, UnconfiguredSearch, WebSearchError,
    WebSearchProvider,
};
