//! OpenAI-compatible Chat Completions client.
//!
//! Implements the `AiClient` trait against any endpoint speaking the
//! `/chat/completions` protocol with function calling (OpenAI, Groq).

mod api;
mod client;
mod config;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
