use concierge_ai::AiError;
use concierge_tools::{CalcError, DateTimeError, RetrievalError, WebSearchError};

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error(transparent)]
    DateTime(#[from] DateTimeError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    WebSearch(#[from] WebSearchError),
}

impl ToolError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "UnknownTool",
            Self::InvalidArguments { .. } => "InvalidArguments",
            Self::Calc(_) => "CalcError",
            Self::DateTime(_) => "DateTimeError",
            Self::Retrieval(_) => "RetrievalError",
            Self::WebSearch(_) => "WebSearchError",
        }
    }

    /// Domain errors the model can explain to the user. They go back to the
    /// generation service as an `Error: ...` tool result instead of failing
    /// the handler.
    pub fn is_domain_error(&self) -> bool {
        matches!(self, Self::Calc(_) | Self::DateTime(_))
    }
}

/// A fault inside a handler. Always absorbed into an apology turn.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

impl HandlerError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ai(e) => e.kind(),
            Self::Tool(e) => e.kind(),
        }
    }
}
