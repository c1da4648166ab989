use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("missing credential: {0}")]
    MissingCredential(String),
}

/// Faults that can reach the top-level `process` boundary or the binary.
///
/// Handler and classifier failures are absorbed before they get here; what
/// remains is structural (config, I/O, an orchestration invariant broken).
#[derive(Debug, thiserror::Error)]
pub enum ConciergeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("ai error: {0}")]
    Ai(String),

    #[error("tool error: {0}")]
    Tool(String),

    #[error("orchestration error: {0}")]
    Orchestration(String),

    #[error("{0}")]
    Other(String),
}

impl ConciergeError {
    /// Short kind name used in diagnostic tags.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
            Self::Ai(_) => "AiError",
            Self::Tool(_) => "ToolError",
            Self::Orchestration(_) => "OrchestrationError",
            Self::Other(_) => "Error",
        }
    }
}
