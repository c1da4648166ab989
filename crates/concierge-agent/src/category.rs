//! The closed set of routing labels.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Arithmetic,
    Retrieval,
    WebSearch,
    Temporal,
    Direct,
}

impl Category {
    /// Every label, in text-scan order. `Direct` is last so that any more
    /// specific label found in a response wins.
    pub const ALL: [Category; 5] = [
        Category::Arithmetic,
        Category::Retrieval,
        Category::WebSearch,
        Category::Temporal,
        Category::Direct,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Arithmetic => "ARITHMETIC",
            Self::Retrieval => "RETRIEVAL",
            Self::WebSearch => "WEB_SEARCH",
            Self::Temporal => "TEMPORAL",
            Self::Direct => "DIRECT",
        }
    }

    /// Identity of the handler bound to this category, used in logs and in
    /// the technical tag of apology messages.
    pub fn handler_name(&self) -> &'static str {
        match self {
            Self::Arithmetic => "calculator_agent",
            Self::Retrieval => "rag_agent",
            Self::WebSearch => "web_search_agent",
            Self::Temporal => "datetime_agent",
            Self::Direct => "direct_agent",
        }
    }

    /// Exact label match, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }

    /// Dispatch selection: the matching category, or `Direct` when the value
    /// is absent or outside the label set.
    pub fn resolve(label: Option<&str>) -> Self {
        label.and_then(Self::from_label).unwrap_or(Self::Direct)
    }

    /// What the system will do for a query in this category.
    pub fn explanation(&self) -> &'static str {
        match self {
            Self::Arithmetic => "Detected a mathematical operation in your question.",
            Self::Retrieval => "Searching the knowledge base for information on this topic.",
            Self::WebSearch => "Searching the web for current information.",
            Self::Temporal => "Looking up date and time information.",
            Self::Direct => "Answering from general knowledge.",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
