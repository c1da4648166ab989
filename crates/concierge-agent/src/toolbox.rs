//! Closed dispatch from a requested tool name to its collaborator.

use std::sync::Arc;

use concierge_ai::{ToolCall, ToolDefinition};
use concierge_tools::{
    calculator, clamp_num_results, current_datetime, date_difference, definitions, format_hits,
    format_passages, RetrievalIndex, WebSearchProvider,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ToolError;

/// Every tool the handlers can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Calculator,
    SearchKnowledgeBase,
    WebSearch,
    CurrentDatetime,
    DateDifference,
}

impl ToolKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            definitions::CALCULATOR => Some(Self::Calculator),
            definitions::SEARCH_KNOWLEDGE_BASE => Some(Self::SearchKnowledgeBase),
            definitions::WEB_SEARCH => Some(Self::WebSearch),
            definitions::GET_CURRENT_DATETIME => Some(Self::CurrentDatetime),
            definitions::CALCULATE_DATE_DIFFERENCE => Some(Self::DateDifference),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Calculator => definitions::CALCULATOR,
            Self::SearchKnowledgeBase => definitions::SEARCH_KNOWLEDGE_BASE,
            Self::WebSearch => definitions::WEB_SEARCH,
            Self::CurrentDatetime => definitions::GET_CURRENT_DATETIME,
            Self::DateDifference => definitions::CALCULATE_DATE_DIFFERENCE,
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        match self {
            Self::Calculator => definitions::calculator(),
            Self::SearchKnowledgeBase => definitions::search_knowledge_base(),
            Self::WebSearch => definitions::web_search(),
            Self::CurrentDatetime => definitions::get_current_datetime(),
            Self::DateDifference => definitions::calculate_date_difference(),
        }
    }
}

/// Executes tool calls against the configured collaborators.
#[derive(Clone)]
pub struct Toolbox {
    retrieval: Arc<dyn RetrievalIndex>,
    web_search: Arc<dyn WebSearchProvider>,
    default_k: usize,
    default_num_results: usize,
}

impl Toolbox {
    pub fn new(retrieval: Arc<dyn RetrievalIndex>, web_search: Arc<dyn WebSearchProvider>) -> Self {
        Self {
            retrieval,
            web_search,
            default_k: 3,
            default_num_results: 5,
        }
    }

    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k.max(1);
        self
    }

    pub fn with_default_num_results(mut self, n: usize) -> Self {
        self.default_num_results = n.clamp(1, 10);
        self
    }

    /// Run `call`, restricted to the tools in `offered`.
    pub async fn execute(&self, call: &ToolCall, offered: &[ToolKind]) -> Result<String, ToolError> {
        let kind = ToolKind::from_name(&call.name)
            .filter(|k| offered.contains(k))
            .ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;
        let args = Args::parse(kind, &call.arguments)?;

        debug!(tool = kind.name(), "executing tool");

        match kind {
            ToolKind::Calculator => {
                let expression = args.required_str("expression")?;
                Ok(calculator::evaluate(&expression)?)
            }
            ToolKind::SearchKnowledgeBase => {
                let query = args.required_str("query")?;
                let k = args.optional_int("k")?.map_or(self.default_k, |k| k.max(1) as usize);
                let passages = self.retrieval.search(query.trim(), k).await?;
                Ok(format_passages(&passages))
            }
            ToolKind::WebSearch => {
                let query = args.required_str("query")?;
                let num = args
                    .optional_int("num_results")?
                    .map_or(self.default_num_results, clamp_num_results);
                let hits = self.web_search.search(query.trim(), num).await?;
                Ok(format_hits(query.trim(), &hits))
            }
            ToolKind::CurrentDatetime => {
                let timezone = args.optional_str("timezone").unwrap_or_else(|| "UTC".to_string());
                let now = current_datetime(&timezone)?;
                Ok(format!("Current date/time in {}: {now}", timezone.trim()))
            }
            ToolKind::DateDifference => {
                let date1 = args.required_str("date1")?;
                let date2 = args.required_str("date2")?;
                let days = date_difference(&date1, &date2)?;
                Ok(format!("Difference between {date1} and {date2}: {days} days"))
            }
        }
    }
}

/// Tool arguments as a JSON object.
struct Args {
    tool: &'static str,
    map: Map<String, Value>,
}

impl Args {
    /// Accepts an object, or a string holding one (some providers send the
    /// raw argument text when it fails to parse).
    fn parse(kind: ToolKind, raw: &Value) -> Result<Self, ToolError> {
        let value = match raw {
            Value::String(s) if s.trim().is_empty() => Value::Object(Map::new()),
            Value::String(s) => serde_json::from_str(s).map_err(|e| ToolError::InvalidArguments {
                tool: kind.name().to_string(),
                message: e.to_string(),
            })?,
            Value::Null => Value::Object(Map::new()),
            other => other.clone(),
        };
        match value {
            Value::Object(map) => Ok(Self {
                tool: kind.name(),
                map,
            }),
            _ => Err(ToolError::InvalidArguments {
                tool: kind.name().to_string(),
                message: "arguments must be an object".to_string(),
            }),
        }
    }

    fn invalid(&self, message: String) -> ToolError {
        ToolError::InvalidArguments {
            tool: self.tool.to_string(),
            message,
        }
    }

    fn optional_str(&self, key: &str) -> Option<String> {
        match self.map.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    fn required_str(&self, key: &str) -> Result<String, ToolError> {
        self.optional_str(key)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| self.invalid(format!("missing '{key}'")))
    }

    /// Integer argument; numeric strings such as `"3"` are accepted.
    fn optional_int(&self, key: &str) -> Result<Option<i64>, ToolError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(Some)
                .ok_or_else(|| self.invalid(format!("'{key}' must be an integer"))),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| self.invalid(format!("'{key}' must be an integer"))),
            Some(_) => Err(self.invalid(format!("'{key}' must be an integer"))),
        }
    }
}
