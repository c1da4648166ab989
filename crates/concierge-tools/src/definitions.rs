//! Capability descriptors offered to the generation service.
//!
//! Names here are the closed set the agent's tool dispatch recognises.

use concierge_ai::ToolDefinition;

pub const CALCULATOR: &str = "calculator";
pub const SEARCH_KNOWLEDGE_BASE: &str = "search_knowledge_base";
pub const WEB_SEARCH: &str = "web_search";
pub const GET_CURRENT_DATETIME: &str = "get_current_datetime";
pub const CALCULATE_DATE_DIFFERENCE: &str = "calculate_date_difference";

pub fn calculator() -> ToolDefinition {
    ToolDefinition {
        name: CALCULATOR.to_string(),
        description: "Evaluate an arithmetic expression. Supports + - * / ** and parentheses, \
                      the functions sqrt, abs, pow, min, max, round and the constants pi and e."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "The expression to evaluate, e.g. '2 + 2' or 'sqrt(16) * 3'"
                }
            },
            "required": ["expression"]
        }),
    }
}

pub fn search_knowledge_base() -> ToolDefinition {
    ToolDefinition {
        name: SEARCH_KNOWLEDGE_BASE.to_string(),
        description: "Search the local knowledge base for passages relevant to a question. \
                      Use for technical documentation and stored reference material."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The question or terms to search for"
                },
                "k": {
                    "type": "integer",
                    "description": "Number of passages to return (must be an integer)",
                    "default": 3
                }
            },
            "required": ["query"]
        }),
    }
}

pub fn web_search() -> ToolDefinition {
    ToolDefinition {
        name: WEB_SEARCH.to_string(),
        description: "Search the web for current information, news and recent events."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "num_results": {
                    "type": "integer",
                    "description": "Number of results to return (1-10)",
                    "default": 5
                }
            },
            "required": ["query"]
        }),
    }
}

pub fn get_current_datetime() -> ToolDefinition {
    ToolDefinition {
        name: GET_CURRENT_DATETIME.to_string(),
        description: "Get the current date and time in a timezone.".to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "timezone": {
                    "type": "string",
                    "description": "IANA timezone name, e.g. 'UTC' or 'America/Sao_Paulo'",
                    "default": "UTC"
                }
            }
        }),
    }
}

pub fn calculate_date_difference() -> ToolDefinition {
    ToolDefinition {
        name: CALCULATE_DATE_DIFFERENCE.to_string(),
        description: "Count the calendar days between two dates in YYYY-MM-DD format."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "date1": { "type": "string", "description": "First date (YYYY-MM-DD)" },
                "date2": { "type": "string", "description": "Second date (YYYY-MM-DD)" }
            },
            "required": ["date1", "date2"]
        }),
    }
}
