//! Capability descriptors in the function-calling wire format.

use crate::ToolDefinition;

/// Convert a tool definition to the Chat Completions `tools` entry format.
pub fn to_openai_tool(tool: &ToolDefinition) -> serde_json::Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_definition_in_function_envelope() {
        let tool = ToolDefinition {
            name: "get_current_datetime".into(),
            description: "Current time".into(),
            parameters: serde_json::json!({"type": "object", "properties": {}}),
        };
        let wire = to_openai_tool(&tool);
        assert_eq!(wire["type"], "function");
        assert_eq!(wire["function"]["name"], "get_current_datetime");
        assert_eq!(wire["function"]["parameters"]["type"], "object");
    }
}
