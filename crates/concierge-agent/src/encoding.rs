//! Structured-text encoding for prompts.
//!
//! JSON payloads are rendered as indented tag notation before being sent to
//! the generation service:
//!
//! ```text
//! <query>What time is it?</query>
//! <tags>
//!   <item index="0">a</item>
//! </tags>
//! ```
//!
//! Objects nest, arrays become indexed `<item>` elements, `null` and booleans
//! print as lowercase words. The answer is still requested as JSON.

use serde_json::{Map, Value};

const INDENT: &str = "  ";

/// Encode the fields of a JSON object, one per line, at `indent` levels.
/// A non-object value encodes as its bare scalar text.
pub fn encode(value: &Value, indent: usize) -> String {
    let mut lines = Vec::new();
    match value {
        Value::Object(map) => encode_object(&mut lines, map, indent),
        other => lines.push(format!("{}{}", INDENT.repeat(indent), scalar(other))),
    }
    lines.join("\n")
}

fn encode_object(lines: &mut Vec<String>, map: &Map<String, Value>, indent: usize) {
    let pad = INDENT.repeat(indent);
    for (key, value) in map {
        match value {
            Value::Object(inner) => {
                lines.push(format!("{pad}<{key}>"));
                encode_object(lines, inner, indent + 1);
                lines.push(format!("{pad}</{key}>"));
            }
            Value::Array(items) => {
                lines.push(format!("{pad}<{key}>"));
                encode_items(lines, items, indent + 1);
                lines.push(format!("{pad}</{key}>"));
            }
            other => lines.push(format!("{pad}<{key}>{}</{key}>", scalar(other))),
        }
    }
}

fn encode_items(lines: &mut Vec<String>, items: &[Value], indent: usize) {
    let pad = INDENT.repeat(indent);
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::Object(inner) => {
                lines.push(format!("{pad}<item index=\"{i}\">"));
                encode_object(lines, inner, indent + 1);
                lines.push(format!("{pad}</item>"));
            }
            Value::Array(nested) => {
                lines.push(format!("{pad}<item index=\"{i}\">"));
                encode_items(lines, nested, indent + 1);
                lines.push(format!("{pad}</item>"));
            }
            other => lines.push(format!("{pad}<item index=\"{i}\">{}</item>", scalar(other))),
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        // Containers are handled by the callers.
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Assemble a task prompt from a description, an input payload, worked
/// examples, and the expected output schema.
pub fn build_structured_prompt(
    task: &str,
    input: &Value,
    output_schema: &Value,
    examples: &[Value],
) -> String {
    let mut parts = vec![format!("<task>\n{task}\n</task>\n")];

    parts.push("<input>".to_string());
    parts.push(encode(input, 1));
    parts.push("</input>\n".to_string());

    if !examples.is_empty() {
        parts.push("<examples>".to_string());
        for (i, example) in examples.iter().enumerate() {
            parts.push(format!("{INDENT}<example index=\"{i}\">"));
            parts.push(encode(example, 2));
            parts.push(format!("{INDENT}</example>"));
        }
        parts.push("</examples>\n".to_string());
    }

    parts.push("<output_schema>".to_string());
    parts.push(encode(output_schema, 1));
    parts.push("</output_schema>\n".to_string());

    parts.push("<instructions>".to_string());
    parts.push(
        "Please provide your response in valid JSON format matching the output_schema."
            .to_string(),
    );
    parts.push("</instructions>".to_string());

    parts.join("\n")
}
