//! Issue descriptions
//!
//! Older servers send descriptions as plain strings, newer ones as Atlassian
//! Document Format trees. Both are read into plain text.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a description that is either a string or a document tree
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| to_text(&v)))
}

/// Flatten a description value into plain text
pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => Some(match value.get("content") {
            Some(Value::Array(content)) => flatten(content),
            _ => String::new(),
        }),
        other => Some(other.to_string()),
    }
}

fn flatten(nodes: &[Value]) -> String {
    let mut text = String::new();

    for node in nodes.iter().filter(|n| n.is_object()) {
        let children = node.get("content").and_then(Value::as_array);

        match node.get("type").and_then(Value::as_str) {
            Some("text") => {
                if let Some(t) = node.get("text").and_then(Value::as_str) {
                    text.push_str(t);
                }
            }
            Some("hardBreak") => text.push('\n'),
            Some("listItem") => {
                if let Some(children) = children {
                    text.push_str("• ");
                    text.push_str(&flatten(children));
                }
            }
            Some("codeBlock") => {
                if let Some(children) = children {
                    text.push_str("```\n");
                    text.push_str(&flatten(children));
                    text.push_str("\n```");
                }
            }
            // paragraph, heading, lists and anything unknown
            _ => {
                if let Some(children) = children {
                    text.push_str(&flatten(children));
                }
            }
        }
    }

    text
}
