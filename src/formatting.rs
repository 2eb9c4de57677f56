//! JSON rendering of tool results

use crate::outcome::WriteOutcome;
use mcp_attr::{Error, ErrorCode, Result as McpResult};
use serde::Serialize;
use serde_json::json;

fn to_pretty(value: &serde_json::Value) -> McpResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        Error::new(ErrorCode::INTERNAL_ERROR)
            .with_message(format!("Failed to serialize result: {}", e), true)
    })
}

fn to_value<T: Serialize>(value: &T) -> McpResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| {
        Error::new(ErrorCode::INTERNAL_ERROR)
            .with_message(format!("Failed to serialize result: {}", e), true)
    })
}

/// `{"count": n, "<key>": [...]}`
pub fn format_list<T: Serialize>(key: &str, items: &[T]) -> McpResult<String> {
    let mut body = serde_json::Map::new();
    body.insert("count".to_string(), json!(items.len()));
    body.insert(key.to_string(), to_value(&items)?);
    to_pretty(&serde_json::Value::Object(body))
}

/// `{"<key>": {...}}`, or `{"<key>": null}` when nothing matched
pub fn format_item<T: Serialize>(key: &str, item: Option<&T>) -> McpResult<String> {
    let mut body = serde_json::Map::new();
    body.insert(key.to_string(), to_value(&item)?);
    to_pretty(&serde_json::Value::Object(body))
}

pub fn format_outcome(outcome: &WriteOutcome) -> McpResult<String> {
    to_pretty(&to_value(outcome)?)
}
