//! Newline-delimited JSON framing.

use crate::types::{JsonRpcMessage, McpError, McpResult};

pub fn parse_message(text: &str) -> McpResult<JsonRpcMessage> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))
}

/// One JSON document per line; serde_json never emits raw newlines.
pub fn frame_message(value: &serde_json::Value) -> McpResult<String> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    Ok(line)
}
