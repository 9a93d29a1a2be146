//! MCP tool implementations.

pub mod create_prompt;
pub mod create_prompt_version;
pub mod delete_prompt;
pub mod get_prompt;
pub mod list_prompts;
pub mod registry;
pub mod update_prompt;

pub use registry::ToolRegistry;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use bedrock_prompt_management::PromptApiResult;

use crate::types::{McpError, McpResult, ToolCallResult};

/// Decode tool arguments, reporting bad shapes as invalid params.
pub(crate) fn parse_params<T: DeserializeOwned>(args: Value) -> McpResult<T> {
    serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))
}

/// Reject identifiers that are empty or only whitespace.
pub(crate) fn require_id(prompt_id: &str) -> McpResult<&str> {
    let trimmed = prompt_id.trim();
    if trimmed.is_empty() {
        return Err(McpError::InvalidParams(
            "'prompt_id' must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Raw provider JSON on success, `{"error": ...}` on failure.
pub(crate) fn respond(result: PromptApiResult<Value>, context: &str) -> ToolCallResult {
    match result {
        Ok(value) => ToolCallResult::json(&value),
        Err(e) => {
            tracing::error!("{context}: {e}");
            ToolCallResult::failure(&e.to_string())
        }
    }
}

/// A prompt version given either as text (`"1"`, `"DRAFT"`) or as a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum VersionParam {
    Text(String),
    Number(u64),
}

impl VersionParam {
    /// `None` for blank text, so an empty version never reaches the payload.
    pub(crate) fn normalized(version: Option<VersionParam>) -> Option<String> {
        match version? {
            VersionParam::Text(text) if text.trim().is_empty() => None,
            VersionParam::Text(text) => Some(text.trim().to_string()),
            VersionParam::Number(n) => Some(n.to_string()),
        }
    }
}
