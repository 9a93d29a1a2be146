//! Server identity and the capabilities exchanged during `initialize`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MCP_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "bedrock-prompt-management-mcp-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Usage guidance handed to the agent during `initialize`.
pub const SERVER_INSTRUCTIONS: &str = "\
The AWS Bedrock Prompt Management MCP Server provides access to Amazon Bedrock's Prompt \
Management capabilities, allowing you to create, discover, and manage prompts.

## Usage Workflow:
1. Start by using the `ListPrompts` tool to discover available prompts
2. Use `GetPrompt` to retrieve detailed information about a specific prompt
3. Use `CreatePrompt` to create new prompts with TEXT or CHAT templates
4. Use `UpdatePrompt` to modify existing prompts (requires prompt ID)
5. Use `CreatePromptVersion` to save versions of your prompts for deployment
6. Use `DeletePrompt` to remove a single version or an entire prompt

## Important Notes:
- Prompt variables must be specified in template text using {{variable_name}} syntax
- When updating prompts, the name parameter is required by the API even if unchanged
- Variants passed to UpdatePrompt replace the existing variants entirely
- CreatePromptVersion creates a permanent snapshot of a prompt that can be deployed
- Every tool answers with JSON text; failures come back as {\"error\": \"...\"}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

/// Whatever the client announces. Kept for logging only; the server
/// never sends requests back to the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientCapabilities {
    #[serde(flatten)]
    pub announced: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListChanged {
    pub list_changed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesCapability {
    pub subscribe: bool,
    pub list_changed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<ListChanged>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesCapability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Map<String, Value>>,
}

impl ServerCapabilities {
    /// The prompt catalogue lives remotely, so nothing is ever pushed.
    pub fn prompt_management() -> Self {
        Self {
            tools: Some(ListChanged::default()),
            resources: Some(ResourcesCapability::default()),
            logging: Some(Map::new()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: Implementation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl InitializeResult {
    pub fn default_result() -> Self {
        Self {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities::prompt_management(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }
}
