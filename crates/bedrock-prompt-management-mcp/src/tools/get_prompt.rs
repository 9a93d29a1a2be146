//! `GetPrompt` tool: fetch one prompt, DRAFT unless a version is named.

use serde::Deserialize;
use serde_json::{json, Value};

use bedrock_prompt_management::PromptManagementClient;

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::{parse_params, require_id, respond, VersionParam};

pub const NAME: &str = "GetPrompt";

#[derive(Debug, Deserialize)]
struct GetParams {
    prompt_id: String,
    #[serde(default, alias = "version_number", alias = "prompt_version")]
    version: Option<VersionParam>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Get detailed information about a specific prompt, including its variants, \
             template configuration, inference configuration, and timestamps. Without a \
             version the DRAFT is returned."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "prompt_id": {
                    "type": "string",
                    "description": "The ID of the prompt to retrieve"
                },
                "version": {
                    "type": "string",
                    "description": "Optional version number to retrieve (defaults to DRAFT)"
                }
            },
            "required": ["prompt_id"]
        }),
    }
}

pub async fn execute(args: Value, client: &PromptManagementClient) -> McpResult<ToolCallResult> {
    let params: GetParams = parse_params(args)?;
    let prompt_id = require_id(&params.prompt_id)?;
    let version = VersionParam::normalized(params.version);

    let result = client.get(prompt_id, version.as_deref()).await;

    Ok(respond(result, &format!("Error getting prompt {prompt_id}")))
}
