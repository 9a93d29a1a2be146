//! `DeletePrompt` tool: delete a prompt version, or the whole prompt.

use serde::Deserialize;
use serde_json::{json, Value};

use bedrock_prompt_management::PromptManagementClient;

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::{parse_params, require_id, respond, VersionParam};

pub const NAME: &str = "DeletePrompt";

#[derive(Debug, Deserialize)]
struct DeleteParams {
    prompt_id: String,
    #[serde(default, alias = "prompt_version", alias = "version_number")]
    version: Option<VersionParam>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Delete a prompt or one of its versions. Without a version the entire prompt \
             and all of its versions are deleted; with a version only that version is removed."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "prompt_id": {
                    "type": "string",
                    "description": "The ID of the prompt to delete"
                },
                "version": {
                    "type": "string",
                    "description": "Optional version to delete (omit to delete the whole prompt)"
                }
            },
            "required": ["prompt_id"]
        }),
    }
}

pub async fn execute(args: Value, client: &PromptManagementClient) -> McpResult<ToolCallResult> {
    let params: DeleteParams = parse_params(args)?;
    let prompt_id = require_id(&params.prompt_id)?;
    let version = VersionParam::normalized(params.version);

    match &version {
        Some(v) => tracing::info!("Deleting version {v} of prompt {prompt_id}"),
        None => tracing::info!("Deleting prompt {prompt_id} and all of its versions"),
    }
    let result = client.delete(prompt_id, version.as_deref()).await;

    Ok(respond(result, &format!("Error deleting prompt {prompt_id}")))
}
