//! `CreatePromptVersion` tool: snapshot the DRAFT as an immutable version.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{json, Value};

use bedrock_prompt_management::{PromptManagementClient, SparseMap};

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::{parse_params, require_id, respond};

pub const NAME: &str = "CreatePromptVersion";

#[derive(Debug, Deserialize)]
struct VersionParams {
    prompt_id: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    client_token: Option<String>,
    #[serde(default)]
    tags: Option<BTreeMap<String, String>>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Create a new version of a prompt from its current DRAFT. Versions are immutable \
             snapshots that can be referenced for deployment."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "prompt_id": {
                    "type": "string",
                    "description": "The ID of the prompt to version"
                },
                "description": {
                    "type": "string",
                    "description": "Description of this version"
                },
                "client_token": {
                    "type": "string",
                    "description": "Idempotency token"
                },
                "tags": {
                    "type": "object",
                    "additionalProperties": { "type": "string" },
                    "description": "Tags to attach to the version"
                }
            },
            "required": ["prompt_id"]
        }),
    }
}

pub async fn execute(args: Value, client: &PromptManagementClient) -> McpResult<ToolCallResult> {
    let params: VersionParams = parse_params(args)?;
    let prompt_id = require_id(&params.prompt_id)?;

    let payload = SparseMap::new()
        .with("promptIdentifier", prompt_id)
        .with_text("description", params.description.as_deref())
        .with_text("clientToken", params.client_token.as_deref())
        .with_string_map("tags", params.tags.as_ref())
        .into_value();
    tracing::info!("Creating a version of prompt {prompt_id}");

    let result = client.api().create_prompt_version(payload).await;

    Ok(respond(
        result,
        &format!("Error creating version for prompt {prompt_id}"),
    ))
}
