//! `ListPrompts` tool: list every prompt in the account.

use serde::Deserialize;
use serde_json::{json, Value};

use bedrock_prompt_management::PromptManagementClient;

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{parse_params, respond};

pub const NAME: &str = "ListPrompts";

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default = "default_max_results")]
    max_results: usize,
}

fn default_max_results() -> usize {
    100
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "List all prompts available in your AWS Bedrock account. Returns a JSON object \
             with `promptSummaries`, each carrying id, name, description, createdAt, \
             updatedAt, and version."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "max_results": {
                    "type": "integer",
                    "minimum": 1,
                    "default": 100,
                    "description": "Maximum number of prompts to retrieve"
                }
            }
        }),
    }
}

pub async fn execute(args: Value, client: &PromptManagementClient) -> McpResult<ToolCallResult> {
    let params: ListParams = parse_params(args)?;
    if params.max_results == 0 {
        return Err(McpError::InvalidParams(
            "'max_results' must be at least 1".to_string(),
        ));
    }

    let result = client
        .list(params.max_results)
        .await
        .map(|summaries| json!({ "promptSummaries": summaries }));

    Ok(respond(result, "Error listing prompts"))
}
