//! Tool registration and dispatch.

use serde_json::Value;

use bedrock_prompt_management::PromptManagementClient;

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{
    create_prompt, create_prompt_version, delete_prompt, get_prompt, list_prompts, update_prompt,
};

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![
            list_prompts::definition(),
            get_prompt::definition(),
            create_prompt::definition(),
            update_prompt::definition(),
            create_prompt_version::definition(),
            delete_prompt::definition(),
        ]
    }

    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        client: &PromptManagementClient,
    ) -> McpResult<ToolCallResult> {
        let args = match arguments {
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(args) => args,
        };

        match name {
            list_prompts::NAME => list_prompts::execute(args, client).await,
            get_prompt::NAME => get_prompt::execute(args, client).await,
            create_prompt::NAME => create_prompt::execute(args, client).await,
            update_prompt::NAME => update_prompt::execute(args, client).await,
            create_prompt_version::NAME => create_prompt_version::execute(args, client).await,
            delete_prompt::NAME => delete_prompt::execute(args, client).await,
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}
