//! Resource registration and dispatch.

use bedrock_prompt_management::PromptManagementClient;

use crate::types::{
    McpError, McpResult, ReadResourceResult, ResourceDefinition, ResourceTemplateDefinition,
};

use super::prompts;

pub struct ResourceRegistry;

impl ResourceRegistry {
    /// No parameterised resources are offered.
    pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
        Vec::new()
    }

    pub fn list_resources() -> Vec<ResourceDefinition> {
        vec![prompts::definition()]
    }

    pub async fn read(uri: &str, client: &PromptManagementClient) -> McpResult<ReadResourceResult> {
        match uri {
            prompts::URI => Ok(prompts::read(client).await),
            _ => Err(McpError::ResourceNotFound(uri.to_string())),
        }
    }
}
