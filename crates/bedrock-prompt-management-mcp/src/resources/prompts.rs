//! Resource: resource://prompts

use serde_json::{Map, Value};

use bedrock_prompt_management::{PromptApiResult, PromptManagementClient, PromptSummary};

use crate::types::{error_text, ReadResourceResult, ResourceContent, ResourceDefinition};

pub const URI: &str = "resource://prompts";
pub const NAME: &str = "BedrockPrompts";
const MIME_TYPE: &str = "application/json";

pub fn definition() -> ResourceDefinition {
    ResourceDefinition {
        uri: URI.to_string(),
        name: NAME.to_string(),
        description: Some(
            "All prompts in the account keyed by id, each with name, description, \
             created_at, updated_at, id, and version."
                .to_string(),
        ),
        mime_type: Some(MIME_TYPE.to_string()),
    }
}

/// Provider failures are rendered into the resource text, never raised.
pub async fn read(client: &PromptManagementClient) -> ReadResourceResult {
    let text = match client.list_all().await {
        Ok(summaries) => match catalogue(summaries) {
            Ok(catalogue) => Value::Object(catalogue).to_string(),
            Err(e) => {
                tracing::error!("Error decoding prompt summaries: {e}");
                error_text(&e.to_string())
            }
        },
        Err(e) => {
            tracing::error!("Error reading prompts resource: {e}");
            error_text(&e.to_string())
        }
    };

    ReadResourceResult {
        contents: vec![ResourceContent::text(URI, MIME_TYPE, text)],
    }
}

/// Summaries keyed by id; later duplicates win.
fn catalogue(summaries: Vec<Value>) -> PromptApiResult<Map<String, Value>> {
    let mut catalogue = Map::new();
    for raw in summaries {
        let summary: PromptSummary = serde_json::from_value(raw)?;
        let id = summary.id.clone().unwrap_or_default();
        catalogue.insert(id, summary.normalized());
    }
    Ok(catalogue)
}
