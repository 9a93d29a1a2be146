//! `UpdatePrompt` tool: replace the DRAFT of an existing prompt.

use serde::Deserialize;
use serde_json::{json, Value};

use bedrock_prompt_management::{
    InferenceParams, PromptManagementClient, SparseMap, DEFAULT_VARIANT_NAME,
};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{parse_params, require_id, respond};

pub const NAME: &str = "UpdatePrompt";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateParams {
    prompt_id: String,
    name: String,
    #[serde(default)]
    default_variant: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "customer_encryption_key_arn")]
    encryption_key_arn: Option<String>,
    #[serde(default)]
    variants: Option<Vec<Value>>,
    #[serde(default)]
    model_id: Option<String>,
    #[serde(default, alias = "template_text")]
    prompt_text: Option<String>,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    top_p: Option<f64>,
    #[serde(default)]
    max_tokens: Option<u32>,
}

impl UpdateParams {
    fn inference(&self) -> InferenceParams {
        InferenceParams {
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
        }
    }

    /// One replacement variant from the flat fields, or `None` when none of them is set.
    fn flat_variant(&self) -> Option<Value> {
        let model_id = self.model_id.as_deref().filter(|m| !m.trim().is_empty());
        let inference = self.inference();
        if model_id.is_none() && self.prompt_text.is_none() && inference.is_empty() {
            return None;
        }

        let name = self
            .default_variant
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_VARIANT_NAME);
        let mut variant = SparseMap::new().with("name", name).with_opt("modelId", model_id);
        if let Some(text) = &self.prompt_text {
            variant = variant
                .with("templateType", "TEXT")
                .with("templateConfiguration", json!({ "text": { "text": text } }));
        }
        Some(
            variant
                .with_opt("inferenceConfiguration", inference.to_payload())
                .into_value(),
        )
    }
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Update an existing prompt. The name is required by the API even when it does \
             not change. Variants, when given, replace the existing variants entirely and \
             are passed through in the provider's variant format. Without variants, any of \
             model_id, prompt_text, temperature, top_p or max_tokens replaces the variants \
             with a single TEXT variant named after default_variant (or \"default\")."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "prompt_id": {
                    "type": "string",
                    "description": "The ID of the prompt to update"
                },
                "name": {
                    "type": "string",
                    "description": "Name of the prompt"
                },
                "default_variant": {
                    "type": "string",
                    "description": "Name of the default variant"
                },
                "description": {
                    "type": "string",
                    "description": "New description"
                },
                "encryption_key_arn": {
                    "type": "string",
                    "description": "ARN of a customer managed KMS key"
                },
                "variants": {
                    "type": "array",
                    "items": { "type": "object" },
                    "description": "Full replacement list of variants; takes precedence over the flat variant fields"
                },
                "model_id": {
                    "type": "string",
                    "description": "Model for the single replacement variant"
                },
                "prompt_text": {
                    "type": "string",
                    "description": "Template text for the single replacement variant"
                },
                "temperature": {
                    "type": "number",
                    "description": "Sampling temperature"
                },
                "top_p": {
                    "type": "number",
                    "description": "Nucleus sampling threshold"
                },
                "max_tokens": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Maximum tokens to generate"
                }
            },
            "required": ["prompt_id", "name"],
            "additionalProperties": false
        }),
    }
}

pub async fn execute(args: Value, client: &PromptManagementClient) -> McpResult<ToolCallResult> {
    let params: UpdateParams = parse_params(args)?;
    let prompt_id = require_id(&params.prompt_id)?.to_string();
    if params.name.trim().is_empty() {
        return Err(McpError::InvalidParams("'name' must not be empty".to_string()));
    }

    let payload = build_payload(&prompt_id, params);
    tracing::info!("Updating prompt {prompt_id}");

    let result = client.api().update_prompt(payload).await;

    Ok(respond(result, &format!("Error updating prompt {prompt_id}")))
}

fn build_payload(prompt_id: &str, mut params: UpdateParams) -> Value {
    let variants = params
        .variants
        .take()
        .or_else(|| params.flat_variant().map(|variant| vec![variant]));
    SparseMap::new()
        .with("promptIdentifier", prompt_id)
        .with("name", params.name.trim())
        .with_text("defaultVariant", params.default_variant.as_deref())
        .with_text("description", params.description.as_deref())
        .with_text("customerEncryptionKeyArn", params.encryption_key_arn.as_deref())
        .with_opt("variants", variants)
        .into_value()
}
