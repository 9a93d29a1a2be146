//! `CreatePrompt` tool: create a prompt with a single TEXT or CHAT variant.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{json, Value};

use bedrock_prompt_management::{
    ChatTurn, InferenceParams, PromptApiError, PromptManagementClient, SparseMap, TemplateType,
    VariantSpec, DEFAULT_VARIANT_NAME,
};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{parse_params, respond};

pub const NAME: &str = "CreatePrompt";

#[derive(Debug, Deserialize)]
struct CreateParams {
    name: String,
    template_type: String,
    #[serde(
        default,
        alias = "prompt_text",
        alias = "text_template",
        alias = "system_prompt"
    )]
    template_text: String,
    #[serde(default)]
    input_variable_names: Vec<String>,
    #[serde(default = "default_variant_name")]
    default_variant: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    model_id: Option<String>,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    top_p: Option<f64>,
    #[serde(default)]
    max_tokens: Option<u32>,
    #[serde(default)]
    chat_messages: Option<Vec<ChatTurn>>,
    #[serde(default)]
    client_token: Option<String>,
    #[serde(default, alias = "customer_encryption_key_arn")]
    encryption_key_arn: Option<String>,
    #[serde(default)]
    tags: Option<BTreeMap<String, String>>,
}

fn default_variant_name() -> String {
    DEFAULT_VARIANT_NAME.to_string()
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Create a new prompt in Amazon Bedrock Prompt Management. TEXT prompts carry a \
             template body; CHAT prompts carry an optional system message and a list of \
             role/content turns (a short greeting exchange is used when none are given). \
             Variables are referenced in templates as {{variable_name}}."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Name of the prompt"
                },
                "template_type": {
                    "type": "string",
                    "enum": ["TEXT", "CHAT"],
                    "description": "Template type, TEXT or CHAT"
                },
                "template_text": {
                    "type": "string",
                    "description": "Template body for TEXT, system message for CHAT. Also accepted as prompt_text, text_template or system_prompt; supply only one of these names"
                },
                "input_variable_names": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Names of the variables used in the template"
                },
                "default_variant": {
                    "type": "string",
                    "default": "default",
                    "description": "Name of the single variant, also used as the default variant"
                },
                "description": {
                    "type": "string",
                    "description": "Description of the prompt"
                },
                "model_id": {
                    "type": "string",
                    "description": "Model identifier for the variant"
                },
                "temperature": {
                    "type": "number",
                    "description": "Sampling temperature"
                },
                "top_p": {
                    "type": "number",
                    "description": "Nucleus sampling probability"
                },
                "max_tokens": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of tokens to generate"
                },
                "chat_messages": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "role": { "type": "string" },
                            "content": { "type": "string" }
                        },
                        "required": ["role", "content"]
                    },
                    "description": "Conversation turns for CHAT templates"
                },
                "client_token": {
                    "type": "string",
                    "description": "Idempotency token"
                },
                "encryption_key_arn": {
                    "type": "string",
                    "description": "ARN of a customer managed KMS key"
                },
                "tags": {
                    "type": "object",
                    "additionalProperties": { "type": "string" },
                    "description": "Tags to attach to the prompt"
                }
            },
            "required": ["name", "template_type"]
        }),
    }
}

pub async fn execute(args: Value, client: &PromptManagementClient) -> McpResult<ToolCallResult> {
    let params: CreateParams = parse_params(args)?;

    if params.name.trim().is_empty() {
        return Err(McpError::InvalidParams("'name' must not be empty".to_string()));
    }
    let template_type: TemplateType = params
        .template_type
        .parse()
        .map_err(|e: PromptApiError| McpError::InvalidParams(e.to_string()))?;
    if template_type == TemplateType::Text && params.template_text.trim().is_empty() {
        return Err(McpError::InvalidParams(
            "'template_text' is required for TEXT prompts".to_string(),
        ));
    }

    let name = params.name.trim().to_string();
    let payload = build_payload(params, template_type);
    tracing::info!("Creating {template_type} prompt '{name}'");

    let result = client.api().create_prompt(payload).await;

    Ok(respond(result, &format!("Error creating prompt {name}")))
}

fn build_payload(params: CreateParams, template_type: TemplateType) -> Value {
    let variant_name = match params.default_variant.trim() {
        "" => DEFAULT_VARIANT_NAME.to_string(),
        name => name.to_string(),
    };

    let variant = VariantSpec {
        name: variant_name.clone(),
        template_type,
        template_text: params.template_text,
        input_variables: params.input_variable_names,
        model_id: params.model_id,
        inference: InferenceParams {
            temperature: params.temperature,
            top_p: params.top_p,
            max_tokens: params.max_tokens,
        },
        chat_messages: params.chat_messages,
    };

    SparseMap::new()
        .with("name", params.name.trim())
        .with_text("description", params.description.as_deref())
        .with("variants", vec![variant.build()])
        .with("defaultVariant", variant_name)
        .with_text("clientToken", params.client_token.as_deref())
        .with_text("customerEncryptionKeyArn", params.encryption_key_arn.as_deref())
        .with_string_map("tags", params.tags.as_ref())
        .into_value()
}
