//! Prompt variant assembly for TEXT and CHAT templates.

use serde_json::{json, Value};

use crate::payload::SparseMap;
use crate::types::{ChatTurn, InferenceParams, TemplateType};

/// Conversation substituted when a CHAT variant is created without turns.
pub fn default_chat_turns() -> Vec<ChatTurn> {
    vec![
        ChatTurn::new("user", "Hello"),
        ChatTurn::new("assistant", "How can I help you today?"),
    ]
}

/// Everything needed to build one provider-shaped prompt variant.
#[derive(Debug, Clone)]
pub struct VariantSpec {
    pub name: String,
    pub template_type: TemplateType,
    /// Template body for TEXT, system message for CHAT.
    pub template_text: String,
    pub input_variables: Vec<String>,
    pub model_id: Option<String>,
    pub inference: InferenceParams,
    pub chat_messages: Option<Vec<ChatTurn>>,
}

impl VariantSpec {
    pub fn new(
        name: impl Into<String>,
        template_type: TemplateType,
        template_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            template_type,
            template_text: template_text.into(),
            input_variables: Vec::new(),
            model_id: None,
            inference: InferenceParams::default(),
            chat_messages: None,
        }
    }

    /// The variant object as the provider expects it inside `variants`.
    pub fn build(&self) -> Value {
        let template_key = match self.template_type {
            TemplateType::Text => "text",
            TemplateType::Chat => "chat",
        };

        SparseMap::new()
            .with("name", self.name.as_str())
            .with("templateType", self.template_type.as_str())
            .with(
                "templateConfiguration",
                json!({ template_key: self.template_configuration() }),
            )
            .with_text("modelId", self.model_id.as_deref())
            .with_opt("inferenceConfiguration", self.inference_configuration())
            .into_value()
    }

    fn template_configuration(&self) -> Value {
        let config = match self.template_type {
            TemplateType::Text => SparseMap::new().with("text", self.template_text.as_str()),
            TemplateType::Chat => {
                let system = (!self.template_text.trim().is_empty())
                    .then(|| json!([{ "text": self.template_text }]));
                let messages: Vec<Value> =
                    self.chat_turns().iter().map(ChatTurn::to_payload).collect();
                SparseMap::new()
                    .with_opt("system", system)
                    .with("messages", messages)
            }
        };

        config
            .with_opt("inputVariables", self.input_variables_payload())
            .into_value()
    }

    fn chat_turns(&self) -> Vec<ChatTurn> {
        match &self.chat_messages {
            Some(turns) if !turns.is_empty() => turns.clone(),
            _ => {
                tracing::debug!(
                    "No chat messages for variant '{}', using the default greeting exchange",
                    self.name
                );
                default_chat_turns()
            }
        }
    }

    fn input_variables_payload(&self) -> Option<Value> {
        let names: Vec<Value> = self
            .input_variables
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(|n| json!({ "name": n }))
            .collect();
        (!names.is_empty()).then(|| Value::Array(names))
    }

    fn inference_configuration(&self) -> Option<Value> {
        self.inference.to_payload()
    }
}
