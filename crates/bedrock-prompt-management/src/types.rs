//! Core data types for prompts, variants, and API errors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::payload::SparseMap;

/// Variant name used when the caller does not pick one.
pub const DEFAULT_VARIANT_NAME: &str = "default";

/// How a variant's template body is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemplateType {
    Text,
    Chat,
}

impl TemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Text => "TEXT",
            TemplateType::Chat => "CHAT",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = PromptApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TEXT" => Ok(TemplateType::Text),
            "CHAT" => Ok(TemplateType::Chat),
            other => Err(PromptApiError::InvalidRequest(format!(
                "Unsupported template type: {other}. Use 'TEXT' or 'CHAT'."
            ))),
        }
    }
}

/// One role/content turn of a chat template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Provider shape: `{"role": ..., "content": [{"text": ...}]}`.
    pub fn to_payload(&self) -> Value {
        json!({
            "role": self.role,
            "content": [{ "text": self.content }],
        })
    }
}

/// Model inference parameters attached to a variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceParams {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl InferenceParams {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_p.is_none() && self.max_tokens.is_none()
    }

    /// `{"text": {...}}` with only the supplied values, or `None` when all are absent.
    pub fn to_payload(&self) -> Option<Value> {
        if self.is_empty() {
            return None;
        }
        let text = SparseMap::new()
            .with_opt("temperature", self.temperature)
            .with_opt("topP", self.top_p)
            .with_opt("maxTokens", self.max_tokens);
        Some(json!({ "text": text.into_value() }))
    }
}

/// A prompt as listed by `ListPrompts`, with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub updated_at: Option<Value>,
}

impl PromptSummary {
    /// Browsing shape: snake_case timestamps, missing fields as empty strings.
    pub fn normalized(&self) -> Value {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let stamp = |v: &Option<Value>| match v {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        json!({
            "name": text(&self.name),
            "description": text(&self.description),
            "created_at": stamp(&self.created_at),
            "updated_at": stamp(&self.updated_at),
            "id": text(&self.id),
            "version": text(&self.version),
        })
    }
}

/// Errors raised while talking to the prompt management service.
///
/// `Display` is the bare message so callers can surface it verbatim.
#[derive(thiserror::Error, Debug)]
pub enum PromptApiError {
    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Service {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("{0}")]
    Credentials(String),

    #[error("{0}")]
    Signing(String),

    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for PromptApiError {
    fn from(e: reqwest::Error) -> Self {
        PromptApiError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for PromptApiError {
    fn from(e: serde_json::Error) -> Self {
        PromptApiError::Decode(e.to_string())
    }
}

/// Convenience result type.
pub type PromptApiResult<T> = Result<T, PromptApiError>;
