//! The prompt management API seam and its REST routing table.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::types::{PromptApiError, PromptApiResult};

/// A single prompt management API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListPrompts,
    GetPrompt,
    CreatePrompt,
    UpdatePrompt,
    CreatePromptVersion,
    DeletePrompt,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListPrompts => "ListPrompts",
            Operation::GetPrompt => "GetPrompt",
            Operation::CreatePrompt => "CreatePrompt",
            Operation::UpdatePrompt => "UpdatePrompt",
            Operation::CreatePromptVersion => "CreatePromptVersion",
            Operation::DeletePrompt => "DeletePrompt",
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Operation::ListPrompts | Operation::GetPrompt => "GET",
            Operation::CreatePrompt | Operation::CreatePromptVersion => "POST",
            Operation::UpdatePrompt => "PUT",
            Operation::DeletePrompt => "DELETE",
        }
    }

    /// Payload keys that travel in the query string rather than the body.
    fn query_keys(&self) -> &'static [&'static str] {
        match self {
            Operation::ListPrompts => &["maxResults", "nextToken", "promptIdentifier"],
            Operation::GetPrompt | Operation::DeletePrompt => &["promptVersion"],
            _ => &[],
        }
    }

    fn needs_identifier(&self) -> bool {
        !matches!(self, Operation::ListPrompts | Operation::CreatePrompt)
    }

    /// Split a provider payload into path segments, query pairs, and body.
    pub fn route(&self, payload: Value) -> PromptApiResult<Route> {
        let mut fields = match payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(PromptApiError::InvalidRequest(format!(
                    "{} payload must be a JSON object, got {other}",
                    self.name()
                )))
            }
        };

        let mut segments = vec!["prompts".to_string()];
        if self.needs_identifier() {
            let id = match fields.remove("promptIdentifier") {
                Some(Value::String(id)) if !id.trim().is_empty() => id,
                _ => {
                    return Err(PromptApiError::InvalidRequest(format!(
                        "{} requires a promptIdentifier",
                        self.name()
                    )))
                }
            };
            segments.push(id);
        }
        match self {
            Operation::CreatePromptVersion => segments.push("versions".to_string()),
            // Collection and item routes carry a trailing slash.
            _ => segments.push(String::new()),
        }

        let mut query = Vec::new();
        for key in self.query_keys() {
            if let Some(value) = fields.remove(*key) {
                match value {
                    Value::Null => {}
                    Value::String(s) => query.push((key.to_string(), s)),
                    other => query.push((key.to_string(), other.to_string())),
                }
            }
        }

        let body = match self {
            Operation::ListPrompts | Operation::GetPrompt | Operation::DeletePrompt => None,
            _ => Some(Value::Object(fields)),
        };

        Ok(Route {
            method: self.method(),
            segments,
            query,
            body,
        })
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where and how an operation is sent over HTTP.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub method: &'static str,
    /// Raw (unencoded) path segments; an empty last segment means a trailing slash.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Anything able to execute prompt management operations.
///
/// Requests and responses are the provider's JSON shapes, untouched.
#[async_trait]
pub trait PromptApi: Send + Sync {
    async fn invoke(&self, operation: Operation, payload: Value) -> PromptApiResult<Value>;

    async fn list_prompts(&self, payload: Value) -> PromptApiResult<Value> {
        self.invoke(Operation::ListPrompts, payload).await
    }

    async fn get_prompt(&self, payload: Value) -> PromptApiResult<Value> {
        self.invoke(Operation::GetPrompt, payload).await
    }

    async fn create_prompt(&self, payload: Value) -> PromptApiResult<Value> {
        self.invoke(Operation::CreatePrompt, payload).await
    }

    async fn update_prompt(&self, payload: Value) -> PromptApiResult<Value> {
        self.invoke(Operation::UpdatePrompt, payload).await
    }

    async fn create_prompt_version(&self, payload: Value) -> PromptApiResult<Value> {
        self.invoke(Operation::CreatePromptVersion, payload).await
    }

    async fn delete_prompt(&self, payload: Value) -> PromptApiResult<Value> {
        self.invoke(Operation::DeletePrompt, payload).await
    }
}
