//! JSON-RPC dispatcher: routes each request to the tool or resource registry.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use bedrock_prompt_management::PromptManagementClient;

use crate::resources::ResourceRegistry;
use crate::tools::ToolRegistry;
use crate::transport::framing;
use crate::types::*;

use super::negotiation::NegotiatedCapabilities;
use super::validator::validate_request;

/// Dispatches incoming JSON-RPC messages. Cheap to clone; clones share the
/// client and the handshake state.
#[derive(Clone)]
pub struct ProtocolHandler {
    client: Arc<PromptManagementClient>,
    capabilities: Arc<Mutex<NegotiatedCapabilities>>,
}

impl ProtocolHandler {
    pub fn new(client: Arc<PromptManagementClient>) -> Self {
        Self {
            client,
            capabilities: Arc::new(Mutex::new(NegotiatedCapabilities::default())),
        }
    }

    pub async fn is_initialized(&self) -> bool {
        self.capabilities.lock().await.initialized
    }

    /// Parse one raw frame and handle it. Malformed JSON yields a parse
    /// error response with a null id.
    pub async fn handle_text(&self, text: &str) -> Option<Value> {
        match framing::parse_message(text) {
            Ok(msg) => self.handle_message(msg).await,
            Err(e) => {
                tracing::warn!("Parse error: {e}");
                Some(to_value(e.to_json_rpc_error(RequestId::Null)))
            }
        }
    }

    pub async fn handle_message(&self, msg: JsonRpcMessage) -> Option<Value> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.handle_request(req).await),
            JsonRpcMessage::Notification(notif) => {
                self.handle_notification(notif).await;
                None
            }
            _ => {
                tracing::warn!("Ignoring response message sent by the client");
                None
            }
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Value {
        let id = request.id.clone();
        if let Err(e) = validate_request(&request) {
            return to_value(e.to_json_rpc_error(id));
        }

        tracing::debug!("Request {id}: {}", request.method);
        match self.dispatch_request(request).await {
            Ok(value) => to_value(JsonRpcResponse::new(id, value)),
            Err(e) => {
                tracing::debug!("Request {id} failed: {e}");
                to_value(e.to_json_rpc_error(id))
            }
        }
    }

    async fn dispatch_request(&self, request: JsonRpcRequest) -> McpResult<Value> {
        let JsonRpcRequest { method, params, .. } = request;
        match method.as_str() {
            "initialize" => self.handle_initialize(params).await,
            "shutdown" => {
                tracing::info!("Shutdown requested");
                Ok(empty_object())
            }
            "ping" => Ok(empty_object()),

            "tools/list" => serialize(ToolListResult {
                tools: ToolRegistry::list_tools(),
                next_cursor: None,
            }),
            "tools/call" => self.handle_tools_call(params).await,

            "resources/list" => serialize(ResourceListResult {
                resources: ResourceRegistry::list_resources(),
                next_cursor: None,
            }),
            "resources/templates/list" => serialize(ResourceTemplateListResult {
                resource_templates: ResourceRegistry::list_templates(),
                next_cursor: None,
            }),
            "resources/read" => self.handle_resources_read(params).await,
            "resources/subscribe" | "resources/unsubscribe" => Ok(empty_object()),

            _ => Err(McpError::MethodNotFound(method)),
        }
    }

    async fn handle_notification(&self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            "initialized" | "notifications/initialized" => {
                self.capabilities.lock().await.mark_initialized();
            }
            "notifications/cancelled" | "$/cancelRequest" => {
                // Calls run to completion; there is nothing to abort.
                tracing::info!("Received cancellation notification");
            }
            other => {
                tracing::debug!("Unknown notification: {other}");
            }
        }
    }

    async fn handle_initialize(&self, params: Option<Value>) -> McpResult<Value> {
        let init_params: InitializeParams = required_params(params, "initialize")?;
        let result = self.capabilities.lock().await.negotiate(init_params)?;
        serialize(result)
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> McpResult<Value> {
        let call: ToolCallParams = required_params(params, "tools/call")?;
        tracing::info!("Calling tool {}", call.name);
        let result = ToolRegistry::call(&call.name, call.arguments, &self.client).await?;
        serialize(result)
    }

    async fn handle_resources_read(&self, params: Option<Value>) -> McpResult<Value> {
        let read: ResourceReadParams = required_params(params, "resources/read")?;
        let result = ResourceRegistry::read(&read.uri, &self.client).await?;
        serialize(result)
    }
}

fn required_params<T: DeserializeOwned>(params: Option<Value>, method: &str) -> McpResult<T> {
    let params =
        params.ok_or_else(|| McpError::InvalidParams(format!("Params required for {method}")))?;
    serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))
}

fn serialize(value: impl Serialize) -> McpResult<Value> {
    serde_json::to_value(value).map_err(|e| McpError::InternalError(e.to_string()))
}

fn to_value(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
