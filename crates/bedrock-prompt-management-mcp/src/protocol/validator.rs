//! Request shape checks applied before dispatch.

use serde_json::Value;

use crate::types::{JsonRpcRequest, McpError, McpResult, JSONRPC_VERSION};

pub fn validate_request(request: &JsonRpcRequest) -> McpResult<()> {
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(McpError::InvalidRequest(format!(
            "Unsupported jsonrpc version \"{}\"",
            request.jsonrpc
        )));
    }

    if request.method.trim().is_empty() {
        return Err(McpError::InvalidRequest("Empty method name".to_string()));
    }

    // JSON-RPC 2.0 allows structured params only.
    match &request.params {
        None | Some(Value::Null) | Some(Value::Object(_)) | Some(Value::Array(_)) => Ok(()),
        Some(_) => Err(McpError::InvalidRequest(format!(
            "Params of '{}' must be an object or array",
            request.method
        ))),
    }
}
