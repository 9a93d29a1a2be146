//! Shared fixtures: an in-memory prompt API and JSON-RPC helpers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use bedrock_prompt_management::{
    Operation, PromptApi, PromptApiError, PromptApiResult, PromptManagementClient,
};
use bedrock_prompt_management_mcp::protocol::ProtocolHandler;

/// Records every call and answers from a script, falling back to a fixed reply.
pub struct RecordingApi {
    calls: Mutex<Vec<(Operation, Value)>>,
    script: Mutex<VecDeque<PromptApiResult<Value>>>,
    fallback: Fallback,
}

enum Fallback {
    Reply(Value),
    Fail(String),
}

impl RecordingApi {
    pub fn replying(reply: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            fallback: Fallback::Reply(reply),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            fallback: Fallback::Fail(message.to_string()),
        })
    }

    pub fn push(&self, reply: Value) {
        self.script.lock().unwrap().push_back(Ok(reply));
    }

    pub fn calls(&self) -> Vec<(Operation, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> (Operation, Value) {
        self.calls().pop().expect("no calls recorded")
    }
}

#[async_trait]
impl PromptApi for RecordingApi {
    async fn invoke(&self, operation: Operation, payload: Value) -> PromptApiResult<Value> {
        self.calls.lock().unwrap().push((operation, payload));
        if let Some(reply) = self.script.lock().unwrap().pop_front() {
            return reply;
        }
        match &self.fallback {
            Fallback::Reply(value) => Ok(value.clone()),
            Fallback::Fail(message) => Err(PromptApiError::Service {
                status: 400,
                code: Some("ValidationException".to_string()),
                message: message.clone(),
            }),
        }
    }
}

pub fn handler(api: Arc<RecordingApi>) -> ProtocolHandler {
    let client = PromptManagementClient::new(api);
    ProtocolHandler::new(Arc::new(client))
}

pub fn request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

pub async fn send(handler: &ProtocolHandler, msg: Value) -> Option<Value> {
    handler.handle_text(&msg.to_string()).await
}

pub async fn call_tool(handler: &ProtocolHandler, name: &str, arguments: Value) -> Value {
    let response = send(
        handler,
        request(1, "tools/call", json!({ "name": name, "arguments": arguments })),
    )
    .await
    .expect("tools/call must answer");
    assert!(
        response.get("error").is_none(),
        "unexpected protocol error: {response}"
    );
    let text = response["result"]["content"][0]["text"]
        .as_str()
        .expect("text content");
    serde_json::from_str(text).expect("tool output is JSON")
}
