//! Typed adapter over the prompt management API.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::api::PromptApi;
use crate::config::AwsSettings;
use crate::http::BedrockAgentHttp;
use crate::payload::SparseMap;
use crate::types::PromptApiResult;

/// Largest page the service hands out per `ListPrompts` call.
const MAX_PAGE_SIZE: usize = 1000;

/// Arguments for [`PromptManagementClient::create`].
#[derive(Debug, Clone, Default)]
pub struct CreatePromptRequest {
    pub name: String,
    pub description: String,
    pub model_id: String,
    pub template: String,
    pub variables: Option<Vec<Value>>,
    pub system_instruction: Option<String>,
    pub messages: Option<Vec<Value>>,
    pub inference_config: Option<Value>,
    pub tools: Option<Vec<Value>>,
    pub metadata: Option<BTreeMap<String, String>>,
}

/// Arguments for [`PromptManagementClient::update`]. Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdatePromptRequest {
    pub description: Option<String>,
    pub model_id: Option<String>,
    pub template: Option<String>,
    pub variables: Option<Vec<Value>>,
    pub system_instruction: Option<String>,
    pub messages: Option<Vec<Value>>,
    pub inference_config: Option<Value>,
    pub tools: Option<Vec<Value>>,
    pub metadata: Option<BTreeMap<String, String>>,
}

/// Friendly method names over the provider's field names and nesting.
///
/// Every method logs a failure with the prompt it concerned and hands the
/// error back unchanged.
#[derive(Clone)]
pub struct PromptManagementClient {
    api: Arc<dyn PromptApi>,
}

impl PromptManagementClient {
    pub fn new(api: Arc<dyn PromptApi>) -> Self {
        Self { api }
    }

    /// Build a client against the real service.
    pub async fn connect(settings: &AwsSettings) -> PromptApiResult<Self> {
        match BedrockAgentHttp::connect(settings).await {
            Ok(http) => Ok(Self::new(Arc::new(http))),
            Err(e) => {
                tracing::error!("Error creating Bedrock client: {e}");
                Err(e)
            }
        }
    }

    /// The underlying API, for callers that assemble their own payloads.
    pub fn api(&self) -> &dyn PromptApi {
        self.api.as_ref()
    }

    /// Collect prompt summaries across pages, stopping at `max_results`.
    pub async fn list(&self, max_results: usize) -> PromptApiResult<Vec<Value>> {
        self.paginate(Some(max_results)).await.map_err(|e| {
            tracing::error!("Error listing prompts: {e}");
            e
        })
    }

    /// Collect every prompt summary the account holds.
    pub async fn list_all(&self) -> PromptApiResult<Vec<Value>> {
        self.paginate(None).await.map_err(|e| {
            tracing::error!("Error listing prompts: {e}");
            e
        })
    }

    async fn paginate(&self, limit: Option<usize>) -> PromptApiResult<Vec<Value>> {
        let mut prompts: Vec<Value> = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page_size = match limit {
                Some(limit) if prompts.len() >= limit => break,
                Some(limit) => (limit - prompts.len()).min(MAX_PAGE_SIZE),
                None => MAX_PAGE_SIZE,
            };

            let request = SparseMap::new()
                .with("maxResults", page_size)
                .with_opt("nextToken", next_token.take())
                .into_value();
            let page = self.api.list_prompts(request).await?;

            if let Some(Value::Array(summaries)) = page.get("promptSummaries") {
                prompts.extend(summaries.iter().cloned());
            }

            next_token = page
                .get("nextToken")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            if next_token.is_none() {
                break;
            }
        }

        if let Some(limit) = limit {
            prompts.truncate(limit);
        }
        Ok(prompts)
    }

    /// Fetch one prompt; without a version the service returns DRAFT.
    pub async fn get(&self, prompt_id: &str, version: Option<&str>) -> PromptApiResult<Value> {
        let request = SparseMap::new()
            .with("promptIdentifier", prompt_id)
            .with_text("promptVersion", version)
            .into_value();

        self.api.get_prompt(request).await.map_err(|e| {
            tracing::error!("Error getting prompt {prompt_id}: {e}");
            e
        })
    }

    pub async fn create(&self, request: &CreatePromptRequest) -> PromptApiResult<Value> {
        let payload = SparseMap::new()
            .with("name", request.name.as_str())
            .with("description", request.description.as_str())
            .with("modelId", request.model_id.as_str())
            .with_opt(
                "promptConfiguration",
                prompt_configuration(
                    Some(request.template.as_str()),
                    request.messages.as_deref(),
                    request.system_instruction.as_deref(),
                    request.tools.as_deref(),
                ),
            );
        let payload = with_common_fields(
            payload,
            request.variables.as_deref(),
            request.inference_config.as_ref(),
            request.metadata.as_ref(),
        );

        self.api
            .create_prompt(payload.into_value())
            .await
            .map_err(|e| {
                tracing::error!("Error creating prompt {}: {e}", request.name);
                e
            })
    }

    pub async fn update(
        &self,
        prompt_id: &str,
        request: &UpdatePromptRequest,
    ) -> PromptApiResult<Value> {
        let payload = SparseMap::new()
            .with("promptIdentifier", prompt_id)
            .with_text("description", request.description.as_deref())
            .with_text("modelId", request.model_id.as_deref())
            .with_opt(
                "promptConfiguration",
                prompt_configuration(
                    request.template.as_deref().filter(|t| !t.is_empty()),
                    request.messages.as_deref(),
                    request.system_instruction.as_deref(),
                    request.tools.as_deref(),
                ),
            );
        let payload = with_common_fields(
            payload,
            request.variables.as_deref(),
            request.inference_config.as_ref(),
            request.metadata.as_ref(),
        );

        self.api
            .update_prompt(payload.into_value())
            .await
            .map_err(|e| {
                tracing::error!("Error updating prompt {prompt_id}: {e}");
                e
            })
    }

    /// Snapshot the current DRAFT as a new immutable version.
    pub async fn create_version(
        &self,
        prompt_id: &str,
        description: Option<&str>,
    ) -> PromptApiResult<Value> {
        let request = SparseMap::new()
            .with("promptIdentifier", prompt_id)
            .with_text("description", description)
            .into_value();

        self.api.create_prompt_version(request).await.map_err(|e| {
            tracing::error!("Error creating version for prompt {prompt_id}: {e}");
            e
        })
    }

    /// Delete one version, or the whole prompt when no version is given.
    pub async fn delete(&self, prompt_id: &str, version: Option<&str>) -> PromptApiResult<Value> {
        let request = SparseMap::new()
            .with("promptIdentifier", prompt_id)
            .with_text("promptVersion", version)
            .into_value();

        self.api.delete_prompt(request).await.map_err(|e| {
            tracing::error!("Error deleting prompt {prompt_id}: {e}");
            e
        })
    }
}

/// STRUCTURED when messages are given, else TEXT whenever `template` is
/// `Some`, even if empty.
fn prompt_configuration(
    template: Option<&str>,
    messages: Option<&[Value]>,
    system_instruction: Option<&str>,
    tools: Option<&[Value]>,
) -> Option<Value> {
    if let Some(messages) = messages.filter(|m| !m.is_empty()) {
        let structured = SparseMap::new()
            .with("messages", messages.to_vec())
            .with_text("systemInstruction", system_instruction)
            .with_opt("tools", tools.filter(|t| !t.is_empty()).map(<[Value]>::to_vec));
        return Some(json!({
            "promptType": "STRUCTURED",
            "structuredPromptConfig": structured.into_value(),
        }));
    }

    template.map(|text| {
        json!({
            "promptType": "TEXT",
            "textPromptConfig": { "text": text },
        })
    })
}

fn with_common_fields(
    payload: SparseMap,
    variables: Option<&[Value]>,
    inference_config: Option<&Value>,
    metadata: Option<&BTreeMap<String, String>>,
) -> SparseMap {
    payload
        .with_opt(
            "variableConfiguration",
            variables
                .filter(|v| !v.is_empty())
                .map(|v| json!({ "variables": v })),
        )
        .with_opt(
            "inferenceConfiguration",
            inference_config.filter(|c| !is_empty_json(c)).cloned(),
        )
        .with_string_map("metadata", metadata)
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::api::Operation;
    use crate::types::PromptApiError;

    /// In-memory API that records payloads and replays scripted replies.
    #[derive(Default)]
    struct ScriptedApi {
        replies: Mutex<VecDeque<PromptApiResult<Value>>>,
        calls: Mutex<Vec<(Operation, Value)>>,
    }

    impl ScriptedApi {
        fn replying(replies: Vec<PromptApiResult<Value>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(Operation, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PromptApi for ScriptedApi {
        async fn invoke(&self, operation: Operation, payload: Value) -> PromptApiResult<Value> {
            self.calls.lock().unwrap().push((operation, payload));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({})))
        }
    }

    fn client(api: &Arc<ScriptedApi>) -> PromptManagementClient {
        PromptManagementClient::new(api.clone())
    }

    #[test]
    fn test_list_aggregates_pages() {
        let api = ScriptedApi::replying(vec![
            Ok(json!({ "promptSummaries": [{ "id": "prompt-1" }], "nextToken": "page-2" })),
            Ok(json!({ "promptSummaries": [{ "id": "prompt-2" }] })),
        ]);

        let prompts = tokio_test::block_on(client(&api).list(50)).unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0]["id"], "prompt-1");
        assert_eq!(prompts[1]["id"], "prompt-2");

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], (Operation::ListPrompts, json!({ "maxResults": 50 })));
        assert_eq!(
            calls[1].1,
            json!({ "maxResults": 49, "nextToken": "page-2" })
        );
    }

    #[test]
    fn test_list_stops_at_limit() {
        let api = ScriptedApi::replying(vec![Ok(json!({
            "promptSummaries": [{ "id": "a" }, { "id": "b" }, { "id": "c" }],
            "nextToken": "more"
        }))]);

        let prompts = tokio_test::block_on(client(&api).list(2)).unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(api.calls().len(), 1);
    }

    #[test]
    fn test_list_all_follows_tokens() {
        let api = ScriptedApi::replying(vec![
            Ok(json!({ "promptSummaries": [{ "id": "a" }], "nextToken": "t" })),
            Ok(json!({ "promptSummaries": [{ "id": "b" }], "nextToken": "" })),
        ]);

        let prompts = tokio_test::block_on(client(&api).list_all()).unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(api.calls()[0].1, json!({ "maxResults": 1000 }));
    }

    #[test]
    fn test_list_propagates_error() {
        let api = ScriptedApi::replying(vec![Err(PromptApiError::Transport(
            "Test error".to_string(),
        ))]);
        let err = tokio_test::block_on(client(&api).list(10)).unwrap_err();
        assert_eq!(err.to_string(), "Test error");
    }

    #[test]
    fn test_get_omits_absent_version() {
        let api = ScriptedApi::replying(vec![]);
        tokio_test::block_on(client(&api).get("prompt-12345", None)).unwrap();
        tokio_test::block_on(client(&api).get("prompt-12345", Some("1"))).unwrap();

        let calls = api.calls();
        assert_eq!(calls[0].1, json!({ "promptIdentifier": "prompt-12345" }));
        assert_eq!(
            calls[1].1,
            json!({ "promptIdentifier": "prompt-12345", "promptVersion": "1" })
        );
    }

    #[test]
    fn test_create_text_configuration() {
        let api = ScriptedApi::replying(vec![Ok(json!({ "id": "prompt-12345" }))]);
        let request = CreatePromptRequest {
            name: "Test Prompt".to_string(),
            description: "A test prompt".to_string(),
            model_id: "anthropic.claude-3-sonnet-20240229-v1:0".to_string(),
            template: "This is a test prompt with {{variable}}".to_string(),
            ..Default::default()
        };

        let response = tokio_test::block_on(client(&api).create(&request)).unwrap();
        assert_eq!(response["id"], "prompt-12345");

        let (operation, payload) = api.calls().remove(0);
        assert_eq!(operation, Operation::CreatePrompt);
        assert_eq!(payload["promptConfiguration"]["promptType"], "TEXT");
        assert_eq!(
            payload["promptConfiguration"]["textPromptConfig"]["text"],
            "This is a test prompt with {{variable}}"
        );
        assert!(payload["promptConfiguration"].get("structuredPromptConfig").is_none());
        for absent in ["variableConfiguration", "inferenceConfiguration", "metadata"] {
            assert!(payload.get(absent).is_none(), "{absent} should be omitted");
        }
    }

    #[test]
    fn test_create_empty_template_still_text() {
        let api = ScriptedApi::replying(vec![]);
        let request = CreatePromptRequest {
            name: "n".to_string(),
            description: "d".to_string(),
            model_id: "m".to_string(),
            template: String::new(),
            ..Default::default()
        };

        tokio_test::block_on(client(&api).create(&request)).unwrap();
        let payload = api.calls().remove(0).1;
        assert_eq!(
            payload["promptConfiguration"],
            json!({ "promptType": "TEXT", "textPromptConfig": { "text": "" } })
        );
    }

    #[test]
    fn test_update_empty_template_omitted() {
        let api = ScriptedApi::replying(vec![]);
        let request = UpdatePromptRequest {
            template: Some(String::new()),
            ..Default::default()
        };

        tokio_test::block_on(client(&api).update("prompt-12345", &request)).unwrap();
        let payload = api.calls().remove(0).1;
        assert!(payload.get("promptConfiguration").is_none());
    }

    #[test]
    fn test_create_structured_configuration() {
        let api = ScriptedApi::replying(vec![]);
        let mut metadata = BTreeMap::new();
        metadata.insert("team".to_string(), "support".to_string());
        let request = CreatePromptRequest {
            name: "Chat".to_string(),
            description: "d".to_string(),
            model_id: "m1".to_string(),
            template: "ignored".to_string(),
            system_instruction: Some("Be kind".to_string()),
            messages: Some(vec![json!({ "role": "user", "content": "Hi" })]),
            tools: Some(vec![json!({ "name": "lookup" })]),
            variables: Some(vec![json!({ "name": "user" })]),
            inference_config: Some(json!({ "temperature": 0.2 })),
            metadata: Some(metadata),
        };

        tokio_test::block_on(client(&api).create(&request)).unwrap();
        let payload = api.calls().remove(0).1;
        let config = &payload["promptConfiguration"];
        assert_eq!(config["promptType"], "STRUCTURED");
        assert!(config.get("textPromptConfig").is_none());
        assert_eq!(config["structuredPromptConfig"]["systemInstruction"], "Be kind");
        assert_eq!(config["structuredPromptConfig"]["tools"][0]["name"], "lookup");
        assert_eq!(
            payload["variableConfiguration"],
            json!({ "variables": [{ "name": "user" }] })
        );
        assert_eq!(payload["inferenceConfiguration"]["temperature"], 0.2);
        assert_eq!(payload["metadata"]["team"], "support");
    }

    #[test]
    fn test_update_sends_only_supplied_fields() {
        let api = ScriptedApi::replying(vec![]);
        let request = UpdatePromptRequest {
            description: Some("Updated description".to_string()),
            ..Default::default()
        };

        tokio_test::block_on(client(&api).update("prompt-12345", &request)).unwrap();
        let (operation, payload) = api.calls().remove(0);
        assert_eq!(operation, Operation::UpdatePrompt);
        assert_eq!(
            payload,
            json!({
                "promptIdentifier": "prompt-12345",
                "description": "Updated description"
            })
        );
    }

    #[test]
    fn test_update_template_and_model() {
        let api = ScriptedApi::replying(vec![]);
        let request = UpdatePromptRequest {
            model_id: Some("anthropic.claude-3-haiku-20240307-v1:0".to_string()),
            template: Some("Updated prompt text".to_string()),
            // A system instruction without messages does not select STRUCTURED.
            system_instruction: Some("unused".to_string()),
            ..Default::default()
        };

        tokio_test::block_on(client(&api).update("prompt-12345", &request)).unwrap();
        let payload = api.calls().remove(0).1;
        assert_eq!(payload["modelId"], "anthropic.claude-3-haiku-20240307-v1:0");
        assert_eq!(payload["promptConfiguration"]["promptType"], "TEXT");
        assert_eq!(
            payload["promptConfiguration"]["textPromptConfig"]["text"],
            "Updated prompt text"
        );
    }

    #[test]
    fn test_create_version_and_delete() {
        let api = ScriptedApi::replying(vec![
            Ok(json!({ "id": "prompt-12345", "version": "1" })),
            Ok(json!({ "id": "prompt-12345", "version": "1" })),
        ]);

        let version =
            tokio_test::block_on(client(&api).create_version("prompt-12345", Some("Version 1")))
                .unwrap();
        assert_eq!(version["version"], "1");
        tokio_test::block_on(client(&api).delete("prompt-12345", Some("1"))).unwrap();

        let calls = api.calls();
        assert_eq!(
            calls[0],
            (
                Operation::CreatePromptVersion,
                json!({ "promptIdentifier": "prompt-12345", "description": "Version 1" })
            )
        );
        assert_eq!(
            calls[1],
            (
                Operation::DeletePrompt,
                json!({ "promptIdentifier": "prompt-12345", "promptVersion": "1" })
            )
        );
    }

    #[test]
    fn test_errors_returned_unchanged() {
        let api = ScriptedApi::replying(vec![Err(PromptApiError::Service {
            status: 404,
            code: Some("ResourceNotFoundException".to_string()),
            message: "boom".to_string(),
        })]);

        let err = tokio_test::block_on(client(&api).get("missing", None)).unwrap_err();
        assert!(matches!(err, PromptApiError::Service { status: 404, .. }));
        assert_eq!(err.to_string(), "boom");
    }
}
