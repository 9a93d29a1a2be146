//! Tool behaviour against an in-memory prompt API.

mod common;

use serde_json::json;

use bedrock_prompt_management::Operation;

use common::{call_tool, handler, request, send, RecordingApi};

#[tokio::test]
async fn test_create_text_prompt() {
    let api = RecordingApi::replying(json!({ "id": "P1", "name": "Greeting", "version": "DRAFT" }));
    let handler = handler(api.clone());

    let output = call_tool(
        &handler,
        "CreatePrompt",
        json!({
            "name": "Greeting",
            "template_type": "TEXT",
            "template_text": "Hi {{user}}",
            "input_variable_names": ["user"],
            "model_id": "m1"
        }),
    )
    .await;
    assert_eq!(output["id"], "P1");

    let (operation, payload) = api.last_call();
    assert_eq!(operation, Operation::CreatePrompt);
    let variants = payload["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 1);
    let variant = &variants[0];
    assert_eq!(variant["templateType"], "TEXT");
    assert_eq!(variant["modelId"], "m1");
    assert_eq!(variant["templateConfiguration"]["text"]["text"], "Hi {{user}}");
    assert_eq!(
        variant["templateConfiguration"]["text"]["inputVariables"],
        json!([{ "name": "user" }])
    );
    assert!(variant["templateConfiguration"].get("chat").is_none());
    assert_eq!(payload["defaultVariant"], "default");
}

#[tokio::test]
async fn test_create_chat_prompt_gets_default_turns() {
    let api = RecordingApi::replying(json!({ "id": "P2" }));
    let handler = handler(api.clone());

    call_tool(
        &handler,
        "CreatePrompt",
        json!({
            "name": "Helper",
            "template_type": "CHAT",
            "system_prompt": "You are terse."
        }),
    )
    .await;

    let (_, payload) = api.last_call();
    let config = &payload["variants"][0]["templateConfiguration"];
    assert!(config.get("text").is_none());
    assert_eq!(config["chat"]["system"], json!([{ "text": "You are terse." }]));
    assert_eq!(
        config["chat"]["messages"],
        json!([
            { "role": "user", "content": [{ "text": "Hello" }] },
            { "role": "assistant", "content": [{ "text": "How can I help you today?" }] }
        ])
    );
}

#[tokio::test]
async fn test_create_chat_prompt_with_turns() {
    let api = RecordingApi::replying(json!({}));
    let handler = handler(api.clone());

    call_tool(
        &handler,
        "CreatePrompt",
        json!({
            "name": "Helper",
            "template_type": "chat",
            "chat_messages": [{ "role": "user", "content": "Summarize {{doc}}" }],
            "input_variable_names": ["doc"],
            "max_tokens": 256,
            "tags": { "team": "search" }
        }),
    )
    .await;

    let (_, payload) = api.last_call();
    let variant = &payload["variants"][0];
    let chat = &variant["templateConfiguration"]["chat"];
    assert!(chat.get("system").is_none());
    assert_eq!(chat["messages"].as_array().unwrap().len(), 1);
    assert_eq!(chat["inputVariables"], json!([{ "name": "doc" }]));
    assert_eq!(variant["inferenceConfiguration"]["text"], json!({ "maxTokens": 256 }));
    assert_eq!(payload["tags"], json!({ "team": "search" }));
}

#[tokio::test]
async fn test_create_rejects_bad_template_type() {
    let api = RecordingApi::replying(json!({}));
    let handler = handler(api.clone());

    let response = send(
        &handler,
        request(
            3,
            "tools/call",
            json!({
                "name": "CreatePrompt",
                "arguments": { "name": "x", "template_type": "AUDIO", "template_text": "t" }
            }),
        ),
    )
    .await
    .unwrap();
    assert_eq!(response["error"]["code"], -32602);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_update_sends_only_supplied_fields() {
    let api = RecordingApi::replying(json!({ "id": "P1" }));
    let handler = handler(api.clone());

    call_tool(
        &handler,
        "UpdatePrompt",
        json!({ "prompt_id": "P1", "name": "Greeting", "description": "new" }),
    )
    .await;

    let (operation, payload) = api.last_call();
    assert_eq!(operation, Operation::UpdatePrompt);
    assert_eq!(
        payload,
        json!({ "promptIdentifier": "P1", "name": "Greeting", "description": "new" })
    );
}

#[tokio::test]
async fn test_update_flat_fields_replace_variants() {
    let api = RecordingApi::replying(json!({ "id": "P1" }));
    let handler = handler(api.clone());

    call_tool(
        &handler,
        "UpdatePrompt",
        json!({
            "prompt_id": "P1",
            "name": "Greeting",
            "model_id": "m2",
            "prompt_text": "New {{x}}",
            "temperature": 0.3
        }),
    )
    .await;

    let (_, payload) = api.last_call();
    let variants = payload["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 1);
    assert_eq!(variants[0]["name"], "default");
    assert_eq!(variants[0]["modelId"], "m2");
    assert_eq!(variants[0]["templateConfiguration"]["text"]["text"], "New {{x}}");
    assert_eq!(variants[0]["inferenceConfiguration"]["text"]["temperature"], 0.3);
}

#[tokio::test]
async fn test_update_rejects_unknown_fields() {
    let api = RecordingApi::replying(json!({ "id": "P1" }));
    let handler = handler(api.clone());

    let response = send(
        &handler,
        request(
            7,
            "tools/call",
            json!({
                "name": "UpdatePrompt",
                "arguments": { "prompt_id": "P1", "name": "n", "modelId": "m2" }
            }),
        ),
    )
    .await
    .unwrap();
    assert_eq!(response["error"]["code"], -32602);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_get_and_delete_without_version() {
    let api = RecordingApi::replying(json!({ "id": "P1" }));
    let handler = handler(api.clone());

    call_tool(&handler, "GetPrompt", json!({ "prompt_id": "P1" })).await;
    let (operation, payload) = api.last_call();
    assert_eq!(operation, Operation::GetPrompt);
    assert!(payload.get("promptVersion").is_none());

    call_tool(&handler, "DeletePrompt", json!({ "prompt_id": "P1" })).await;
    let (operation, payload) = api.last_call();
    assert_eq!(operation, Operation::DeletePrompt);
    assert_eq!(payload, json!({ "promptIdentifier": "P1" }));
}

#[tokio::test]
async fn test_version_aliases() {
    let api = RecordingApi::replying(json!({}));
    let handler = handler(api.clone());

    call_tool(&handler, "GetPrompt", json!({ "prompt_id": "P1", "version_number": 3 })).await;
    assert_eq!(api.last_call().1["promptVersion"], "3");

    call_tool(&handler, "DeletePrompt", json!({ "prompt_id": "P1", "prompt_version": "2" })).await;
    assert_eq!(api.last_call().1["promptVersion"], "2");

    call_tool(&handler, "GetPrompt", json!({ "prompt_id": "P1", "version": " " })).await;
    assert!(api.last_call().1.get("promptVersion").is_none());
}

#[tokio::test]
async fn test_get_prompt_is_stable() {
    let stored = json!({
        "id": "P1",
        "name": "Greeting",
        "version": "DRAFT",
        "variants": [{ "name": "default", "templateType": "TEXT" }]
    });
    let handler = handler(RecordingApi::replying(stored.clone()));

    let first = call_tool(&handler, "GetPrompt", json!({ "prompt_id": "P1" })).await;
    let second = call_tool(&handler, "GetPrompt", json!({ "prompt_id": "P1" })).await;
    assert_eq!(first, second);
    assert_eq!(first, stored);
}

#[tokio::test]
async fn test_create_prompt_version() {
    let api = RecordingApi::replying(json!({ "id": "P1", "version": "1" }));
    let handler = handler(api.clone());

    let output = call_tool(
        &handler,
        "CreatePromptVersion",
        json!({ "prompt_id": "P1", "description": "first release" }),
    )
    .await;
    assert_eq!(output["version"], "1");

    let (operation, payload) = api.last_call();
    assert_eq!(operation, Operation::CreatePromptVersion);
    assert_eq!(
        payload,
        json!({ "promptIdentifier": "P1", "description": "first release" })
    );
}

#[tokio::test]
async fn test_list_prompts_follows_pages() {
    let api = RecordingApi::replying(json!({ "promptSummaries": [] }));
    api.push(json!({ "promptSummaries": [{ "id": "A" }, { "id": "B" }], "nextToken": "t1" }));
    api.push(json!({ "promptSummaries": [{ "id": "C" }] }));
    let handler = handler(api.clone());

    let output = call_tool(&handler, "ListPrompts", json!({})).await;
    let ids: Vec<&str> = output["promptSummaries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["A", "B", "C"]);

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].1["maxResults"], 100);
    assert_eq!(calls[1].1["nextToken"], "t1");
}

#[tokio::test]
async fn test_list_prompts_respects_max_results() {
    let api = RecordingApi::replying(json!({}));
    api.push(json!({
        "promptSummaries": [{ "id": "A" }, { "id": "B" }],
        "nextToken": "more"
    }));
    let handler = handler(api.clone());

    let output = call_tool(&handler, "ListPrompts", json!({ "max_results": 2 })).await;
    assert_eq!(output["promptSummaries"].as_array().unwrap().len(), 2);
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_every_tool_reports_provider_failure() {
    let cases = [
        ("ListPrompts", json!({})),
        ("GetPrompt", json!({ "prompt_id": "P1" })),
        (
            "CreatePrompt",
            json!({ "name": "n", "template_type": "TEXT", "template_text": "t" }),
        ),
        ("UpdatePrompt", json!({ "prompt_id": "P1", "name": "n" })),
        ("CreatePromptVersion", json!({ "prompt_id": "P1" })),
        ("DeletePrompt", json!({ "prompt_id": "P1" })),
    ];
    let handler = handler(RecordingApi::failing("boom"));

    for (tool, arguments) in cases {
        let output = call_tool(&handler, tool, arguments).await;
        assert_eq!(output, json!({ "error": "boom" }), "tool {tool}");
    }
}

#[tokio::test]
async fn test_prompts_resource() {
    let api = RecordingApi::replying(json!({
        "promptSummaries": [
            { "id": "P1", "name": "Greeting", "version": "DRAFT", "createdAt": "2024-05-01T00:00:00Z" }
        ]
    }));
    let handler = handler(api);

    let response = send(
        &handler,
        request(5, "resources/read", json!({ "uri": "resource://prompts" })),
    )
    .await
    .unwrap();
    let content = &response["result"]["contents"][0];
    assert_eq!(content["mimeType"], "application/json");
    let catalogue: serde_json::Value =
        serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
    assert_eq!(catalogue["P1"]["name"], "Greeting");
    assert_eq!(catalogue["P1"]["created_at"], "2024-05-01T00:00:00Z");
    assert_eq!(catalogue["P1"]["updated_at"], "");
    assert_eq!(catalogue["P1"]["description"], "");
}

#[tokio::test]
async fn test_prompts_resource_failure() {
    let handler = handler(RecordingApi::failing("boom"));

    let response = send(
        &handler,
        request(6, "resources/read", json!({ "uri": "resource://prompts" })),
    )
    .await
    .unwrap();
    let text = response["result"]["contents"][0]["text"].as_str().unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(text).unwrap(),
        json!({ "error": "boom" })
    );
}
