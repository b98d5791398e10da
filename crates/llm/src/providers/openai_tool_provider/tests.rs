//! Unit tests for the chat-completions tool provider.

use serde_json::json;

use toolgate_core::{ChatBackend, LlmConfig};
use toolgate_tool_runtime::conversation::{AssistantContent, ConversationMessage};
use toolgate_tool_runtime::provider::ToolAwareLlmProvider;
use toolgate_tool_runtime::stream::{StopReason, StreamEvent};
use toolgate_tool_runtime::{OperationId, ToolCall, ToolDefinition, ToolResult};

use super::client::OpenAiToolProvider;
use super::translate::{message_to_openai, response_to_events, tool_definition_to_openai};

fn config(backend: ChatBackend) -> LlmConfig {
    LlmConfig {
        backend,
        api_key: "test-key".to_string(),
        base_url: "https://lab.openai.azure.com".to_string(),
        deployment: "gpt-4o".to_string(),
        api_version: "2024-10-21".to_string(),
    }
}

fn deploy_definition() -> ToolDefinition {
    ToolDefinition::without_parameters(
        OperationId::new("DevopsPlugin", "DeployToStage"),
        "Deploy the site to the staging environment.",
    )
}

#[test]
fn test_tool_definition_translation() {
    let value = tool_definition_to_openai(&deploy_definition());

    assert_eq!(value["type"], "function");
    assert_eq!(value["function"]["name"], "DevopsPlugin-DeployToStage");
    assert_eq!(value["function"]["parameters"]["type"], "object");
}

#[test]
fn test_user_message_translation() {
    let value = message_to_openai(&ConversationMessage::User("Deploy to stage".to_string()));
    assert_eq!(value["role"], "user");
    assert_eq!(value["content"], "Deploy to stage");
}

#[test]
fn test_assistant_tool_call_translation() {
    let msg = ConversationMessage::Assistant(AssistantContent {
        text: None,
        tool_calls: vec![ToolCall {
            id: "call_abc".to_string(),
            name: "DevopsPlugin-CreateNewBranch".to_string(),
            input: json!({"branchName": "feature", "baseBranch": "main"}),
        }],
    });
    let value = message_to_openai(&msg);

    assert_eq!(value["role"], "assistant");
    assert!(value["content"].is_null());
    let call = &value["tool_calls"][0];
    assert_eq!(call["id"], "call_abc");
    assert_eq!(call["type"], "function");
    assert_eq!(call["function"]["name"], "DevopsPlugin-CreateNewBranch");
    let args: serde_json::Value =
        serde_json::from_str(call["function"]["arguments"].as_str().unwrap()).unwrap();
    assert_eq!(args["baseBranch"], "main");
}

#[test]
fn test_assistant_text_has_no_tool_calls_field() {
    let msg = ConversationMessage::Assistant(AssistantContent {
        text: Some("Done.".to_string()),
        tool_calls: vec![],
    });
    let value = message_to_openai(&msg);
    assert_eq!(value["content"], "Done.");
    assert!(value.get("tool_calls").is_none());
}

#[test]
fn test_tool_result_translation() {
    let msg = ConversationMessage::ToolResult(ToolResult {
        tool_call_id: "call_abc".to_string(),
        content: "The operation was not approved by the user".to_string(),
        is_error: false,
    });
    let value = message_to_openai(&msg);
    assert_eq!(value["role"], "tool");
    assert_eq!(value["tool_call_id"], "call_abc");
    assert_eq!(value["content"], "The operation was not approved by the user");
}

#[test]
fn test_text_response_events() {
    let response = json!({
        "choices": [{
            "message": { "role": "assistant", "content": "How may I help you?" },
            "finish_reason": "stop"
        }]
    });
    let events = response_to_events(&response).unwrap();

    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], StreamEvent::TextDelta { text } if text == "How may I help you?"));
    assert!(matches!(
        &events[1],
        StreamEvent::MessageEnd { stop_reason: StopReason::EndTurn }
    ));
}

#[test]
fn test_tool_call_response_events() {
    let response = json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": "DevopsPlugin-DeployToProd", "arguments": "{}" }
                }]
            },
            "finish_reason": "tool_calls"
        }]
    });
    let events = response_to_events(&response).unwrap();

    assert_eq!(events.len(), 4);
    assert!(matches!(
        &events[0],
        StreamEvent::ToolCallStart { id, name } if id == "call_1" && name == "DevopsPlugin-DeployToProd"
    ));
    assert!(matches!(&events[1], StreamEvent::ToolCallDelta { arguments_delta, .. } if arguments_delta == "{}"));
    assert!(matches!(&events[2], StreamEvent::ToolCallEnd { id } if id == "call_1"));
    assert!(matches!(
        &events[3],
        StreamEvent::MessageEnd { stop_reason: StopReason::ToolUse }
    ));
}

#[test]
fn test_missing_choices_is_invalid() {
    let err = response_to_events(&json!({"error": "boom"})).unwrap_err();
    assert!(err.to_string().contains("missing choices"));
}

#[test]
fn test_azure_endpoint_and_body() {
    let provider = OpenAiToolProvider::new(config(ChatBackend::Azure));
    assert_eq!(
        provider.endpoint_url(),
        "https://lab.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-10-21"
    );

    let body = provider.request_body(
        &[ConversationMessage::User("hi".to_string())],
        Some("You are a devops assistant."),
        &[deploy_definition()],
        0.0,
        512,
    );
    assert!(body.get("model").is_none());
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "hi");
    assert_eq!(body["tools"][0]["function"]["name"], "DevopsPlugin-DeployToStage");
    assert_eq!(body["tool_choice"], "auto");
    assert_eq!(provider.provider_name(), "azure");
}

#[test]
fn test_openai_endpoint_and_body() {
    let mut cfg = config(ChatBackend::OpenAi);
    cfg.base_url = "https://api.openai.com".to_string();
    let provider = OpenAiToolProvider::new(cfg);
    assert_eq!(provider.endpoint_url(), "https://api.openai.com/v1/chat/completions");

    let body = provider.request_body(&[], None, &[], 0.2, 256);
    assert_eq!(body["model"], "gpt-4o");
    assert!(body.get("tools").is_none());
    assert_eq!(body["messages"].as_array().unwrap().len(), 0);
}
