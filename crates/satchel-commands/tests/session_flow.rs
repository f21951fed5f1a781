//! Commands mutate the request's document; the pipeline then surfaces it.

use std::sync::Arc;

use assert_matches::assert_matches;
use satchel_commands::{CommandError, create_default_registry};
use satchel_core::{Message, MessageBatch, MessageContent, RequestContext, SessionError};
use satchel_hooks::{Clock, PipelineEngine, SessionHook, StageName, TransformRegistry};
use satchel_settings::HookSettings;
use serde_json::json;

#[derive(Debug)]
struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> String {
        "2024-01-01T00:00:00+00:00".to_string()
    }
}

fn engine() -> PipelineEngine {
    let mut registry = TransformRegistry::new();
    registry.register(Arc::new(
        SessionHook::new(&HookSettings::default()).with_clock(Arc::new(FixedClock)),
    ));
    PipelineEngine::new(registry)
}

fn first_text(batch: &MessageBatch) -> &str {
    match &batch.messages[0].content {
        MessageContent::Text(text) => text,
        other => panic!("expected text content, got {other:?}"),
    }
}

#[tokio::test]
async fn commands_then_injection() {
    let commands = create_default_registry();
    let mut ctx = RequestContext::new();

    let _ = commands
        .dispatch("session_data_update", json!({"updates": {"user": {"name": "ada"}}}), &mut ctx)
        .await
        .unwrap();
    let _ = commands
        .dispatch("session_data_list_add", json!({"path": ["user", "todo"], "value": "a"}), &mut ctx)
        .await
        .unwrap();
    let _ = commands
        .dispatch("session_data_list_add", json!({"path": ["user", "todo"], "value": "b"}), &mut ctx)
        .await
        .unwrap();
    let doc = commands
        .dispatch("session_data_list_del", json!({"path": ["user", "todo"], "index": 0}), &mut ctx)
        .await
        .unwrap();
    assert_eq!(doc.to_json(), json!({"user": {"name": "ada", "todo": ["b"]}}));

    let out = engine().run(
        &StageName::filter_messages(),
        MessageBatch::new(vec![Message::user("what next?")]),
        Some(&mut ctx),
    );
    assert_eq!(
        first_text(&out),
        "\n\n## Session Data\n\n{\"user\":{\"name\":\"ada\",\"todo\":[\"b\"]}}\n\n___\n\nwhat next?"
    );
}

#[tokio::test]
async fn seeded_document_is_visible_to_later_commands() {
    let commands = create_default_registry();
    let mut ctx = RequestContext::new();

    let out = engine().run(
        &StageName::filter_messages(),
        MessageBatch::new(vec![Message::user("hi")]),
        Some(&mut ctx),
    );
    assert!(first_text(&out).contains("server_time"));

    let doc = commands
        .dispatch("session_data_update", json!({"updates": {"mood": "curious"}}), &mut ctx)
        .await
        .unwrap();
    assert_eq!(
        doc.to_json(),
        json!({"server_time": "2024-01-01T00:00:00+00:00", "mood": "curious"})
    );

    let doc = commands
        .dispatch("session_data_del", json!({"path": ["server_time"]}), &mut ctx)
        .await
        .unwrap();
    assert_eq!(doc.to_json(), json!({"mood": "curious"}));
}

#[tokio::test]
async fn failures_leave_context_and_pipeline_intact() {
    let commands = create_default_registry();
    let mut ctx = RequestContext::new();
    let _ = commands
        .dispatch("session_data_update", json!({"updates": {"items": 1}}), &mut ctx)
        .await
        .unwrap();

    let err = commands
        .dispatch("session_data_list_add", json!({"path": ["items"], "value": 2}), &mut ctx)
        .await
        .unwrap_err();
    assert_matches!(err, CommandError::Session(SessionError::NotAList { .. }));
    assert_eq!(ctx.session().unwrap().to_json(), json!({"items": 1}));

    let out = engine().run(
        &StageName::filter_messages(),
        MessageBatch::new(vec![Message::user("x")]),
        Some(&mut ctx),
    );
    assert!(first_text(&out).starts_with("\n\n## Session Data\n\n{\"items\":1}"));
}

#[tokio::test]
async fn no_carrier_is_an_error_for_commands_but_not_for_the_hook() {
    let commands = create_default_registry();
    let mut ctx = RequestContext::without_carrier();

    let err = commands
        .dispatch("session_data_update", json!({"updates": {"a": 1}}), &mut ctx)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "context_unavailable");

    let input = MessageBatch::new(vec![Message::user("untouched")]);
    let out = engine().run(&StageName::filter_messages(), input.clone(), Some(&mut ctx));
    assert_eq!(out, input);
}
