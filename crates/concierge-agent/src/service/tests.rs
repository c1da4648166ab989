use std::sync::Arc;

use concierge_ai::Role;
use concierge_common::SessionId;

use super::*;
use crate::testing::{classifier_reply, FixedIndex, FixedSearch, ScriptedClient};

fn service(classifier: ScriptedClient, handler: ScriptedClient) -> ConciergeService {
    let toolbox = Toolbox::new(Arc::new(FixedIndex(vec![])), Arc::new(FixedSearch(vec![])));
    ConciergeService::new(Orchestrator::new(
        Classifier::new(Arc::new(classifier)),
        HandlerRegistry::new(Arc::new(handler), toolbox),
        "groq",
    ))
}

#[tokio::test]
async fn same_session_id_shares_history() {
    let service = service(
        classifier_reply("DIRECT").reply(r#"{"category": "DIRECT"}"#),
        ScriptedClient::new()
            .reply("Nice to meet you, Ana.")
            .reply("Your name is Ana."),
    );
    let id = SessionId::from("ana");

    service.send_message(&id, "Hi, I'm Ana").await;
    let second = service.send_message(&id, "What is my name?").await;
    assert!(second.success);
    assert!(second.response.contains("Ana"));

    let history = service.history(&id).await.unwrap();
    assert_eq!(history.count, 4);
    assert_eq!(history.messages[0].role, Role::User);
    assert_eq!(history.messages[0].content, "Hi, I'm Ana");
    assert!(history.messages.iter().all(|m| m.category == Category::Direct));
    assert_eq!(history.usage.total_tokens(), 60);
    assert_eq!(history.llm_calls, 4);
}

#[tokio::test]
async fn rejected_input_creates_no_session() {
    let service = service(ScriptedClient::new(), ScriptedClient::new());
    let id = SessionId::from("empty");

    let result = service.send_message(&id, "   ").await;
    assert!(!result.success);
    assert!(service.history(&id).await.is_none());
    assert!(service.sessions().await.is_empty());
}

#[tokio::test]
async fn clear_resets_known_sessions_only() {
    let service = service(
        classifier_reply("DIRECT"),
        ScriptedClient::new().reply("A complete answer here."),
    );
    let id = SessionId::from("to-clear");

    assert!(!service.clear(&id).await);
    service.send_message(&id, "hello").await;
    assert!(service.clear(&id).await);

    let history = service.history(&id).await.unwrap();
    assert_eq!(history.count, 0);
    assert_eq!(history.llm_calls, 0);
    assert_eq!(history.session_id, id);
    assert_eq!(service.sessions().await, vec![id]);
}

#[tokio::test]
async fn distinct_sessions_do_not_share_turns() {
    let service = service(
        classifier_reply("DIRECT").reply(r#"{"category": "DIRECT"}"#),
        ScriptedClient::new()
            .reply("First session answer.")
            .reply("Second session answer."),
    );
    let a = SessionId::from("a");
    let b = SessionId::from("b");

    service.send_message(&a, "question one").await;
    service.send_message(&b, "question two").await;

    assert_eq!(service.history(&a).await.unwrap().count, 2);
    let b_history = service.history(&b).await.unwrap();
    assert_eq!(b_history.count, 2);
    assert_eq!(b_history.messages[0].content, "question two");
}

#[tokio::test]
async fn explain_reports_category() {
    let service = service(classifier_reply("TEMPORAL"), ScriptedClient::new());
    let explanation = service.explain("What time is it in Tokyo?").await;
    assert_eq!(explanation.category, Category::Temporal);
    assert_eq!(service.provider(), "groq");
    assert_eq!(service.model(), "scripted-model");
}

#[test]
fn undecodable_document_does_not_block_startup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("good.md"), "LLMs are large language models.").unwrap();
    std::fs::write(dir.path().join("bad.txt"), [0xff, 0xfe, 0x41]).unwrap();

    assert!(load_retrieval(dir.path()).is_ok());
    assert!(load_retrieval(&dir.path().join("missing")).is_ok());
}
