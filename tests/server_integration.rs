use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::Notify;

use factcheck_chat::AppState;
use factcheck_chat::chat::FETCH_ERROR_MESSAGE;
use factcheck_chat::factcheck::{
    Confidence, Evidence, FactCheckError, FactCheckResult, FactChecker,
};
use factcheck_chat::server::build_router;
use factcheck_chat::session::{Message, MessageContent, Role};

/// Answers every claim with a fixed verdict; claims containing "offline"
/// fail with a server error.
#[derive(Debug)]
struct StubChecker;

#[async_trait]
impl FactChecker for StubChecker {
    async fn check(&self, claim: &str) -> Result<FactCheckResult, FactCheckError> {
        if claim.contains("offline") {
            return Err(FactCheckError::Status { status: 503 });
        }
        Ok(FactCheckResult {
            claim: claim.to_string(),
            accuracy_score: 5.0,
            confidence: Confidence::High,
            summary: "The sky appears blue due to Rayleigh scattering.".to_string(),
            detailed_analysis: None,
            supporting_evidence: Vec::new(),
            contradicting_evidence: vec![Evidence {
                title: "Why is the sky blue?".to_string(),
                snippet: "Shorter wavelengths scatter more strongly.".to_string(),
                source: "NASA".to_string(),
                url: "https://science.nasa.gov/sky".to_string(),
                relevance_score: 0.9,
                sentiment: "negative".to_string(),
            }],
            neutral_evidence: Vec::new(),
        })
    }
}

/// Holds every call until the gate is opened.
#[derive(Debug)]
struct GatedChecker {
    gate: Arc<Notify>,
}

#[async_trait]
impl FactChecker for GatedChecker {
    async fn check(&self, claim: &str) -> Result<FactCheckResult, FactCheckError> {
        self.gate.notified().await;
        StubChecker.check(claim).await
    }
}

#[derive(Serialize)]
struct ChatForm<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct RenameForm<'a> {
    title: &'a str,
}

fn test_server() -> TestServer {
    server_with(Arc::new(StubChecker))
}

fn server_with(checker: Arc<dyn FactChecker>) -> TestServer {
    let state = AppState::new(checker);
    TestServer::new(build_router(state)).expect("Failed to build test server")
}

async fn sessions(server: &TestServer) -> Value {
    server.get("/api/sessions").await.json::<Value>()
}

async fn active_id(server: &TestServer) -> u64 {
    sessions(server).await["active"]
        .as_u64()
        .expect("active id")
}

async fn messages(server: &TestServer, id: u64) -> Vec<Message> {
    server
        .get(&format!("/api/sessions/{id}/messages"))
        .await
        .json::<Vec<Message>>()
}

/// Form submissions reply in the background; poll until `count` messages exist.
async fn wait_for_messages(server: &TestServer, id: u64, count: usize) -> Vec<Message> {
    for _ in 0..200 {
        let history = messages(server, id).await;
        if history.len() >= count {
            return history;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session {id} never reached {count} messages");
}

#[tokio::test]
async fn test_health() {
    let server = test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn test_index_shows_empty_chat() {
    let server = test_server();
    let response = server.get("/").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("Ready to Fact-Check"));
    assert!(html.contains("New Chat"));
    assert!(html.contains(r#"action="/chat""#));
}

#[tokio::test]
async fn test_form_submission_redirects_and_renders_verdict() {
    let server = test_server();

    let response = server
        .post("/chat")
        .form(&ChatForm {
            message: "The sky is green",
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");

    let id = active_id(&server).await;
    wait_for_messages(&server, id, 2).await;

    let html = server.get("/").await.text();
    assert!(html.contains("The sky is green"));
    assert!(html.contains("5.0%"));
    assert!(html.contains("tier-poor"));
    assert!(html.contains("🔥"));
    assert!(html.contains("Rayleigh scattering"));
    assert!(html.contains("Why is the sky blue?"));
    assert!(html.contains("0.90"));
    assert!(html.contains("No evidence found"));
    assert!(!html.contains("Ready to Fact-Check"));
}

#[tokio::test]
async fn test_blank_form_submission_is_ignored() {
    let server = test_server();
    let id = active_id(&server).await;

    let response = server.post("/chat").form(&ChatForm { message: "   " }).await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    assert!(messages(&server, id).await.is_empty());
}

#[tokio::test]
async fn test_backend_failure_appends_error_text() {
    let server = test_server();
    let id = active_id(&server).await;

    server
        .post("/chat")
        .form(&ChatForm {
            message: "backend offline",
        })
        .await;

    let history = wait_for_messages(&server, id, 2).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].role, Role::Bot);
    assert_eq!(
        history[1].content,
        MessageContent::Text(FETCH_ERROR_MESSAGE.to_string())
    );

    assert!(server.get("/").await.text().contains(FETCH_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_session_lifecycle() {
    let server = test_server();
    let first = active_id(&server).await;

    server.post("/sessions").await;
    let listing = sessions(&server).await;
    let second = listing["active"].as_u64().expect("active id");
    assert!(second > first);
    assert_eq!(listing["sessions"].as_array().map(Vec::len), Some(2));

    server
        .post(&format!("/sessions/{second}/rename"))
        .form(&RenameForm {
            title: "  Climate claims  ",
        })
        .await;
    server
        .post(&format!("/sessions/{first}/rename"))
        .form(&RenameForm { title: "   " })
        .await;

    let listing = sessions(&server).await;
    let titles: Vec<&str> = listing["sessions"]
        .as_array()
        .expect("sessions")
        .iter()
        .filter_map(|s| s["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["New Chat", "Climate claims"]);

    server.post(&format!("/sessions/{first}/activate")).await;
    assert_eq!(active_id(&server).await, first);

    server.post(&format!("/sessions/{first}/delete")).await;
    let listing = sessions(&server).await;
    assert_eq!(listing["active"].as_u64(), Some(second));
    assert_eq!(listing["sessions"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_deleting_last_session_creates_fresh_one() {
    let server = test_server();
    let only = active_id(&server).await;

    server.post(&format!("/sessions/{only}/delete")).await;

    let listing = sessions(&server).await;
    let sessions = listing["sessions"].as_array().expect("sessions");
    assert_eq!(sessions.len(), 1);
    assert_ne!(sessions[0]["id"].as_u64(), Some(only));
    assert_eq!(sessions[0]["title"], "New Chat");
}

#[tokio::test]
async fn test_export_report() {
    let server = test_server();
    let id = active_id(&server).await;

    server
        .post("/chat")
        .form(&ChatForm {
            message: "The sky is green",
        })
        .await;
    wait_for_messages(&server, id, 2).await;

    let response = server.get(&format!("/sessions/{id}/export")).await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("New Chat - Fact-Check Report"));
    assert!(html.contains("The sky is green"));
    assert!(html.contains("Rayleigh scattering"));
    assert!(html.contains("window.print()"));
    assert!(!html.contains("Why is the sky blue?"));
}

#[tokio::test]
async fn test_unknown_session_returns_not_found() {
    let server = test_server();

    server
        .get("/sessions/424242/export")
        .await
        .assert_status_not_found();
    server
        .get("/api/sessions/424242/messages")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_theme_toggle() {
    let server = test_server();
    assert!(server.get("/").await.text().contains(r#"class="light""#));

    let response = server.post("/preferences/theme").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert!(server.get("/").await.text().contains(r#"class="dark""#));

    server.post("/preferences/theme").await;
    assert!(server.get("/").await.text().contains(r#"class="light""#));
}

#[tokio::test]
async fn test_api_chat_outcomes() {
    let server = test_server();
    let id = active_id(&server).await;

    let response = server
        .post("/api/chat")
        .json(&json!({ "message": "The sky is green" }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "completed");
    assert_eq!(body["state"], "success");
    assert_eq!(body["session_id"].as_u64(), Some(id));
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(2));

    let response = server
        .post("/api/chat")
        .json(&json!({ "message": "backend offline", "session_id": id }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["state"], "failure");

    let response = server
        .post("/api/chat")
        .json(&json!({ "message": "  " }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["status"], "empty");

    let response = server
        .post("/api/chat")
        .json(&json!({ "message": "hello", "session_id": 424_242 }))
        .await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["status"], "not_found");

    assert_eq!(messages(&server, id).await.len(), 4);
}

#[tokio::test]
async fn test_form_submission_does_not_wait_for_backend() {
    let gate = Arc::new(Notify::new());
    let server = server_with(Arc::new(GatedChecker {
        gate: Arc::clone(&gate),
    }));
    let id = active_id(&server).await;

    let submit = async {
        server
            .post("/chat")
            .form(&ChatForm {
                message: "The sky is green",
            })
            .await
    };
    let response = tokio::time::timeout(Duration::from_secs(2), submit)
        .await
        .expect("POST /chat should not wait for the backend");
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    let html = server.get("/").await.text();
    assert!(html.contains("The sky is green"));
    assert!(html.contains("Verifying..."));
    assert!(html.contains(r#"http-equiv="refresh""#));
    assert_eq!(messages(&server, id).await.len(), 1);

    gate.notify_one();
    let history = wait_for_messages(&server, id, 2).await;
    assert_eq!(history[1].role, Role::Bot);

    let html = server.get("/").await.text();
    assert!(!html.contains("Verifying..."));
    assert!(html.contains("Rayleigh scattering"));
}
