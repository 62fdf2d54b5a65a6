use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::chat::SubmitOutcome;
use crate::config::AppConfig;
use crate::export::render_report;
use crate::factcheck::HttpFactChecker;
use crate::render::ChatPage;
use crate::session::{Message, SessionId, SessionSummary};

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let base_url = config.backend.url()?;
    let checker = HttpFactChecker::new(&base_url, config.backend.timeout())?;

    info!(
        name: "backend.config.loaded",
        endpoint = %checker.endpoint(),
        timeout_secs = config.backend.timeout_secs,
        "Fact-check backend configured"
    );

    let state = AppState::new(Arc::new(checker));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // HTML pages and form actions
        .route("/", get(index_handler))
        .route("/chat", post(chat_form_handler))
        .route("/sessions", post(create_session_handler))
        .route("/sessions/{id}/activate", post(activate_session_handler))
        .route("/sessions/{id}/rename", post(rename_session_handler))
        .route("/sessions/{id}/delete", post(delete_session_handler))
        .route("/sessions/{id}/export", get(export_handler))
        .route("/preferences/theme", post(toggle_theme_handler))
        // JSON API
        .route("/api/chat", post(api_chat))
        .route("/api/sessions", get(api_list_sessions))
        .route("/api/sessions/{id}/messages", get(api_get_messages))
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Chat page for the active session.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let sessions = state.sessions.summaries();
    let active = state.sessions.active();
    let page = ChatPage {
        sessions: &sessions,
        active: &active,
        pending: state.chat.is_pending(active.id),
        dark_mode: state.is_dark_mode(),
    };
    Html(page.render())
}

/// Form body for claim submission.
#[derive(Debug, Deserialize)]
struct ChatForm {
    #[serde(default)]
    message: String,
}

/// POST /chat - Submit a claim to the active session.
///
/// Redirects as soon as the claim is recorded; the page refreshes itself
/// while the reply is outstanding.
async fn chat_form_handler(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Redirect {
    let outcome = state.chat.start(&form.message);
    log_outcome(&outcome);
    Redirect::to("/")
}

/// POST /sessions - Start a new chat.
async fn create_session_handler(State(state): State<AppState>) -> Redirect {
    state.sessions.create_session();
    Redirect::to("/")
}

/// POST /sessions/:id/activate - Switch the active session.
async fn activate_session_handler(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Redirect {
    state.sessions.set_active(id);
    Redirect::to("/")
}

/// Form body for renaming.
#[derive(Debug, Deserialize)]
struct RenameForm {
    #[serde(default)]
    title: String,
}

/// POST /sessions/:id/rename - Rename a session.
async fn rename_session_handler(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Form(form): Form<RenameForm>,
) -> Redirect {
    state.sessions.rename_session(id, &form.title);
    Redirect::to("/")
}

/// POST /sessions/:id/delete - Delete a session.
async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Redirect {
    state.sessions.delete_session(id);
    Redirect::to("/")
}

/// GET /sessions/:id/export - Printable report.
async fn export_handler(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Html<String>, StatusCode> {
    let session = state.sessions.get(id).ok_or(StatusCode::NOT_FOUND)?;
    let doc = render_report(&session.title, &session.messages, &chrono::Local::now());

    info!(
        name: "session.exported",
        session_id = %id,
        message_count = session.messages.len(),
        "Report exported"
    );

    Ok(Html(doc.html))
}

/// POST /preferences/theme - Toggle dark mode.
async fn toggle_theme_handler(State(state): State<AppState>) -> Redirect {
    let dark = state.toggle_dark_mode();
    tracing::debug!(dark_mode = dark, "Theme toggled");
    Redirect::to("/")
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for chat API.
#[derive(Debug, Deserialize)]
struct ChatRequest {
    /// Claim text.
    message: String,
    /// Target session (defaults to the active one).
    #[serde(default)]
    session_id: Option<SessionId>,
}

/// POST /api/chat - Submit a claim and return the outcome.
async fn api_chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    tracing::info!(
        message_length = req.message.len(),
        session_id = ?req.session_id,
        "Received chat request"
    );

    let outcome = match req.session_id {
        Some(id) => state.chat.submit_to(id, &req.message).await,
        None => state.chat.submit(&req.message).await,
    };
    log_outcome(&outcome);

    let status = match &outcome {
        SubmitOutcome::Completed { .. } => StatusCode::OK,
        SubmitOutcome::Started { .. } => StatusCode::ACCEPTED,
        SubmitOutcome::Empty => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitOutcome::Busy { .. } => StatusCode::CONFLICT,
        SubmitOutcome::NotFound { .. } => StatusCode::NOT_FOUND,
        SubmitOutcome::Dropped { .. } => StatusCode::GONE,
    };

    (status, Json(outcome)).into_response()
}

/// Session listing.
#[derive(Debug, Serialize)]
struct SessionList {
    active: SessionId,
    sessions: Vec<SessionSummary>,
}

/// GET /api/sessions - List all sessions.
async fn api_list_sessions(State(state): State<AppState>) -> Json<SessionList> {
    Json(SessionList {
        active: state.sessions.active_id(),
        sessions: state.sessions.summaries(),
    })
}

/// GET /api/sessions/:id/messages - Get session messages.
async fn api_get_messages(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<Vec<Message>>, StatusCode> {
    state
        .sessions
        .get(id)
        .map(|session| Json(session.messages))
        .ok_or(StatusCode::NOT_FOUND)
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn log_outcome(outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Completed {
            session_id, state, ..
        } => {
            info!(
                name: "chat.completed",
                session_id = %session_id,
                state = ?state,
                "Submission completed"
            );
        }
        SubmitOutcome::Started { session_id } => {
            info!(name: "chat.started", session_id = %session_id, "Submission started");
        }
        SubmitOutcome::Empty => tracing::debug!("Ignored empty submission"),
        other => tracing::info!(outcome = ?other, "Submission not completed"),
    }
}
