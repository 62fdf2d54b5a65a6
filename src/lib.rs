//! Fact-Check Chat
//!
//! A browser-based chat interface for submitting claims to a fact-checking
//! backend and rendering structured verification results.
//!
//! # Architecture
//!
//! - **Server**: Axum-based HTTP server rendering HTML pages and a small JSON API
//! - **Chat Controller**: Submission state machine, one backend call per turn
//! - **Session Store**: In-memory sessions with a single active session
//! - **Rendering**: Verdict views, evidence cards and a printable report
//!
//! # Modules
//!
//! - [`chat`]: Claim submission and pending-state tracking
//! - [`config`]: CLI, file and environment configuration
//! - [`export`]: Printable report generation
//! - [`factcheck`]: Backend types and HTTP client
//! - [`render`]: HTML rendering
//! - [`server`]: Router and handlers
//! - [`session`]: Session and message management

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod chat;
pub mod config;
pub mod export;
pub mod factcheck;
pub mod render;
pub mod server;
pub mod session;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chat::ChatController;
use factcheck::FactChecker;
use session::SessionStore;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Session store for conversation management.
    pub sessions: SessionStore,
    /// Chat controller driving claim submission.
    pub chat: ChatController,
    /// UI theme preference.
    pub dark_mode: Arc<AtomicBool>,
}

impl AppState {
    /// Build state around a fact checker with one empty session.
    #[must_use]
    pub fn new(checker: Arc<dyn FactChecker>) -> Self {
        let sessions = SessionStore::new();
        let chat = ChatController::new(sessions.clone(), checker);
        Self {
            sessions,
            chat,
            dark_mode: Arc::default(),
        }
    }

    /// Flip the theme and return the new value.
    pub fn toggle_dark_mode(&self) -> bool {
        !self.dark_mode.fetch_xor(true, Ordering::Relaxed)
    }

    #[must_use]
    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode.load(Ordering::Relaxed)
    }
}
