//! Session and message management.
//!
//! This module provides in-memory session storage for the chat UI. Sessions
//! are identified by a time-ordered [`SessionId`] and hold the full message
//! history; exactly one session is active at any time.
//!
//! # Architecture
//!
//! - [`Message`]: One turn, text or a fact-check verdict
//! - [`Session`]: A titled conversation thread
//! - [`SessionStore`]: Thread-safe owner of every session
//!
//! # Example
//!
//! ```rust
//! use factcheck_chat::session::{Message, SessionStore};
//!
//! let store = SessionStore::new();
//! let id = store.active_id();
//! store.append_message(id, Message::user("Hello!"));
//!
//! let messages = store.active_messages();
//! assert_eq!(messages.len(), 1);
//! ```

mod message;
mod store;

pub use message::{Message, MessageContent, Role};
pub use store::{
    DEFAULT_TITLE, FALLBACK_TITLE, Session, SessionId, SessionStore, SessionSummary,
};
