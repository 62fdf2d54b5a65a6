//! Session storage and active-session tracking.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Message;

/// Title given to sessions created by "new chat".
pub const DEFAULT_TITLE: &str = "New Chat";

/// Title applied when a message lands in a session that has none.
pub const FALLBACK_TITLE: &str = "Chat";

/// Time-ordered session identifier.
///
/// Derived from the creation time in milliseconds and bumped when needed so
/// every id is strictly greater than the ones issued before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    /// Raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for SessionId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A named conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn new(id: SessionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Sidebar entry for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    pub message_count: usize,
    pub active: bool,
}

/// Thread-safe store for sessions.
///
/// Cloning the store yields another handle to the same sessions. The store
/// is never empty and always has exactly one active session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<StoreState>>,
}

#[derive(Debug)]
struct StoreState {
    sessions: BTreeMap<SessionId, Session>,
    active: SessionId,
    last_issued: u64,
}

impl StoreState {
    fn next_id(&mut self) -> SessionId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let id = now.max(self.last_issued.saturating_add(1));
        self.last_issued = id;
        SessionId(id)
    }

    fn create(&mut self) -> SessionId {
        let id = self.next_id();
        self.sessions.insert(id, Session::new(id, DEFAULT_TITLE));
        self.active = id;
        id
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a store holding one empty, active session.
    #[must_use]
    pub fn new() -> Self {
        let mut state = StoreState {
            sessions: BTreeMap::new(),
            active: SessionId(0),
            last_issued: 0,
        };
        state.create();

        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create an empty session and make it active.
    pub fn create_session(&self) -> SessionId {
        let id = self.write().create();
        tracing::debug!(name: "session.created", session_id = %id, "Created session");
        id
    }

    /// Remove a session. Unknown ids are ignored.
    ///
    /// When the active session is removed, the oldest remaining session
    /// (lowest id) becomes active; if none remain a fresh one is created.
    pub fn delete_session(&self, id: SessionId) {
        let mut state = self.write();
        if state.sessions.remove(&id).is_none() {
            return;
        }

        if state.active == id {
            match state.sessions.keys().next().copied() {
                Some(next) => state.active = next,
                None => {
                    state.create();
                }
            }
        }
        let active = state.active;
        drop(state);

        tracing::debug!(
            name: "session.deleted",
            session_id = %id,
            active = %active,
            "Deleted session"
        );
    }

    /// Set the title of a session. Blank titles are ignored.
    pub fn rename_session(&self, id: SessionId, new_title: &str) {
        let title = new_title.trim();
        if title.is_empty() {
            return;
        }

        if let Some(session) = self.write().sessions.get_mut(&id) {
            session.title = title.to_string();
        }
    }

    /// Append a message to a session.
    ///
    /// Returns `false` when the session does not exist.
    pub fn append_message(&self, id: SessionId, message: Message) -> bool {
        let mut state = self.write();
        let Some(session) = state.sessions.get_mut(&id) else {
            return false;
        };

        if session.title.is_empty() {
            session.title = FALLBACK_TITLE.to_string();
        }
        session.messages.push(message);
        true
    }

    /// Switch the active session. Unknown ids are ignored.
    pub fn set_active(&self, id: SessionId) {
        let mut state = self.write();
        if state.sessions.contains_key(&id) {
            state.active = id;
        }
    }

    /// Id of the active session.
    #[must_use]
    pub fn active_id(&self) -> SessionId {
        self.read().active
    }

    /// Messages of the active session, oldest first.
    #[must_use]
    pub fn active_messages(&self) -> Vec<Message> {
        let state = self.read();
        state
            .sessions
            .get(&state.active)
            .map(|s| s.messages.clone())
            .unwrap_or_default()
    }

    /// Snapshot of a session.
    #[must_use]
    pub fn get(&self, id: SessionId) -> Option<Session> {
        self.read().sessions.get(&id).cloned()
    }

    /// Snapshot of the active session.
    #[must_use]
    pub fn active(&self) -> Session {
        let state = self.read();
        state
            .sessions
            .get(&state.active)
            .cloned()
            .unwrap_or_else(|| Session::new(state.active, DEFAULT_TITLE))
    }

    /// Whether a session exists.
    #[must_use]
    pub fn contains(&self, id: SessionId) -> bool {
        self.read().sessions.contains_key(&id)
    }

    /// All sessions, oldest first.
    #[must_use]
    pub fn summaries(&self) -> Vec<SessionSummary> {
        let state = self.read();
        state
            .sessions
            .values()
            .map(|s| SessionSummary {
                id: s.id,
                title: s.title.clone(),
                message_count: s.messages.len(),
                active: s.id == state.active,
            })
            .collect()
    }

    /// Number of sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().sessions.len()
    }

    /// Whether the store holds no sessions. Never true after construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().sessions.is_empty()
    }
}
