//! Submission state machine.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::factcheck::FactChecker;
use crate::session::{Message, SessionId, SessionStore};

/// Bot reply appended when the backend call fails for any reason.
pub const FETCH_ERROR_MESSAGE: &str = "❌ Error fetching result.";

/// Where a session is in its submission cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    Idle,
    Pending,
    Success,
    Failure,
}

/// Result of a single submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Input was blank; nothing happened.
    Empty,
    /// The user message is recorded and the backend call is running.
    Started { session_id: SessionId },
    /// The session already has a request outstanding.
    Busy { session_id: SessionId },
    /// The target session does not exist.
    NotFound { session_id: SessionId },
    /// The cycle finished; `messages` holds the user message and the reply.
    Completed {
        session_id: SessionId,
        state: SubmissionState,
        messages: Vec<Message>,
    },
    /// The session was deleted while the request was outstanding.
    Dropped { session_id: SessionId },
}

type PendingSet = Arc<Mutex<HashSet<SessionId>>>;

/// Clears the pending flag when the request finishes or is abandoned.
struct PendingGuard {
    pending: PendingSet,
    id: SessionId,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

/// Orchestrates claim submission for every session.
#[derive(Debug, Clone)]
pub struct ChatController {
    sessions: SessionStore,
    checker: Arc<dyn FactChecker>,
    pending: PendingSet,
}

impl ChatController {
    /// Create a controller writing into `sessions` and verifying with `checker`.
    #[must_use]
    pub fn new(sessions: SessionStore, checker: Arc<dyn FactChecker>) -> Self {
        Self {
            sessions,
            checker,
            pending: Arc::default(),
        }
    }

    /// Current state of a session: `Pending` while a request is outstanding,
    /// `Idle` otherwise.
    #[must_use]
    pub fn state(&self, id: SessionId) -> SubmissionState {
        if self.is_pending(id) {
            SubmissionState::Pending
        } else {
            SubmissionState::Idle
        }
    }

    /// Whether a request for `id` is outstanding.
    #[must_use]
    pub fn is_pending(&self, id: SessionId) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    /// Submit a claim to the active session and wait for the reply.
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let id = self.sessions.active_id();
        self.submit_to(id, input).await
    }

    /// Submit a claim to a specific session and wait for the reply.
    ///
    /// The backend call runs on its own task, so the reply is still recorded
    /// if the caller goes away mid-request.
    pub async fn submit_to(&self, id: SessionId, input: &str) -> SubmitOutcome {
        let task = match self.launch(id, input) {
            Ok(task) => task,
            Err(outcome) => return outcome,
        };

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(session_id = %id, error = %e, "Fact-check task failed");
                SubmitOutcome::Dropped { session_id: id }
            }
        }
    }

    /// Submit a claim to the active session without waiting for the reply.
    ///
    /// Returns `Started` once the user message is recorded and the session is
    /// pending; the reply is appended by the background task.
    pub fn start(&self, input: &str) -> SubmitOutcome {
        let id = self.sessions.active_id();
        match self.launch(id, input) {
            Ok(_) => SubmitOutcome::Started { session_id: id },
            Err(outcome) => outcome,
        }
    }

    /// Validate, mark pending, record the user message and spawn the
    /// backend call.
    fn launch(
        &self,
        id: SessionId,
        input: &str,
    ) -> Result<JoinHandle<SubmitOutcome>, SubmitOutcome> {
        if input.trim().is_empty() {
            return Err(SubmitOutcome::Empty);
        }
        if !self.sessions.contains(id) {
            return Err(SubmitOutcome::NotFound { session_id: id });
        }

        let Some(guard) = self.begin(id) else {
            tracing::debug!(session_id = %id, "Submission rejected, request pending");
            return Err(SubmitOutcome::Busy { session_id: id });
        };

        let user_message = Message::user(input);
        if !self.sessions.append_message(id, user_message.clone()) {
            return Err(SubmitOutcome::NotFound { session_id: id });
        }

        let controller = self.clone();
        let claim = input.to_string();
        Ok(tokio::spawn(async move {
            let _guard = guard;
            controller.resolve(id, claim, user_message).await
        }))
    }

    fn begin(&self, id: SessionId) -> Option<PendingGuard> {
        let inserted = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id);

        inserted.then(|| PendingGuard {
            pending: Arc::clone(&self.pending),
            id,
        })
    }

    async fn resolve(&self, id: SessionId, claim: String, user_message: Message) -> SubmitOutcome {
        let (state, reply) = match self.checker.check(&claim).await {
            Ok(result) => (SubmissionState::Success, Message::bot_result(result)),
            Err(e) => {
                tracing::warn!(
                    name: "factcheck.failed",
                    session_id = %id,
                    error = %e,
                    "Fact-check request failed"
                );
                (SubmissionState::Failure, Message::bot_text(FETCH_ERROR_MESSAGE))
            }
        };

        if !self.sessions.append_message(id, reply.clone()) {
            tracing::info!(session_id = %id, "Session deleted while pending, reply dropped");
            return SubmitOutcome::Dropped { session_id: id };
        }

        SubmitOutcome::Completed {
            session_id: id,
            state,
            messages: vec![user_message, reply],
        }
    }
}
