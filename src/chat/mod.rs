//! Chat controller: turns submitted claims into session messages.
//!
//! Each submission runs through `Idle -> Pending -> {Success, Failure} ->
//! Idle`. The user message is appended before the backend is called, so it
//! always precedes its answer. Submissions are serialized per session: a
//! second claim for a session that is still waiting is rejected as
//! [`SubmitOutcome::Busy`], while other sessions remain usable.

mod controller;

pub use controller::{ChatController, FETCH_ERROR_MESSAGE, SubmissionState, SubmitOutcome};
