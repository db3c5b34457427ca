//! Result types crossing the engine/caller boundary.

use serde::{Deserialize, Serialize};

/// State of the remote job as reported by a well-formed status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Completed,
    /// The job itself finished with an error (`{"result": "error"}`).
    #[serde(rename = "error")]
    Errored,
    Pending,
}

/// Outcome kind of one polling operation.
///
/// `Completed`, `Errored`, and `ClientError` are terminal: the engine stops
/// polling and produces no further results for that operation. `Pending`
/// means the loop continues, or (for the async entry point) that background
/// polling has been scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollKind {
    /// The monitored job finished successfully.
    Completed,
    /// The monitored job finished with an error.
    Errored,
    /// The job is still running (or the engine gave up after max retries).
    Pending,
    /// Definitive client-side failure (non-2xx status, bad URL, ...).
    ClientError,
}

impl PollKind {
    /// True for kinds after which no further polling occurs.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollKind::Pending)
    }
}

/// The only value the engine hands to callers, both as the blocking return
/// value and as the async callback argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResult {
    pub kind: PollKind,
    /// Human-readable detail; present when `kind` is `ClientError`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PollResult {
    pub fn completed() -> Self {
        Self { kind: PollKind::Completed, message: None }
    }

    pub fn errored() -> Self {
        Self { kind: PollKind::Errored, message: None }
    }

    pub fn pending() -> Self {
        Self { kind: PollKind::Pending, message: None }
    }

    pub fn client_error(message: impl Into<String>) -> Self {
        Self {
            kind: PollKind::ClientError,
            message: Some(message.into()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }
}

impl From<JobState> for PollResult {
    fn from(state: JobState) -> Self {
        match state {
            JobState::Completed => PollResult::completed(),
            JobState::Errored => PollResult::errored(),
            JobState::Pending => PollResult::pending(),
        }
    }
}
