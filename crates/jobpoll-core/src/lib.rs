//! jobpoll-core: polling client for a long-running remote job's status.
//!
//! Callers ask "is my job done yet?" and get back a [`PollResult`]
//! (completed, errored, still pending, or a definitive client error),
//! either by blocking ([`PollClient::wait_for_completion`]) or via a
//! callback invoked exactly once later
//! ([`PollClient::check_status_async`]). All polling policy (intervals,
//! backoff, retry limits, error classification) lives inside the library.

pub mod config;
pub mod logging;

pub mod engine;
pub mod fetch;
pub mod result;

pub use config::ClientConfig;
pub use engine::{PollClient, PollPolicy};
pub use fetch::{FetchOutcome, HttpStatusFetcher, StatusFetch};
pub use result::{JobState, PollKind, PollResult};
