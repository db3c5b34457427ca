//! Polling engine: retry loop, backoff, and single-flight async polling.
//!
//! The engine is the sole consumer of the status fetcher. It owns all
//! polling policy (when to probe, how to back off, when to give up), so
//! callers only ever see a [`PollResult`]: completed, errored, still
//! pending, or a definitive client error. No error value or panic crosses
//! the engine/caller boundary.

mod policy;
mod session;
#[cfg(test)]
mod tests;

pub use policy::PollPolicy;
pub use session::{CancelToken, PollSession};

use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::thread;

use crate::config::ClientConfig;
use crate::fetch::{FetchOutcome, HttpStatusFetcher, StatusFetch};
use crate::result::{JobState, PollResult};

/// Client for one remote job's status endpoint.
///
/// Holds at most one live background polling session at a time: a new
/// `check_status_async` call supersedes (cancels) the previous session
/// before starting its own, so only the newest callback can ever fire.
pub struct PollClient<F: StatusFetch = HttpStatusFetcher> {
    fetcher: Arc<F>,
    policy: PollPolicy,
    session: Mutex<Option<PollSession>>,
}

impl PollClient<HttpStatusFetcher> {
    /// Builds an HTTP-backed client from constructor-time configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let fetcher = HttpStatusFetcher::new(&config.base_url)?;
        Ok(Self::with_fetcher(fetcher, config.to_policy()))
    }
}

impl<F: StatusFetch + 'static> PollClient<F> {
    /// Builds a client over any fetcher; used directly by tests.
    pub fn with_fetcher(fetcher: F, policy: PollPolicy) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            policy,
            session: Mutex::new(None),
        }
    }

    /// One immediate probe, mapped to the caller-visible result shape:
    /// a transient failure reads as `Pending` (unknown, worth re-asking),
    /// a definitive one as `ClientError`.
    pub fn check_once(&self) -> PollResult {
        match self.fetcher.fetch() {
            FetchOutcome::State(state) => state.into(),
            FetchOutcome::Transient(_) => PollResult::pending(),
            FetchOutcome::Definitive(msg) => PollResult::client_error(msg),
        }
    }

    /// Blocking entry point: runs the retry loop on the calling thread
    /// until a terminal result, or until the retry budget is exhausted
    /// (which yields a soft `Pending`, never an error).
    pub fn wait_for_completion(&self) -> PollResult {
        poll_loop(self.fetcher.as_ref(), &self.policy)
    }

    /// Non-blocking entry point. Performs one immediate probe; if the job
    /// is already done (or the probe failed definitively) that result is
    /// returned at once and `callback` is never invoked. Otherwise a
    /// background thread runs the full retry loop, any previously active
    /// session is cancelled, and `Pending` is returned as the synchronous
    /// acknowledgment; `callback` fires exactly once with the terminal
    /// result unless this session is itself superseded first.
    pub fn check_status_async<C>(&self, callback: C) -> PollResult
    where
        C: FnOnce(PollResult) + Send + 'static,
    {
        match self.fetcher.fetch() {
            FetchOutcome::State(JobState::Pending) | FetchOutcome::Transient(_) => {
                self.spawn_session(callback);
                PollResult::pending()
            }
            FetchOutcome::State(state) => state.into(),
            FetchOutcome::Definitive(msg) => PollResult::client_error(msg),
        }
    }

    /// Cancels and replaces the active session under the session lock, so
    /// concurrent async polls serialize their supersession.
    fn spawn_session<C>(&self, callback: C)
    where
        C: FnOnce(PollResult) + Send + 'static,
    {
        let fetcher = Arc::clone(&self.fetcher);
        let policy = self.policy.clone();
        let token = CancelToken::new();
        let bg_token = token.clone();

        let mut slot = self.session.lock().unwrap();
        if let Some(old) = slot.take() {
            // Cooperative: the old loop finishes its current probe and
            // sleep naturally, then finds its token cancelled and
            // discards the result.
            old.cancel();
        }

        let handle = thread::spawn(move || {
            let result = poll_loop(fetcher.as_ref(), &policy);
            if bg_token.deliver(|| callback(result)).is_none() {
                tracing::debug!("superseded poll finished, result discarded");
            }
        });
        *slot = Some(PollSession { cancel: token, handle });
    }
}

/// The retry loop: probe, classify, sleep, repeat.
///
/// Pending answers sleep a flat jittered interval; transient failures
/// escalate the backoff; both draw from the same retry budget. Terminal
/// job states and definitive failures return immediately.
fn poll_loop<F: StatusFetch + ?Sized>(fetcher: &F, policy: &PollPolicy) -> PollResult {
    let mut attempts: u32 = 0;
    let mut interval = policy.initial;

    loop {
        match fetcher.fetch() {
            FetchOutcome::State(JobState::Completed) => {
                tracing::info!("job completed successfully");
                return PollResult::completed();
            }
            FetchOutcome::State(JobState::Errored) => {
                tracing::error!("job failed to complete");
                return PollResult::errored();
            }
            FetchOutcome::State(JobState::Pending) => {
                if policy.give_up(attempts) {
                    tracing::warn!(attempts, "retry budget exhausted while pending");
                    return PollResult::pending();
                }
                attempts += 1;
                tracing::info!("job still pending");
                thread::sleep(policy.pending_delay());
            }
            FetchOutcome::Transient(msg) => {
                if policy.give_up(attempts) {
                    tracing::warn!(attempts, error = %msg, "retry budget exhausted");
                    return PollResult::pending();
                }
                attempts += 1;
                interval = policy.next_backoff(interval);
                tracing::warn!(error = %msg, delay = ?interval, "transient failure, backing off");
                thread::sleep(interval);
            }
            FetchOutcome::Definitive(msg) => {
                tracing::error!(error = %msg, "definitive failure, not retrying");
                return PollResult::client_error(msg);
            }
        }
    }
}
