//! Engine tests against scripted fetchers (no network).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use super::{PollClient, PollPolicy};
use crate::fetch::{FetchOutcome, StatusFetch};
use crate::result::{JobState, PollKind};

/// Replays a fixed sequence of outcomes, then keeps answering `Pending`.
struct Script {
    outcomes: Mutex<VecDeque<FetchOutcome>>,
    calls: AtomicU32,
}

impl Script {
    fn new(outcomes: Vec<FetchOutcome>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicU32::new(0),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(FetchOutcome::State(JobState::Pending))
    }
}

impl StatusFetch for Arc<Script> {
    fn fetch(&self) -> FetchOutcome {
        self.as_ref().next()
    }
}

/// Answers `Pending` until opened, then `Completed`.
struct Gate {
    open: AtomicBool,
}

impl Gate {
    fn new() -> Arc<Self> {
        Arc::new(Self { open: AtomicBool::new(false) })
    }
}

impl StatusFetch for Arc<Gate> {
    fn fetch(&self) -> FetchOutcome {
        if self.open.load(Ordering::SeqCst) {
            FetchOutcome::State(JobState::Completed)
        } else {
            FetchOutcome::State(JobState::Pending)
        }
    }
}

fn fast_policy(max_retries: Option<u32>) -> PollPolicy {
    PollPolicy {
        initial: Duration::from_millis(1),
        factor: 2.0,
        max: Duration::from_millis(8),
        max_retries,
        jitter_min: Duration::ZERO,
        jitter_max: Duration::from_millis(1),
    }
}

fn pending() -> FetchOutcome {
    FetchOutcome::State(JobState::Pending)
}

#[test]
fn blocking_stops_at_completed() {
    let script = Script::new(vec![
        pending(),
        pending(),
        FetchOutcome::State(JobState::Completed),
    ]);
    let client = PollClient::with_fetcher(Arc::clone(&script), fast_policy(None));

    let result = client.wait_for_completion();
    assert_eq!(result.kind, PollKind::Completed);
    assert_eq!(script.calls(), 3, "must stop probing after the terminal answer");
}

#[test]
fn blocking_stops_at_job_error() {
    let script = Script::new(vec![FetchOutcome::State(JobState::Errored)]);
    let client = PollClient::with_fetcher(Arc::clone(&script), fast_policy(None));

    let result = client.wait_for_completion();
    assert_eq!(result.kind, PollKind::Errored);
    assert_eq!(script.calls(), 1);
}

#[test]
fn blocking_absorbs_transient_failures() {
    let script = Script::new(vec![
        FetchOutcome::Transient("timeout".into()),
        FetchOutcome::Transient("connection refused".into()),
        FetchOutcome::State(JobState::Completed),
    ]);
    let client = PollClient::with_fetcher(Arc::clone(&script), fast_policy(None));

    let result = client.wait_for_completion();
    assert_eq!(result.kind, PollKind::Completed);
    assert!(result.message.is_none());
    assert_eq!(script.calls(), 3);
}

#[test]
fn blocking_gives_up_with_soft_pending() {
    // All-pending with max_retries = 3: exactly 4 probes, then Pending.
    let script = Script::new(vec![]);
    let client = PollClient::with_fetcher(Arc::clone(&script), fast_policy(Some(3)));

    let result = client.wait_for_completion();
    assert_eq!(result.kind, PollKind::Pending);
    assert_eq!(script.calls(), 4);
}

#[test]
fn blocking_surfaces_definitive_failure() {
    let script = Script::new(vec![FetchOutcome::Definitive("HTTP 500".into())]);
    let client = PollClient::with_fetcher(Arc::clone(&script), fast_policy(None));

    let result = client.wait_for_completion();
    assert_eq!(result.kind, PollKind::ClientError);
    assert_eq!(result.message.as_deref(), Some("HTTP 500"));
    assert_eq!(script.calls(), 1, "definitive failures are never retried");
}

#[test]
fn check_once_maps_outcomes() {
    let script = Script::new(vec![
        FetchOutcome::State(JobState::Completed),
        FetchOutcome::Transient("timeout".into()),
        FetchOutcome::Definitive("HTTP 404".into()),
    ]);
    let client = PollClient::with_fetcher(Arc::clone(&script), fast_policy(None));

    assert_eq!(client.check_once().kind, PollKind::Completed);
    assert_eq!(client.check_once().kind, PollKind::Pending);
    assert_eq!(client.check_once().kind, PollKind::ClientError);
}

#[test]
fn async_returns_terminal_result_without_callback() {
    let script = Script::new(vec![FetchOutcome::State(JobState::Completed)]);
    let client = PollClient::with_fetcher(Arc::clone(&script), fast_policy(None));

    let fired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    let ack = client.check_status_async(move |_| flag.store(true, Ordering::SeqCst));

    assert_eq!(ack.kind, PollKind::Completed);
    std::thread::sleep(Duration::from_millis(50));
    assert!(!fired.load(Ordering::SeqCst), "callback must never fire");
    assert_eq!(script.calls(), 1, "no background polling was started");
}

#[test]
fn async_returns_client_error_without_callback() {
    let script = Script::new(vec![FetchOutcome::Definitive("HTTP 500".into())]);
    let client = PollClient::with_fetcher(Arc::clone(&script), fast_policy(None));

    let fired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    let ack = client.check_status_async(move |_| flag.store(true, Ordering::SeqCst));

    assert_eq!(ack.kind, PollKind::ClientError);
    assert_eq!(ack.message.as_deref(), Some("HTTP 500"));
    std::thread::sleep(Duration::from_millis(50));
    assert!(!fired.load(Ordering::SeqCst));
    assert_eq!(script.calls(), 1);
}

#[test]
fn async_pending_acks_then_calls_back_exactly_once() {
    let script = Script::new(vec![
        pending(), // immediate check
        pending(),
        FetchOutcome::State(JobState::Completed),
    ]);
    let client = PollClient::with_fetcher(Arc::clone(&script), fast_policy(None));

    let (tx, rx) = mpsc::channel();
    let ack = client.check_status_async(move |result| {
        tx.send(result).unwrap();
    });
    assert_eq!(ack.kind, PollKind::Pending);

    let delivered = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(delivered.kind, PollKind::Completed);
    // Exactly once: the sender is consumed by the FnOnce callback, and no
    // further message may arrive.
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn async_transient_start_also_schedules_polling() {
    let script = Script::new(vec![
        FetchOutcome::Transient("timeout".into()), // immediate check
        FetchOutcome::State(JobState::Errored),
    ]);
    let client = PollClient::with_fetcher(Arc::clone(&script), fast_policy(None));

    let (tx, rx) = mpsc::channel();
    let ack = client.check_status_async(move |result| {
        tx.send(result).unwrap();
    });
    assert_eq!(ack.kind, PollKind::Pending);

    let delivered = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(delivered.kind, PollKind::Errored);
}

#[test]
fn async_callback_receives_give_up_pending() {
    let script = Script::new(vec![]);
    let client = PollClient::with_fetcher(Arc::clone(&script), fast_policy(Some(2)));

    let (tx, rx) = mpsc::channel();
    let ack = client.check_status_async(move |result| {
        tx.send(result).unwrap();
    });
    assert_eq!(ack.kind, PollKind::Pending);

    let delivered = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(delivered.kind, PollKind::Pending, "retry exhaustion is a soft give-up");
}

#[test]
fn superseding_poll_suppresses_the_older_callback() {
    let gate = Gate::new();
    let client = PollClient::with_fetcher(Arc::clone(&gate), fast_policy(None));

    let (tx, rx) = mpsc::channel();

    let tx1 = tx.clone();
    let ack1 = client.check_status_async(move |result| {
        tx1.send((1u8, result)).unwrap();
    });
    assert_eq!(ack1.kind, PollKind::Pending);

    // Let the first background loop get going before superseding it.
    std::thread::sleep(Duration::from_millis(10));

    let tx2 = tx.clone();
    let ack2 = client.check_status_async(move |result| {
        tx2.send((2u8, result)).unwrap();
    });
    assert_eq!(ack2.kind, PollKind::Pending);
    drop(tx);

    gate.open.store(true, Ordering::SeqCst);

    let (id, result) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(id, 2, "only the newest session may deliver");
    assert_eq!(result.kind, PollKind::Completed);

    // Both senders are gone once each background thread finishes; a clean
    // disconnect proves the first callback never fired.
    match rx.recv_timeout(Duration::from_secs(5)) {
        Err(_) => {}
        Ok((id, _)) => panic!("unexpected second callback from session {id}"),
    }
}
