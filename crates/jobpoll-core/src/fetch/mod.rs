//! Status probing against the remote job endpoint.
//!
//! Uses the curl crate (libcurl) to issue one GET per probe against
//! `<base>/status` and classify every possible outcome (success, timeout,
//! connection failure, malformed body, HTTP error) into a [`FetchOutcome`].
//! No retrying or sleeping happens here; that is the engine's job, which
//! keeps this layer trivially testable.

mod error;
mod parse;

pub use error::StatusError;
pub use parse::classify;

use anyhow::{Context, Result};
use curl::easy::Easy;
use std::time::Duration;
use url::Url;

use crate::result::JobState;

/// Classification of one probe. Carries the same information as a
/// `(retryable, result kind)` pair: `State` is a well-formed answer from the
/// server, `Transient` should be retried after backoff, `Definitive` should
/// surface immediately and never be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 2xx response with a recognized result field.
    State(JobState),
    /// Transient failure: timeout, connection error, malformed body.
    Transient(String),
    /// Definitive failure: non-2xx status or a non-retryable transport error.
    Definitive(String),
}

/// One request/response cycle against the status endpoint.
///
/// The engine is generic over this trait so its loop can be exercised with
/// scripted outcomes in tests.
pub trait StatusFetch: Send + Sync {
    fn fetch(&self) -> FetchOutcome;
}

/// Probe over HTTP via curl. One `Easy` handle per call; a probe is a
/// blocking operation, so call it from a thread that may sleep.
#[derive(Debug, Clone)]
pub struct HttpStatusFetcher {
    status_url: Url,
}

impl HttpStatusFetcher {
    /// Builds a fetcher for `<base_url>/status`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("invalid base URL: {base_url}"))?;
        let mut status_url = base.clone();
        status_url
            .path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base URL cannot have a path: {base_url}"))?
            .pop_if_empty()
            .push("status");
        Ok(Self { status_url })
    }

    fn probe(&self) -> std::result::Result<(u32, Vec<u8>), StatusError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = Easy::new();
        easy.url(self.status_url.as_str())?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.connect_timeout(Duration::from_secs(15))?;
        easy.timeout(Duration::from_secs(30))?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        Ok((code, body))
    }
}

impl StatusFetch for HttpStatusFetcher {
    fn fetch(&self) -> FetchOutcome {
        match self.probe() {
            Ok((code, body)) => {
                tracing::debug!(code, "status probe answered");
                if !(200..300).contains(&code) {
                    // Server-signaled failure; the body is not consulted.
                    return classify(&StatusError::Http(code));
                }
                parse::parse_status_body(&body)
            }
            Err(e) => classify(&e),
        }
    }
}
