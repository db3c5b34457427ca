//! `jobpoll wait` – block until the job reaches a terminal result.

use anyhow::Result;
use jobpoll_core::{PollClient, StatusFetch};

use super::print_result;

pub fn run_wait<F: StatusFetch + 'static>(client: &PollClient<F>, json: bool) -> Result<()> {
    tracing::info!("waiting for job completion");
    let result = client.wait_for_completion();
    print_result(&result, json)
}
