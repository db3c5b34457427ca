//! `jobpoll check` – one status probe, no polling.

use anyhow::Result;
use jobpoll_core::{PollClient, StatusFetch};

use super::print_result;

pub fn run_check<F: StatusFetch + 'static>(client: &PollClient<F>, json: bool) -> Result<()> {
    let result = client.check_once();
    print_result(&result, json)
}
