//! Subcommand implementations.

mod check;
mod wait;

pub use check::run_check;
pub use wait::run_wait;

use anyhow::Result;
use jobpoll_core::{PollKind, PollResult};

/// Shared result printer for both subcommands.
fn print_result(result: &PollResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(result)?);
        return Ok(());
    }

    match result.kind {
        PollKind::Completed => println!("completed"),
        PollKind::Errored => println!("error"),
        PollKind::Pending => println!("pending"),
        PollKind::ClientError => match &result.message {
            Some(msg) => println!("client error: {msg}"),
            None => println!("client error"),
        },
    }
    Ok(())
}
