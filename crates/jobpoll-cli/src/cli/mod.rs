//! CLI for the jobpoll status client.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use jobpoll_core::config;
use jobpoll_core::PollClient;

use commands::{run_check, run_wait};

/// Top-level CLI for the jobpoll status client.
#[derive(Debug, Parser)]
#[command(name = "jobpoll")]
#[command(about = "jobpoll: polling client for long-running job status", long_about = None)]
pub struct Cli {
    /// Override the configured base URL of the job server.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Print results as JSON instead of plain text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Block until the job reaches a terminal state (or retries run out).
    Wait,

    /// Perform a single status probe and print the result.
    Check,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        let mut cfg = config::load_or_init()?;
        if let Some(url) = cli.base_url {
            cfg.base_url = url;
        }
        let client = PollClient::new(&cfg)?;

        match cli.command {
            CliCommand::Wait => run_wait(&client, cli.json),
            CliCommand::Check => run_check(&client, cli.json),
        }
    }
}
