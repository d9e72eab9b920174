//! # pNode Dashboard Entry Point
//!
//! ```text
//! pnode-dashboard [--directory-rpc URL] [--prediction-url URL] [--timeout-secs N] [-v] <COMMAND>
//!
//!   show   [--json] [--chat]   load and render the dashboard
//!   chat   [--query TEXT]      ask the AI agent
//!   health [--json]            check both upstream services
//! ```
//!
//! Environment variables (flags take precedence):
//! - `PNODE_DIRECTORY_RPC`: cluster JSON-RPC endpoint
//! - `PNODE_PREDICTION_URL`: prediction service base URL
//! - `PNODE_HTTP_TIMEOUT_SECS`: per-request timeout, unset for none
//!
//! Exit status is 1 when `show` ends in the failed state, when `health`
//! reports anything but healthy, or on a configuration error.

use std::process;

use clap::Parser;
use tracing::{error, Level};

mod cli;

use cli::{handle_chat, handle_health, handle_show, Cli, Clients, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let outcome: anyhow::Result<bool> = async move {
        let config = cli.config()?;
        let clients = Clients::build(&config)?;
        match cli.cmd {
            Commands::Show { json, chat } => handle_show(clients, json, chat).await,
            Commands::Chat { query } => handle_chat(clients, query).await,
            Commands::Health { json } => handle_health(clients, json).await,
        }
    }
    .await;

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}
