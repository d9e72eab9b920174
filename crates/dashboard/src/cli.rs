//! # pNode Dashboard CLI Module
//!
//! Argument parsing, client construction and the command handlers. Every
//! handler returns `Ok(true)` on success and `Ok(false)` when the process
//! should exit with status 1.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::info;

use pnode_common::DashboardConfig;
use pnode_dashboard::render::{render_loading, render_message, render_state, render_transcript};
use pnode_dashboard::{
    health, ChatPanel, Dashboard, HealthReport, SubmitOutcome, SyntheticMetricsSource,
    ViewState,
};
use pnode_directory::{NodeDirectory, RpcNodeDirectory};
use pnode_predict::{HttpPredictionClient, PredictionService};

// ════════════════════════════════════════════════════════════════════════════
// ARGUMENTS
// ════════════════════════════════════════════════════════════════════════════

#[derive(Parser)]
#[command(name = "pnode-dashboard", version, about = "pNode analytics dashboard")]
pub(crate) struct Cli {
    /// Cluster RPC endpoint (overrides PNODE_DIRECTORY_RPC)
    #[arg(long, global = true)]
    pub directory_rpc: Option<String>,

    /// Prediction service base URL (overrides PNODE_PREDICTION_URL)
    #[arg(long, global = true)]
    pub prediction_url: Option<String>,

    /// Per-request timeout in seconds (overrides PNODE_HTTP_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Load nodes and predictions, then render the dashboard
    Show {
        /// Print the ready view as JSON
        #[arg(long)]
        json: bool,
        /// Open the chat panel after rendering
        #[arg(long)]
        chat: bool,
    },

    /// Ask the AI agent (interactive when --query is omitted)
    Chat {
        #[arg(long)]
        query: Option<String>,
    },

    /// Check the node directory and prediction service
    Health {
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Environment first, then flags.
    pub fn config(&self) -> Result<DashboardConfig> {
        let mut config = DashboardConfig::from_env().context("invalid environment")?;
        if let Some(url) = &self.directory_rpc {
            config.directory_rpc_url = url.clone();
        }
        if let Some(url) = &self.prediction_url {
            config.prediction_url = url.clone();
        }
        if self.timeout_secs.is_some() {
            config.request_timeout_secs = self.timeout_secs;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CLIENTS
// ════════════════════════════════════════════════════════════════════════════

pub(crate) struct Clients {
    pub directory: Arc<dyn NodeDirectory>,
    pub predictor: Arc<dyn PredictionService>,
}

impl Clients {
    pub fn build(config: &DashboardConfig) -> Result<Self> {
        let timeout = config.request_timeout();
        let directory = RpcNodeDirectory::new(config.directory_rpc_url.clone(), timeout)
            .context("failed to build directory client")?;
        let predictor = HttpPredictionClient::new(config.prediction_url.clone(), timeout)
            .context("failed to build prediction client")?;

        info!(
            directory = %config.directory_rpc_url,
            prediction = %config.prediction_url,
            "clients ready"
        );
        Ok(Self {
            directory: Arc::new(directory),
            predictor: Arc::new(predictor),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// STDIN
// ════════════════════════════════════════════════════════════════════════════

type StdinLines = Lines<BufReader<Stdin>>;

fn stdin_lines() -> StdinLines {
    BufReader::new(tokio::io::stdin()).lines()
}

/// Prompts go to stderr so stdout carries only command output.
async fn prompt(lines: &mut StdinLines, text: &str) -> Result<Option<String>> {
    let mut stderr = tokio::io::stderr();
    stderr.write_all(text.as_bytes()).await?;
    stderr.flush().await?;
    Ok(lines.next_line().await?)
}

// ════════════════════════════════════════════════════════════════════════════
// STDOUT
// ════════════════════════════════════════════════════════════════════════════

/// What `show` writes to stdout for a settled state. Only a ready view
/// produces output; the failure screen belongs on stderr.
fn show_stdout(state: &ViewState, json: bool) -> Result<Option<String>> {
    match state {
        ViewState::Ready(view) if json => {
            Ok(Some(format!("{}\n", serde_json::to_string_pretty(view)?)))
        }
        ViewState::Ready(_) => Ok(Some(render_state(state))),
        ViewState::Loading | ViewState::Failed { .. } => Ok(None),
    }
}

fn health_stdout(result: &HealthReport, json: bool) -> Result<String> {
    if json {
        Ok(format!("{}\n", result.to_json()?))
    } else {
        Ok(result.to_table())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// COMMAND HANDLERS
// ════════════════════════════════════════════════════════════════════════════

/// Handle `show`. A failed load offers a full reload until the user declines.
pub(crate) async fn handle_show(clients: Clients, json: bool, chat: bool) -> Result<bool> {
    let mut dashboard = Dashboard::new(
        Arc::clone(&clients.directory),
        Arc::clone(&clients.predictor),
        Box::new(SyntheticMetricsSource::from_entropy()),
    );
    let mut lines = stdin_lines();

    if !json {
        eprint!("{}", render_loading());
    }
    let mut state = dashboard.load().await.clone();

    loop {
        match &state {
            ViewState::Ready(_) => {
                if let Some(out) = show_stdout(&state, json)? {
                    print!("{}", out);
                }
                break;
            }
            ViewState::Failed { .. } => {
                eprint!("{}", render_state(&state));
                let answer = prompt(&mut lines, "Retry connection? [y/N] ").await?;
                let retry = matches!(answer.as_deref().map(str::trim), Some("y") | Some("Y"));
                if !retry {
                    return Ok(false);
                }
                if !json {
                    eprint!("{}", render_loading());
                }
                state = dashboard.retry().await.clone();
            }
            // load() and retry() always settle before returning
            ViewState::Loading => return Ok(false),
        }
    }

    if chat {
        let panel = ChatPanel::new(Arc::clone(&clients.predictor));
        chat_loop(&panel, &mut lines).await?;
    }
    Ok(true)
}

/// Handle `chat`.
pub(crate) async fn handle_chat(clients: Clients, query: Option<String>) -> Result<bool> {
    let panel = ChatPanel::new(clients.predictor);

    match query {
        Some(q) => match panel.submit(&q).await {
            SubmitOutcome::Answered(reply) => {
                println!("{}", reply.content);
                Ok(true)
            }
            SubmitOutcome::Empty => {
                eprintln!("query must not be empty");
                Ok(false)
            }
            SubmitOutcome::Busy => Ok(false),
        },
        None => {
            let mut lines = stdin_lines();
            chat_loop(&panel, &mut lines).await?;
            Ok(true)
        }
    }
}

async fn chat_loop(panel: &ChatPanel, lines: &mut StdinLines) -> Result<()> {
    print!("{}", render_transcript(&panel.transcript(), false));
    println!("(type 'exit' to leave)");

    loop {
        let Some(input) = prompt(lines, "> ").await? else {
            break;
        };
        if matches!(input.trim(), "exit" | "quit") {
            break;
        }
        if input.trim().is_empty() {
            continue;
        }

        println!("ai  › ...");
        if let SubmitOutcome::Answered(reply) = panel.submit(&input).await {
            print!("{}", render_message(&reply));
        }
    }
    Ok(())
}

/// Handle `health`.
pub(crate) async fn handle_health(clients: Clients, json: bool) -> Result<bool> {
    eprintln!("Checking components...");
    let result = health::check_all(clients.directory.as_ref(), clients.predictor.as_ref()).await;
    print!("{}", health_stdout(&result, json)?);
    Ok(result.is_healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnode_common::{AnomalyStatus, EnrichedNode, NodeRecord};
    use pnode_dashboard::{ComponentHealth, DashboardStats, DashboardView, HealthStatus, FAILED_MESSAGE};

    fn ready_state() -> ViewState {
        let nodes = vec![EnrichedNode {
            node: NodeRecord::with_pubkey("P1"),
            anomaly_status: AnomalyStatus::Risk,
            anomaly_score: Some(-0.2),
            projected_reward: 1.25,
            storage_used: 512.0,
            timestamp: None,
        }];
        ViewState::Ready(DashboardView {
            stats: DashboardStats::compute(&nodes),
            nodes,
        })
    }

    #[test]
    fn show_json_stdout_is_only_json() {
        let out = show_stdout(&ready_state(), true)
            .unwrap_or_else(|e| panic!("output: {}", e))
            .unwrap_or_else(|| panic!("ready view produced no output"));
        let parsed: serde_json::Value =
            serde_json::from_str(&out).unwrap_or_else(|e| panic!("stdout is not JSON: {}", e));
        assert_eq!(parsed["stats"]["node_count"], 1);
        assert_eq!(parsed["nodes"][0]["pubkey"], "P1");
    }

    #[test]
    fn show_failed_writes_nothing_to_stdout() {
        let failed = ViewState::Failed {
            message: FAILED_MESSAGE.to_string(),
        };
        for json in [true, false] {
            let out = show_stdout(&failed, json).unwrap_or_else(|e| panic!("output: {}", e));
            assert_eq!(out, None);
        }
    }

    #[test]
    fn show_table_stdout_renders_view() {
        let out = show_stdout(&ready_state(), false)
            .unwrap_or_else(|e| panic!("output: {}", e))
            .unwrap_or_default();
        assert!(out.contains("Active pNodes"));
        assert!(out.contains("1.2500 XAND"));
    }

    #[test]
    fn health_json_stdout_is_only_json() {
        let result = HealthReport::new(
            vec![ComponentHealth::new(
                "Node Directory",
                HealthStatus::Unhealthy,
                3,
                vec!["http://127.0.0.1:9: connection refused".to_string()],
            )],
            3,
        );
        let out = health_stdout(&result, true).unwrap_or_else(|e| panic!("output: {}", e));
        let parsed: serde_json::Value =
            serde_json::from_str(&out).unwrap_or_else(|e| panic!("stdout is not JSON: {}", e));
        assert_eq!(parsed["overall"], "unhealthy");
        assert_eq!(parsed["components"][0]["name"], "Node Directory");
    }
}
