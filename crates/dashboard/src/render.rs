//! Terminal rendering of the dashboard screens.
//!
//! Pure functions from state to text; nothing here performs I/O.

use pnode_common::{ChatMessage, ChatRole, EnrichedNode};

use crate::aggregate::DashboardStats;
use crate::state::{DashboardView, ViewState};

const WIDTH: usize = 77;

pub const LOADING_MESSAGE: &str = "Scanning Gossip Network & AI Analysis...";

/// Truncate string with ellipsis. Counts characters, not bytes.
pub(crate) fn truncate_str(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// `first8...last8` for long keys, unchanged otherwise.
pub fn short_pubkey(pubkey: &str) -> String {
    let chars: Vec<char> = pubkey.chars().collect();
    if chars.len() <= 16 {
        return pubkey.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn format_reward(reward: f64) -> String {
    format!("{:.4} XAND", reward)
}

pub fn format_capacity(total_storage_tb: f64) -> String {
    format!("{:.2} TB", total_storage_tb)
}

fn rule(left: char, right: char) -> String {
    format!("{}{}{}\n", left, "─".repeat(WIDTH), right)
}

fn row(text: &str) -> String {
    format!("│ {:<w$} │\n", truncate_str(text, WIDTH - 2), w = WIDTH - 2)
}

fn field(label: &str, value: &str) -> String {
    row(&format!("{:<18}{}", label, value))
}

pub fn render_loading() -> String {
    format!("⟳ {}\n", LOADING_MESSAGE)
}

pub fn render_failed(message: &str) -> String {
    let mut out = String::new();
    out.push_str(&rule('┌', '┐'));
    out.push_str(&row(&format!("✗ {}", message)));
    out.push_str(&rule('├', '┤'));
    out.push_str(&row("[Retry Connection] reloads the whole dashboard"));
    out.push_str(&rule('└', '┘'));
    out
}

pub fn render_stats(stats: &DashboardStats) -> String {
    let mut out = String::new();
    out.push_str(&rule('┌', '┐'));
    out.push_str(&row("XANDEUM ANALYTICS · Devnet Active"));
    out.push_str(&rule('├', '┤'));
    out.push_str(&field("Active pNodes", &stats.node_count.to_string()));
    out.push_str(&field("Network Capacity", &format_capacity(stats.total_storage_tb)));
    out.push_str(&field("Total Epochs", &stats.epoch_count.to_string()));
    if stats.risk_count > 0 {
        out.push_str(&field("At Risk", &stats.risk_count.to_string()));
    }
    out.push_str(&rule('└', '┘'));
    out
}

pub fn render_node(node: &EnrichedNode) -> String {
    let badge = if node.anomaly_status.is_risk() { "⚠ Risk  " } else { "" };
    let score = node
        .anomaly_score
        .map(|s| format!(" (score {:.3})", s))
        .unwrap_or_default();

    let mut out = String::new();
    out.push_str(&rule('┌', '┐'));
    out.push_str(&row(&format!("▣ {}v{}", badge, node.node.version)));
    out.push_str(&field("Public Key", &short_pubkey(&node.node.pubkey)));
    out.push_str(&field("Gossip Address", &node.node.gossip_addr));
    out.push_str(&field("Proj. Reward", &format_reward(node.projected_reward)));
    out.push_str(&field("Anomaly", &format!("{}{}", node.anomaly_status, score)));
    out.push_str(&row("● Active in Gossip"));
    out.push_str(&rule('└', '┘'));
    out
}

pub fn render_view(view: &DashboardView) -> String {
    let mut out = render_stats(&view.stats);
    out.push_str("\nNetwork Nodes\n\n");
    if view.nodes.is_empty() {
        out.push_str("  (no nodes reported by the cluster)\n");
    }
    for node in &view.nodes {
        out.push_str(&render_node(node));
    }
    out
}

pub fn render_state(state: &ViewState) -> String {
    match state {
        ViewState::Loading => render_loading(),
        ViewState::Ready(view) => render_view(view),
        ViewState::Failed { message } => render_failed(message),
    }
}

pub fn render_message(message: &ChatMessage) -> String {
    match message.role {
        ChatRole::User => format!("you › {}\n", message.content),
        ChatRole::Assistant => format!("ai  › {}\n", message.content),
    }
}

pub fn render_transcript(messages: &[ChatMessage], is_typing: bool) -> String {
    let mut out: String = messages.iter().map(render_message).collect();
    if is_typing {
        out.push_str("ai  › ...\n");
    }
    out
}
