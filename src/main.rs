// This is the entry point of the Google Drive MCP server.
//
// **Architecture Overview:**
// - `core/` = Business logic (path matching, locating, text extraction)
// - `infra/` = Implementations of core traits (Google APIs, OAuth, token file)
// - `mcp/` = MCP-specific adapters (tool schemas, stdio server)
//
// This file's job is to:
// 1. Load configuration
// 2. Set up logging (stderr + log file; stdout belongs to the protocol)
// 3. Start the MCP server on stdio and wait for the client to hang up

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "mcp/mcp_layer.rs"]
mod mcp;

use std::fs::OpenOptions;
use std::sync::Mutex;

use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::infra::google::CredentialSources;
use crate::mcp::drive_server::DriveDocsServer;

const DEFAULT_LOG_LEVEL: &str = "debug";
const DEFAULT_LOG_FILE: &str = "mcp_server.log";

/// Maps `MCP_LOG_LEVEL` to a tracing level. Unknown values fall back to info.
fn log_level(raw: Option<&str>) -> &'static str {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return DEFAULT_LOG_LEVEL;
    };
    match raw.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        _ => "info",
    }
}

/// Our own events at the configured level, everyone else's at warn.
fn log_filter(level: &str) -> String {
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level)
}

fn init_logging() -> (&'static str, String) {
    let level = log_level(std::env::var("MCP_LOG_LEVEL").ok().as_deref());
    let log_file = std::env::var("MCP_LOG_FILE")
        .ok()
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    let (file_layer, file_error) = match OpenOptions::new().create(true).append(true).open(&log_file) {
        Ok(file) => (
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(log_filter(level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!("Could not create log file {}: {}", log_file, e);
    }

    (level, log_file)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let (level, log_file) = init_logging();
    tracing::info!("Starting Google Drive MCP Server...");
    tracing::info!("Log level: {}, Log file: {}", level, log_file);

    // Credentials are only resolved on the first tool call, so a missing
    // configuration shows up as a tool error rather than a dead server.
    let credentials = CredentialSources::from_env(std::env::args().nth(1));

    let server = DriveDocsServer::new(credentials)
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!("Failed to start MCP server: {}", e))?;

    server.waiting().await?;

    tracing::info!("Google Drive MCP Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_defaults_to_debug() {
        assert_eq!(log_level(None), "debug");
        assert_eq!(log_level(Some("  ")), "debug");
    }

    #[test]
    fn log_level_accepts_aliases_in_any_case() {
        assert_eq!(log_level(Some("INFO")), "info");
        assert_eq!(log_level(Some("Warning")), "warn");
        assert_eq!(log_level(Some("CRITICAL")), "error");
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        assert_eq!(log_level(Some("verbose")), "info");
    }

    #[test]
    fn filter_scopes_the_level_to_this_crate() {
        assert_eq!(log_filter("debug"), "warn,drive_docs_mcp=debug");
    }
}
