mod cli;
mod config;
mod db;
mod error;
mod ipc;
mod listing;
mod logging;
mod models;
mod repository;
mod store;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;

use crate::cli::Cli;
use crate::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbosity());

    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(workspace) = cli.workspace {
        config.workspace = Some(workspace);
    }
    if let Some(latency_ms) = cli.latency_ms {
        config.latency_ms = latency_ms;
    }

    let workspace = config.workspace.clone();
    let mut state = ipc::AppState::new(config).context("failed to initialise state")?;
    if let Some(path) = workspace {
        state
            .open_workspace(&path)
            .with_context(|| format!("failed to open workspace {}", path.display()))?;
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "campusd ready");
    serve(&mut state);
    tracing::info!("stdin closed, shutting down");
    Ok(())
}

/// One JSON request per stdin line, one JSON response per stdout line.
fn serve(state: &mut ipc::AppState) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("stdin read failed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to reply to.
                tracing::warn!("unparseable request: {e}");
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() },
                });
                let _ = writeln!(stdout, "{resp}");
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
