//! Lapse MCP Server
//!
//! Line-delimited JSON-RPC over stdin/stdout.
//!
//! Tools:
//! - interval, interval_from, interval_seconds: build and inspect durations
//! - interval_sum, interval_divide: signed summation and division
//! - interval_shorten, interval_format: canonical form
//! - help: documentation for the functions above
//!
//! Environment:
//! - LAPSE_LOG (or RUST_LOG): tracing filter, default `info`
//! - LAPSE_INCLUDE_DAYS: default for `include_days` when a call omits it

mod config;
mod server;

use config::{ServerConfig, DEFAULT_LOG_FILTER};
use lapse_plugin::EvalContext;
use server::{Server, PROTOCOL_VERSION, SERVER_VERSION};
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber; stdout carries only protocol messages
fn init_tracing(filter: &str) -> Option<String> {
    let (env_filter, problem) = match EnvFilter::try_new(filter) {
        Ok(f) => (f, None),
        Err(e) => (
            EnvFilter::new(DEFAULT_LOG_FILTER),
            Some(format!("invalid log filter '{}' ({}), using '{}'", filter, e, DEFAULT_LOG_FILTER)),
        ),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    problem
}

fn write_line(stdout: &mut impl Write, json: &str) -> io::Result<()> {
    writeln!(stdout, "{}", json)?;
    stdout.flush()
}

fn main() {
    let config = ServerConfig::from_env();

    if let Some(problem) = init_tracing(&config.log_filter) {
        warn!("{}", problem);
    }
    for problem in &config.warnings {
        warn!("{}", problem);
    }

    let registry = lapse_std::standard_registry();
    let ctx = EvalContext::new().with_day_mode(config.default_day_mode);
    let server = Server::new(registry, ctx);

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Lapse MCP Server started");
    info!(day_mode = ?config.default_day_mode, log_filter = %config.log_filter, "configuration");
    debug!(
        stdin_terminal = io::stdin().is_terminal(),
        stdout_terminal = io::stdout().is_terminal(),
        "stdio"
    );

    // Use BufReader for stdin (line-based protocol)
    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    info!("Server ready, waiting for requests...");

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("Client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                debug!(bytes = line.len(), "received");

                let Some(response) = server.handle_line(line) else {
                    continue;
                };

                let response_json = match serde_json::to_string(&response) {
                    Ok(json) => json,
                    Err(e) => {
                        error!(error = %e, "error serializing response");
                        continue;
                    }
                };

                let mut stdout = io::stdout().lock();
                if let Err(e) = write_line(&mut stdout, &response_json) {
                    error!(error = %e, "error writing response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        }
    }

    info!("Server shutting down");
}
