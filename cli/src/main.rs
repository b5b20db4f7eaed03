//! agentctl - deploy, verify, smoke-test and clean up managed AI agents

use clap::Parser;
use tracing_subscriber::EnvFilter;

use agentctl_cli::cli::Cli;
use agentctl_cli::output::json;

/// Log filter variable; `RUST_LOG` is consulted when it is unset.
const LOG_ENV: &str = "AGENTCTL_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json_errors = cli.json;
    if let Err(e) = cli.run().await {
        match json::format_error(&format!("{e:#}"), "command_failed") {
            Ok(obj) if json_errors => eprintln!("{obj}"),
            _ => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}
