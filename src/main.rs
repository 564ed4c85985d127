//! Entry point for travel-agent, a streaming travel-planning agent.
//!
//! This binary loads environment variables, installs logging, parses CLI
//! arguments via [`cli`], and dispatches to the chosen subcommand.

mod agent;
mod cli;
mod config;
mod constants;
mod destinations;
mod logging;
mod message;
mod output;
mod provider;
mod tools;

use anyhow::Result;

/// Runs the travel-agent CLI.
///
/// Loads `.env` files (silently ignored if absent), initializes tracing,
/// parses command-line arguments into a [`cli::Cli`] struct, and dispatches
/// via [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();
    let cli = cli::parse();
    cli::run(cli).await
}
