//! Command-line interface definition and dispatch for travel-agent.
//!
//! Uses [`clap`] for argument parsing with derive macros. Running without a
//! subcommand is the same as `plan` with the default message list.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::agent::ConversationDriver;
use crate::config::Config;
use crate::constants::{DEFAULT_DESTINATIONS, DEFAULT_USER_INPUTS, RANDOM_DESTINATION_TOOL};
use crate::destinations::DestinationPicker;
use crate::output::StdoutRenderer;
use crate::provider::Provider;
use crate::tools::ToolRegistry;

/// Top-level CLI structure for travel-agent.
#[derive(Parser)]
#[command(
    name = crate::constants::APP_NAME,
    about = "A streaming travel-planning agent with a random destination tool"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands. The `///` doc comments on variants double as
/// `--help` text rendered by clap.
#[derive(Subcommand)]
pub enum Commands {
    /// Ask the travel agent for a plan (default)
    Plan {
        /// Messages to send, in order
        messages: Vec<String>,
        /// Model to use (overrides TRAVEL_AGENT_MODEL)
        #[arg(short, long)]
        model: Option<String>,
        /// API base URL (overrides TRAVEL_AGENT_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,
        /// Destination to offer instead of the built-in catalog (repeatable)
        #[arg(short, long = "destination")]
        destinations: Vec<String>,
    },
    /// Pick random destinations locally, without contacting a model
    Pick {
        /// How many picks to make
        #[arg(short, long, default_value_t = 1)]
        count: usize,
        /// Seed for a reproducible sequence
        #[arg(long)]
        seed: Option<u64>,
        /// Destination to offer instead of the built-in catalog (repeatable)
        #[arg(short, long = "destination")]
        destinations: Vec<String>,
    },
    /// List the destination catalog the picker draws from
    Destinations {
        /// Destination to list instead of the built-in catalog (repeatable)
        #[arg(short, long = "destination")]
        destinations: Vec<String>,
    },
    /// Print the tool definitions sent to the model
    Tools,
}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Plan {
        messages: Vec::new(),
        model: None,
        base_url: None,
        destinations: Vec::new(),
    });

    match command {
        Commands::Plan {
            messages,
            model,
            base_url,
            destinations,
        } => {
            let config = Config::from_env()?.with_overrides(model, base_url);
            let messages = if messages.is_empty() {
                DEFAULT_USER_INPUTS.iter().map(|m| m.to_string()).collect()
            } else {
                messages
            };

            let picker = Arc::new(build_picker(destinations, None)?);
            let tools = Arc::new(ToolRegistry::with_destinations(picker)?);
            let provider = Provider::from_config(&config, tools)?;

            tracing::info!(model = %config.model, turns = messages.len(), "starting conversation");
            let mut renderer = StdoutRenderer::new();
            let mut driver = ConversationDriver::new(&provider, &mut renderer);
            driver.run(&messages).await?;
            tracing::debug!(state = ?driver.state(), "conversation finished");
            Ok(())
        }
        Commands::Pick {
            count,
            seed,
            destinations,
        } => {
            let picker = Arc::new(build_picker(destinations, seed)?);
            let tools = ToolRegistry::with_destinations(picker)?;
            for _ in 0..count {
                let result = tools
                    .execute(RANDOM_DESTINATION_TOOL, serde_json::json!({}))
                    .await?;
                println!("{}", result.content);
            }
            Ok(())
        }
        Commands::Destinations { destinations } => {
            let picker = build_picker(destinations, None)?;
            for line in catalog_listing(&picker) {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Tools => {
            let picker = Arc::new(DestinationPicker::with_default_catalog());
            let tools = ToolRegistry::with_destinations(picker)?;
            println!("{}", serde_json::to_string_pretty(&tools.definitions())?);
            Ok(())
        }
    }
}

/// Builds a picker over `destinations`, or the built-in catalog when empty.
fn build_picker(destinations: Vec<String>, seed: Option<u64>) -> Result<DestinationPicker> {
    let destinations: Vec<String> = destinations
        .into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();

    let picker = match (destinations.is_empty(), seed) {
        (true, None) => DestinationPicker::with_default_catalog(),
        (true, Some(seed)) => {
            DestinationPicker::with_seed(DEFAULT_DESTINATIONS.iter().copied(), seed)?
        }
        (false, None) => DestinationPicker::new(destinations)?,
        (false, Some(seed)) => DestinationPicker::with_seed(destinations, seed)?,
    };
    Ok(picker)
}

/// Numbered catalog entries, after trimming and de-duplication.
fn catalog_listing(picker: &DestinationPicker) -> Vec<String> {
    picker
        .catalog()
        .iter()
        .enumerate()
        .map(|(i, destination)| format!("{:>2}. {}", i + 1, destination))
        .collect()
}
