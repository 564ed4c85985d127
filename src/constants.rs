//! Centralized constants for travel-agent.
//!
//! Default strings, environment variable names, and limits live here so they
//! can be changed in one place.

/// Application name used in CLI output.
pub const APP_NAME: &str = "travel-agent";

/// Default LLM model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default base URL of the OpenAI-compatible GitHub Models endpoint.
pub const DEFAULT_BASE_URL: &str = "https://models.inference.ai.azure.com";

/// Display name of the agent, printed as the reply label.
pub const DEFAULT_AGENT_NAME: &str = "TravelAgent";

/// System instructions sent with every turn.
pub const DEFAULT_INSTRUCTIONS: &str =
    "You are a friendly AI that suggests random travel plans for customers. \
Use the get_random_destination tool to choose where they should go.";

/// Messages sent when none are given on the command line.
pub const DEFAULT_USER_INPUTS: &[&str] = &["Plan me a day trip."];

/// Built-in destination catalog.
pub const DEFAULT_DESTINATIONS: &[&str] = &[
    "Barcelona, Spain",
    "Paris, France",
    "Berlin, Germany",
    "Tokyo, Japan",
    "Sydney, Australia",
    "New York, USA",
    "Cairo, Egypt",
    "Cape Town, South Africa",
    "Rio de Janeiro, Brazil",
    "Bali, Indonesia",
];

/// Maximum tokens for LLM completions.
pub const MAX_TOKENS: u64 = 4096;

/// Default number of tool round-trips rig-core may take per reply.
pub const DEFAULT_MAX_TURNS: usize = 4;

// --- Environment ---

/// Credential passed through to the remote API.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

pub const MODEL_ENV: &str = "TRAVEL_AGENT_MODEL";
pub const BASE_URL_ENV: &str = "TRAVEL_AGENT_BASE_URL";
pub const AGENT_NAME_ENV: &str = "TRAVEL_AGENT_NAME";
pub const INSTRUCTIONS_ENV: &str = "TRAVEL_AGENT_INSTRUCTIONS";
pub const MAX_TURNS_ENV: &str = "TRAVEL_AGENT_MAX_TURNS";

/// Log filter directive, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "TRAVEL_AGENT_LOG";

/// Filter used when neither log variable is set.
pub const DEFAULT_LOG_FILTER: &str = "travel_agent=warn";

// --- Tools ---

/// Name the model uses to call the destination tool.
pub const RANDOM_DESTINATION_TOOL: &str = "get_random_destination";
