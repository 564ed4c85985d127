//! Chat model access for travel-agent.
//!
//! [`ChatTransport`] is the seam the conversation driver talks to;
//! [`Provider`] implements it on top of rig-core's OpenAI-compatible client.

mod client;
mod thread;

pub use client::Provider;
pub use thread::{ChatTransport, ThreadHandle};
#[cfg(test)]
pub use thread::{Fragment, FragmentStream, TransportError};
