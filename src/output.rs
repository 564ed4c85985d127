//! Output rendering abstraction for travel-agent.
//!
//! Defines the [`Renderer`] trait that decouples the conversation driver from
//! the display. [`StdoutRenderer`] prints the transcript to the terminal.

use colored::Colorize;
use std::io::{self, Write};

use crate::message::Role;

/// Receives transcript events in the order they happen.
pub trait Renderer {
    /// Called before a user message is sent.
    fn user_message(&mut self, text: &str);

    /// Called once per reply, before its first fragment.
    fn agent_label(&mut self, name: &str);

    /// Render a single fragment as it arrives.
    fn render_token(&mut self, token: &str);

    /// Called when the reply stream ends.
    fn render_done(&mut self);

    /// Called when an error occurs during streaming.
    fn render_error(&mut self, err: &str);
}

/// Renders the transcript to stdout, or to any other writer.
///
/// Each fragment is written immediately with an explicit flush so the user
/// sees a "typing" effect. Errors go to stderr.
pub struct StdoutRenderer<W: Write = io::Stdout> {
    out: W,
}

impl StdoutRenderer {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> StdoutRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

// Write failures on the transcript (e.g. a closed pipe) are ignored.
impl<W: Write> Renderer for StdoutRenderer<W> {
    fn user_message(&mut self, text: &str) {
        writeln!(self.out, "# {}: {}", Role::User, text).ok();
        writeln!(self.out).ok();
    }

    fn agent_label(&mut self, name: &str) {
        write!(self.out, "# {}: ", name).ok();
        self.out.flush().ok();
    }

    fn render_token(&mut self, token: &str) {
        write!(self.out, "{}", token).ok();
        // Flush immediately so each fragment appears as it arrives
        self.out.flush().ok();
    }

    fn render_done(&mut self) {
        writeln!(self.out).ok();
        self.out.flush().ok();
    }

    fn render_error(&mut self, err: &str) {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(render: impl FnOnce(&mut StdoutRenderer<Vec<u8>>)) -> String {
        let mut renderer = StdoutRenderer::with_writer(Vec::new());
        render(&mut renderer);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_single_turn_transcript() {
        let out = rendered(|r| {
            r.user_message("Plan me a day trip.");
            r.agent_label("TravelAgent");
            r.render_token("How about ");
            r.render_token("Tokyo, Japan");
            r.render_token("?");
            r.render_done();
        });
        assert_eq!(
            out,
            "# User: Plan me a day trip.\n\n# TravelAgent: How about Tokyo, Japan?\n"
        );
    }

    #[test]
    fn test_errors_stay_out_of_transcript() {
        let out = rendered(|r| {
            r.user_message("Hello?");
            r.render_error("streaming error: connection reset");
        });
        assert_eq!(out, "# User: Hello?\n\n");
    }
}
