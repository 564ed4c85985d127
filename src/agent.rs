//! Conversation driver.
//!
//! [`ConversationDriver`] walks a fixed list of user messages through a
//! [`ChatTransport`], streams each reply to a [`Renderer`], and threads the
//! conversation handle from one turn to the next. The transport owns model
//! invocation and tool calling; this module only sequences turns.
//!
//! State machine: `Idle → Sending → Streaming → (Sending | Done)`.

use anyhow::Result;
use futures::StreamExt;

use crate::output::Renderer;
use crate::provider::{ChatTransport, ThreadHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Nothing sent yet.
    Idle,
    /// A user message is being submitted.
    Sending,
    /// Reply fragments are arriving.
    Streaming,
    /// Terminal. The handle, if any, has been released.
    Done,
}

pub struct ConversationDriver<'a> {
    transport: &'a dyn ChatTransport,
    renderer: &'a mut dyn Renderer,
    state: DriverState,
    thread: Option<ThreadHandle>,
    transitions: Vec<DriverState>,
}

impl<'a> ConversationDriver<'a> {
    pub fn new(transport: &'a dyn ChatTransport, renderer: &'a mut dyn Renderer) -> Self {
        Self {
            transport,
            renderer,
            state: DriverState::Idle,
            thread: None,
            transitions: Vec::new(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Every state entered so far, in order, not counting the initial `Idle`.
    #[cfg(test)]
    pub fn transitions(&self) -> &[DriverState] {
        &self.transitions
    }

    /// Sends each message in order and streams the replies.
    ///
    /// The conversation handle is released exactly once at the end, if one
    /// was ever obtained. Transport errors are not retried: the held handle is
    /// still released, then the error is returned.
    ///
    /// # Errors
    ///
    /// Fails if the driver already ran, or on any transport error.
    pub async fn run(&mut self, messages: &[String]) -> Result<()> {
        anyhow::ensure!(
            self.state == DriverState::Idle,
            "conversation driver already ran (state: {:?})",
            self.state
        );

        let outcome = self.drive(messages).await;
        let released = self.finish().await;

        match (outcome, released) {
            (Ok(()), released) => released,
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(release_err)) => {
                tracing::warn!(error = %release_err, "failed to release conversation thread");
                Err(err)
            }
        }
    }

    async fn drive(&mut self, messages: &[String]) -> Result<()> {
        for message in messages {
            self.turn(message).await?;
        }
        Ok(())
    }

    async fn turn(&mut self, message: &str) -> Result<()> {
        self.transition(DriverState::Sending);
        self.renderer.user_message(message);

        let transport = self.transport;
        let mut stream = transport.send(message, self.thread);
        self.transition(DriverState::Streaming);

        let mut first_fragment = true;
        while let Some(fragment) = stream.next().await {
            let fragment = match fragment {
                Ok(fragment) => fragment,
                Err(err) => {
                    self.renderer.render_error(&err.to_string());
                    return Err(err);
                }
            };
            if first_fragment {
                self.renderer.agent_label(&fragment.author);
                first_fragment = false;
            }
            self.renderer.render_token(&fragment.text);
            self.thread = Some(fragment.thread);
        }
        self.renderer.render_done();
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.transition(DriverState::Done);
        tracing::debug!(transitions = ?self.transitions, "conversation done");
        match self.thread.take() {
            Some(thread) => {
                tracing::debug!(thread = %thread, "releasing conversation thread");
                self.transport.release(thread).await
            }
            None => Ok(()),
        }
    }

    fn transition(&mut self, next: DriverState) {
        tracing::debug!(from = ?self.state, to = ?next, "driver transition");
        self.state = next;
        self.transitions.push(next);
    }
}
