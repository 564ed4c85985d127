//! The transport boundary between the conversation driver and the model.
//!
//! A [`ChatTransport`] turns one user message into a lazy stream of
//! [`Fragment`]s. Every fragment carries the newest [`ThreadHandle`], which
//! the caller hands back on the next turn and releases when done.

use std::pin::Pin;

use anyhow::Result;
use futures::Stream;
use thiserror::Error;
use uuid::Uuid;

/// Opaque token for an ongoing conversation.
///
/// The id stays fixed for the life of the thread; the revision moves forward
/// with every fragment, so consecutive handles compare unequal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadHandle {
    id: Uuid,
    revision: u64,
}

impl ThreadHandle {
    /// Starts a new thread at revision zero.
    pub fn open() -> Self {
        Self {
            id: Uuid::new_v4(),
            revision: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    #[cfg(test)]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The same thread, one revision later.
    pub fn advance(self) -> Self {
        Self {
            id: self.id,
            revision: self.revision + 1,
        }
    }
}

impl std::fmt::Display for ThreadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.id, self.revision)
    }
}

/// An incremental piece of a streamed reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Name of the agent producing the reply.
    pub author: String,
    pub text: String,
    /// Handle current after this fragment.
    pub thread: ThreadHandle,
}

/// Finite, ordered, non-restartable sequence of reply fragments.
pub type FragmentStream<'a> = Pin<Box<dyn Stream<Item = Result<Fragment>> + 'a>>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("streaming error: {0}")]
    Stream(String),
    #[error("unknown conversation thread: {0}")]
    UnknownThread(Uuid),
}

/// Sends user messages to a chat model and manages conversation threads.
///
/// Implementations carry the system instructions and tool set; callers only
/// supply the message text and the handle from the previous turn.
#[async_trait::async_trait(?Send)]
pub trait ChatTransport {
    /// Submits `message` on `thread`, opening a new thread when `None`.
    fn send<'a>(&'a self, message: &'a str, thread: Option<ThreadHandle>) -> FragmentStream<'a>;

    /// Drops the thread and everything recorded for it.
    async fn release(&self, thread: ThreadHandle) -> Result<()>;
}
