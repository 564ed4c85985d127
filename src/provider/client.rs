//! rig-core backed chat transport.
//!
//! [`Provider`] wraps rig-core's OpenAI-compatible client. Each turn builds a
//! fresh agent carrying the system instructions and the registered tools, and
//! lets rig-core's multi-turn streaming run tool calls before the final reply
//! text arrives. Thread histories live in memory, keyed by thread id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use async_stream::try_stream;
use futures::{Stream, StreamExt};
use rig::agent::MultiTurnStreamItem;
use rig::client::CompletionClient;
use rig::message::{Message as RigMessage, Text};
use rig::providers::openai;
use rig::streaming::{StreamedAssistantContent, StreamingChat};
use uuid::Uuid;

use super::thread::{ChatTransport, Fragment, FragmentStream, ThreadHandle, TransportError};
use crate::config::Config;
use crate::message::Message;
use crate::tools::ToolRegistry;

/// A configured chat model ready to stream replies.
pub struct Provider {
    client: openai::CompletionsClient,
    model: String,
    agent_name: String,
    instructions: String,
    max_turns: usize,
    tools: Arc<ToolRegistry>,
    threads: Mutex<HashMap<Uuid, Vec<Message>>>,
}

impl Provider {
    /// Creates a new [`Provider`] from the loaded application config.
    ///
    /// Requests go to the Chat Completions endpoint (`{base_url}/chat/completions`),
    /// the one OpenAI-compatible hosts such as GitHub Models serve.
    ///
    /// The credential is passed through untouched; an invalid token only
    /// surfaces once the first request is rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if client construction fails.
    pub fn from_config(config: &Config, tools: Arc<ToolRegistry>) -> Result<Self> {
        let client = openai::Client::builder()
            .api_key(config.token.as_str())
            .base_url(config.base_url.clone())
            .build()
            .context("Failed to create chat client")?
            .completions_api();
        tracing::debug!(
            model = %config.model,
            base_url = %config.base_url,
            tools = tools.len(),
            "created chat provider"
        );
        Ok(Self {
            client,
            model: config.model.clone(),
            agent_name: config.agent_name.clone(),
            instructions: config.instructions.clone(),
            max_turns: config.max_turns,
            tools,
            threads: Mutex::new(HashMap::new()),
        })
    }

    fn open_thread(&self) -> ThreadHandle {
        let handle = ThreadHandle::open();
        self.threads().insert(handle.id(), Vec::new());
        tracing::debug!(thread = %handle, "opened conversation thread");
        handle
    }

    /// Prior turns of `thread` in rig-core's message format.
    fn history(&self, thread: &ThreadHandle) -> Result<Vec<RigMessage>, TransportError> {
        let threads = self.threads();
        let messages = threads
            .get(&thread.id())
            .ok_or(TransportError::UnknownThread(thread.id()))?;
        Ok(messages.iter().map(RigMessage::from).collect())
    }

    /// Records a finished turn on `thread`.
    fn commit(
        &self,
        thread: &ThreadHandle,
        user: &str,
        reply: String,
    ) -> Result<(), TransportError> {
        let mut threads = self.threads();
        let messages = threads
            .get_mut(&thread.id())
            .ok_or(TransportError::UnknownThread(thread.id()))?;
        messages.push(Message::user(user));
        messages.push(Message::assistant(reply));
        Ok(())
    }

    /// Settles the thread store once a turn ends.
    ///
    /// A thread this turn opened is dropped if no fragment ever reached the
    /// caller. An empty reply leaves an existing thread untouched.
    fn finish_turn(
        &self,
        thread: &ThreadHandle,
        opened: bool,
        yielded: bool,
        user: &str,
        reply: String,
    ) -> Result<(), TransportError> {
        if opened && !yielded {
            self.discard(thread);
            return Ok(());
        }
        if reply.is_empty() {
            return Ok(());
        }
        self.commit(thread, user, reply)
    }

    fn discard(&self, thread: &ThreadHandle) {
        self.threads().remove(&thread.id());
        tracing::debug!(thread = %thread, "discarded thread with no reply");
    }

    fn threads(&self) -> MutexGuard<'_, HashMap<Uuid, Vec<Message>>> {
        self.threads.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Streams one reply, yielding a fragment per text chunk.
    ///
    /// Tool calls and tool results are consumed by rig-core and only logged
    /// here. A thread opened by this turn that never produced a fragment is
    /// dropped, whether the stream ended or failed, since no caller ever saw
    /// its handle.
    fn fragments<'a>(
        &'a self,
        message: &'a str,
        thread: Option<ThreadHandle>,
    ) -> impl Stream<Item = Result<Fragment>> + 'a {
        try_stream! {
            let opened = thread.is_none();
            let mut handle = match thread {
                Some(handle) => handle,
                None => self.open_thread(),
            };
            let history = self.history(&handle)?;

            let agent = self
                .client
                .agent(&self.model)
                .preamble(&self.instructions)
                .max_tokens(crate::constants::MAX_TOKENS)
                .tools(self.tools.to_rig_tools())
                .build();
            let mut stream = agent
                .stream_chat(message.to_string(), history)
                .multi_turn(self.max_turns)
                .await;

            let mut reply = String::new();
            let mut yielded = false;
            while let Some(item) = stream.next().await {
                let item = match item {
                    Ok(item) => item,
                    Err(err) => {
                        if opened && !yielded {
                            self.discard(&handle);
                        }
                        Err(TransportError::Stream(err.to_string()))?
                    }
                };
                match item {
                    MultiTurnStreamItem::StreamAssistantItem(StreamedAssistantContent::Text(
                        Text { text },
                    )) => {
                        reply.push_str(&text);
                        handle = handle.advance();
                        yielded = true;
                        yield Fragment {
                            author: self.agent_name.clone(),
                            text,
                            thread: handle,
                        };
                    }
                    MultiTurnStreamItem::StreamAssistantItem(
                        StreamedAssistantContent::ToolCall { tool_call, .. },
                    ) => {
                        tracing::debug!(tool = %tool_call.function.name, "model requested tool call");
                    }
                    _ => {
                        // Tool results, reasoning, and the final response summary.
                    }
                }
            }

            self.finish_turn(&handle, opened, yielded, message, reply)?;
        }
    }
}

#[async_trait::async_trait(?Send)]
impl ChatTransport for Provider {
    fn send<'a>(&'a self, message: &'a str, thread: Option<ThreadHandle>) -> FragmentStream<'a> {
        Box::pin(self.fragments(message, thread))
    }

    async fn release(&self, thread: ThreadHandle) -> Result<()> {
        let removed = self.threads().remove(&thread.id());
        match removed {
            Some(history) => {
                tracing::debug!(
                    thread = %thread,
                    messages = history.len(),
                    "released conversation thread"
                );
                Ok(())
            }
            None => Err(TransportError::UnknownThread(thread.id()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destinations::DestinationPicker;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    fn provider() -> Provider {
        provider_at("http://127.0.0.1:9")
    }

    fn provider_at(base_url: &str) -> Provider {
        let config = Config::from_lookup(|var| match var {
            crate::constants::TOKEN_ENV => Some("test-token".to_string()),
            crate::constants::BASE_URL_ENV => Some(base_url.to_string()),
            _ => None,
        })
        .unwrap();
        let picker = Arc::new(DestinationPicker::with_default_catalog());
        let tools = Arc::new(ToolRegistry::with_destinations(picker).unwrap());
        Provider::from_config(&config, tools).unwrap()
    }

    /// Accepts one HTTP request, answers it with a 500, and returns the
    /// request line it saw.
    fn failing_server() -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let server = std::thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(socket.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0;
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
                if let Some(value) = header.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).ok();

            let reply = r#"{"error":{"message":"upstream unavailable"}}"#;
            write!(
                socket,
                "HTTP/1.1 500 Internal Server Error\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{}",
                reply.len(),
                reply
            )
            .unwrap();
            socket.flush().ok();
            request_line.trim_end().to_string()
        });
        (base_url, server)
    }

    #[test]
    fn test_from_config_copies_settings() {
        let provider = provider();
        assert_eq!(provider.model, crate::constants::DEFAULT_MODEL);
        assert_eq!(provider.agent_name, crate::constants::DEFAULT_AGENT_NAME);
        assert_eq!(provider.max_turns, crate::constants::DEFAULT_MAX_TURNS);
        assert_eq!(provider.tools.len(), 1);
    }

    #[test]
    fn test_commit_extends_history() {
        let provider = provider();
        let handle = provider.open_thread();
        assert!(provider.history(&handle).unwrap().is_empty());
        provider
            .commit(&handle, "Plan me a day trip.", "Off to Cairo!".to_string())
            .unwrap();
        // A later revision still addresses the same thread.
        assert_eq!(provider.history(&handle.advance()).unwrap().len(), 2);
        let threads = provider.threads();
        let stored = &threads[&handle.id()];
        assert_eq!(stored[0], Message::user("Plan me a day trip."));
        assert_eq!(stored[1], Message::assistant("Off to Cairo!"));
    }

    #[test]
    fn test_discard_forgets_thread() {
        let provider = provider();
        let handle = provider.open_thread();
        provider.discard(&handle);
        assert!(matches!(
            provider.history(&handle),
            Err(TransportError::UnknownThread(id)) if id == handle.id()
        ));
    }

    #[tokio::test]
    async fn test_release_removes_thread_once() {
        let provider = provider();
        let handle = provider.open_thread().advance();
        provider.release(handle).await.unwrap();
        assert!(provider.threads().is_empty());

        let err = provider.release(handle).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TransportError>(),
            Some(TransportError::UnknownThread(_))
        ));
    }

    #[test]
    fn test_empty_reply_leaves_existing_thread_unchanged() {
        let provider = provider();
        let handle = provider.open_thread();
        provider
            .commit(&handle, "Plan me a day trip.", "Off to Cairo!".to_string())
            .unwrap();

        provider
            .finish_turn(&handle.advance(), false, false, "Somewhere else?", String::new())
            .unwrap();

        let threads = provider.threads();
        let stored = &threads[&handle.id()];
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|m| !m.content.is_empty()));
    }

    #[test]
    fn test_finish_turn_drops_unseen_thread() {
        let provider = provider();
        let handle = provider.open_thread();
        provider
            .finish_turn(&handle, true, false, "Hello?", String::new())
            .unwrap();
        assert!(provider.threads().is_empty());
    }

    #[test]
    fn test_finish_turn_records_reply() {
        let provider = provider();
        let handle = provider.open_thread();
        provider
            .finish_turn(&handle, true, true, "Hello?", "Try Lisbon.".to_string())
            .unwrap();
        assert_eq!(provider.threads()[&handle.id()].len(), 2);
    }

    #[tokio::test]
    async fn test_send_posts_to_chat_completions() {
        let (base_url, server) = failing_server();
        let provider = provider_at(&base_url);

        let mut stream = provider.send("Plan me a day trip.", None);
        let first = stream.next().await;
        drop(stream);

        let request_line = server.join().unwrap();
        assert!(
            request_line.starts_with("POST /chat/completions "),
            "unexpected request: {request_line}"
        );
        assert!(matches!(first, Some(Err(_))));
    }

    #[tokio::test]
    async fn test_failed_first_turn_leaves_no_thread() {
        let (base_url, server) = failing_server();
        let provider = provider_at(&base_url);

        let mut stream = provider.send("Plan me a day trip.", None);
        let first = stream.next().await;
        drop(stream);
        server.join().unwrap();

        assert!(matches!(first, Some(Err(_))));
        assert!(provider.threads().is_empty());
    }

    #[tokio::test]
    async fn test_send_on_unknown_thread_fails_before_any_request() {
        let provider = provider();
        let mut stream = provider.send("hello", Some(ThreadHandle::open()));
        let first = stream.next().await.unwrap();
        assert!(first.is_err());
        assert!(stream.next().await.is_none());
    }
}
