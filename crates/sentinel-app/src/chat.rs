// Sentinel AI assistant chat.

use std::sync::Arc;

use sentinel_core::protocol::{Message, Role};
use sentinel_core::transcript::Transcript;
use sentinel_gateway::{ChatApi, GatewayError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::events::ChatSnapshot;

pub const GREETING: &str = "Hello! I am Sentinel AI. Ask me anything about misinformation, fact-checking, or how to evaluate sources.";

/// Shown when the assistant reported `success: false`.
pub const REJECTED_REPLY: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

/// Shown when the request itself failed.
pub const FAILED_REPLY: &str = "Sorry, I encountered an error. Please try again later.";

#[derive(Debug)]
pub struct ChatEvent {
    pub generation: u64,
    pub result: Result<Message, GatewayError>,
}

pub struct ChatSession {
    api: Arc<dyn ChatApi>,
    events: mpsc::Sender<ChatEvent>,
    transcript: Transcript,
    generation: u64,
    request: Option<JoinHandle<()>>,
}

impl ChatSession {
    pub fn new(api: Arc<dyn ChatApi>, events: mpsc::Sender<ChatEvent>) -> Self {
        let mut transcript = Transcript::new();
        transcript.push(Role::Assistant, GREETING);
        ChatSession {
            api,
            events,
            transcript,
            generation: 0,
            request: None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_sending(&self) -> bool {
        self.request.is_some()
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            messages: self.transcript.messages().to_vec(),
            sending: self.is_sending(),
        }
    }

    pub fn send(&mut self, text: &str) -> Result<(), SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if self.is_sending() {
            return Err(SessionError::Busy);
        }

        self.transcript.push(Role::User, text);

        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let generation = self.generation;
        let history = self.transcript.messages().to_vec();
        self.request = Some(tokio::spawn(async move {
            let result = api.send_chat(&history).await;
            let _ = tx.send(ChatEvent { generation, result }).await;
        }));
        Ok(())
    }

    /// Drop the conversation and start over from the greeting.
    pub fn clear(&mut self) {
        self.cancel_tasks();
        self.generation += 1;
        self.transcript.clear();
        self.transcript.push(Role::Assistant, GREETING);
    }

    pub fn cancel_tasks(&mut self) {
        if let Some(handle) = self.request.take() {
            handle.abort();
        }
    }

    pub fn handle_event(&mut self, event: ChatEvent) -> bool {
        if event.generation != self.generation {
            debug!(
                "Discarding stale chat reply (event gen: {}, current gen: {})",
                event.generation, self.generation
            );
            return false;
        }
        self.request = None;

        match event.result {
            Ok(reply) => self.transcript.push_message(reply),
            Err(GatewayError::Rejected(reason)) => {
                warn!("Assistant rejected the message: {}", reason);
                self.transcript.push(Role::Assistant, REJECTED_REPLY);
            }
            Err(e) => {
                warn!("Chat request failed: {}", e);
                self.transcript.push(Role::Assistant, FAILED_REPLY);
            }
        }
        true
    }
}
