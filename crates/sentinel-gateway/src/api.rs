// Async traits over the gateway endpoints.
//
// Sessions hold these as `Arc<dyn ...>` so tests can substitute scripted
// fakes for the HTTP client.

use async_trait::async_trait;
use sentinel_core::protocol::{FactCheck, Judgment, Message, RoundResponse};

use crate::error::GatewayError;

/// Endpoints of the polling ("courtroom") debate backend.
#[async_trait]
pub trait CourtroomApi: Send + Sync {
    /// `POST /api/start_debate`; returns the new session id.
    async fn start_debate(&self, topic: &str) -> Result<String, GatewayError>;

    /// `GET /api/get_round`
    async fn get_round(&self, session_id: &str) -> Result<RoundResponse, GatewayError>;

    /// `POST /api/submit_feedback`
    async fn submit_feedback(&self, session_id: &str, feedback: &str)
        -> Result<(), GatewayError>;

    /// `GET /api/get_summary`; `None` when the body carries no summary.
    async fn get_summary(&self, session_id: &str) -> Result<Option<String>, GatewayError>;
}

/// The opponent's reply to one user argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub fact_checks: Vec<FactCheck>,
}

/// Endpoints of the timed debate-room backend.
#[async_trait]
pub trait ArenaApi: Send + Sync {
    /// `POST /api/debate/start`; returns the opening statement.
    async fn open_debate(&self, topic: &str) -> Result<String, GatewayError>;

    /// `POST /api/debate/respond`
    async fn respond(&self, topic: &str, messages: &[Message]) -> Result<Reply, GatewayError>;

    /// `POST /api/debate/judge`
    async fn judge(&self, topic: &str, messages: &[Message]) -> Result<Judgment, GatewayError>;
}

/// The Sentinel AI chatbot endpoint.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// `POST /api/chatbot/message`; returns the assistant's message.
    async fn send_chat(&self, messages: &[Message]) -> Result<Message, GatewayError>;
}
