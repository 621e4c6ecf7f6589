// reqwest implementation of the gateway traits.
//
// One `GatewayClient` talks to one base URL. The courtroom endpoints and the
// debate-room/chatbot endpoints live on different backends, so the binary
// builds two clients from the same config.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use sentinel_core::config::GatewayConfig;
use sentinel_core::protocol::{
    ChatRequest, ChatResponse, Envelope, ErrorBody, FeedbackRequest, JudgeResponse, Judgment,
    Message, OpenDebateRequest, OpenDebateResponse, ReplyResponse, RoundResponse,
    StartDebateRequest, StartDebateResponse, SummaryResponse, TranscriptRequest,
};

use crate::api::{ArenaApi, ChatApi, CourtroomApi, Reply};
use crate::error::GatewayError;

// ---------------------------------------------------------------------------
// GatewayClient
// ---------------------------------------------------------------------------

/// JSON-over-HTTP client bound to one gateway base URL.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a client for `base_url` whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Client for the courtroom backend described by `config`.
    pub fn courtroom(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Self::new(config.courtroom_url.clone(), config.request_timeout())
    }

    /// Client for the debate-room and chatbot backend described by `config`.
    pub fn arena(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Self::new(config.arena_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        debug!(path, "GET");
        let response = self.http.get(self.url(path)).query(query).send().await?;
        decode(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(path, "POST");
        let response = self.http.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }

    /// POST where any 2xx counts as acknowledgement and the body is ignored.
    async fn post_ack<B>(&self, path: &str, body: &B) -> Result<(), GatewayError>
    where
        B: Serialize + ?Sized + Sync,
    {
        debug!(path, "POST");
        let response = self.http.post(self.url(path)).json(body).send().await?;
        read_body(response).await.map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Read the full body, turning non-2xx statuses into `GatewayError::Status`
/// with the body's `error` field when it has one.
async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, GatewayError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|body| body.error);
        return Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(bytes.to_vec())
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let bytes = read_body(response).await?;
    serde_json::from_slice(&bytes).map_err(|e| GatewayError::Malformed(e.to_string()))
}

/// Turn a `success: false` body into `GatewayError::Rejected`.
fn require_success<T: Envelope>(body: T, fallback: &str) -> Result<T, GatewayError> {
    if body.succeeded() {
        Ok(body)
    } else {
        let message = body.error_message().unwrap_or(fallback).to_string();
        Err(GatewayError::Rejected(message))
    }
}

fn missing(field: &str) -> GatewayError {
    GatewayError::Malformed(format!("response missing `{field}`"))
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl CourtroomApi for GatewayClient {
    async fn start_debate(&self, topic: &str) -> Result<String, GatewayError> {
        let body: StartDebateResponse = self
            .post_json("/api/start_debate", &StartDebateRequest { topic })
            .await?;
        body.session_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| missing("session_id"))
    }

    async fn get_round(&self, session_id: &str) -> Result<RoundResponse, GatewayError> {
        self.get_json("/api/get_round", &[("session_id", session_id)])
            .await
    }

    async fn submit_feedback(
        &self,
        session_id: &str,
        feedback: &str,
    ) -> Result<(), GatewayError> {
        self.post_ack(
            "/api/submit_feedback",
            &FeedbackRequest {
                session_id,
                feedback,
            },
        )
        .await
    }

    async fn get_summary(&self, session_id: &str) -> Result<Option<String>, GatewayError> {
        let body: SummaryResponse = self
            .get_json("/api/get_summary", &[("session_id", session_id)])
            .await?;
        Ok(body.summary.filter(|s| !s.is_empty()))
    }
}

#[async_trait]
impl ArenaApi for GatewayClient {
    async fn open_debate(&self, topic: &str) -> Result<String, GatewayError> {
        let body: OpenDebateResponse = self
            .post_json("/api/debate/start", &OpenDebateRequest { topic })
            .await?;
        let body = require_success(body, "Failed to start debate")?;
        body.opening_statement
            .ok_or_else(|| missing("opening_statement"))
    }

    async fn respond(&self, topic: &str, messages: &[Message]) -> Result<Reply, GatewayError> {
        let body: ReplyResponse = self
            .post_json("/api/debate/respond", &TranscriptRequest { topic, messages })
            .await?;
        let body = require_success(body, "Failed to get AI response")?;
        let text = body.response.ok_or_else(|| missing("response"))?;
        Ok(Reply {
            text,
            fact_checks: body.fact_checks,
        })
    }

    async fn judge(&self, topic: &str, messages: &[Message]) -> Result<Judgment, GatewayError> {
        let body: JudgeResponse = self
            .post_json("/api/debate/judge", &TranscriptRequest { topic, messages })
            .await?;
        let body = require_success(body, "Failed to judge debate")?;
        body.judgment.ok_or_else(|| missing("judgment"))
    }
}

#[async_trait]
impl ChatApi for GatewayClient {
    async fn send_chat(&self, messages: &[Message]) -> Result<Message, GatewayError> {
        let body: ChatResponse = self
            .post_json("/api/chatbot/message", &ChatRequest { messages })
            .await?;
        let body = require_success(body, "Unknown error")?;
        body.response.ok_or_else(|| missing("response"))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
