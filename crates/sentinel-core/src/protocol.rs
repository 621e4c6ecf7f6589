// Wire types exchanged with the debate gateway, plus the transcript
// `Message` they carry.
//
// Response bodies are deserialized leniently (missing fields become `None`
// or defaults); deciding which missing field is fatal is the gateway
// client's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Transcript messages
// ---------------------------------------------------------------------------

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// The AI opponent / assistant.
    Assistant,
    System,
    Judge,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Opponent",
            Role::System => "System",
            Role::Judge => "Judge",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Chatbot replies arrive without a timestamp; they are stamped on receipt.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Success envelope
// ---------------------------------------------------------------------------

/// Responses that report application-level success in their body.
pub trait Envelope {
    fn succeeded(&self) -> bool;
    fn error_message(&self) -> Option<&str>;
}

macro_rules! impl_envelope {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Envelope for $ty {
                fn succeeded(&self) -> bool {
                    self.success
                }
                fn error_message(&self) -> Option<&str> {
                    self.error.as_deref()
                }
            }
        )*
    };
}

/// Error body returned alongside non-2xx statuses (`{"error": "..."}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Courtroom (polling debate) endpoints
// ---------------------------------------------------------------------------

/// `POST /api/start_debate`
#[derive(Debug, Serialize)]
pub struct StartDebateRequest<'a> {
    pub topic: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartDebateResponse {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// `GET /api/get_round?session_id=...`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RoundResponse {
    #[serde(default)]
    pub pro_argument: Option<String>,
    #[serde(default)]
    pub con_argument: Option<String>,
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// `POST /api/submit_feedback`
#[derive(Debug, Serialize)]
pub struct FeedbackRequest<'a> {
    pub session_id: &'a str,
    pub feedback: &'a str,
}

/// `GET /api/get_summary?session_id=...`
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: Option<String>,
}

// ---------------------------------------------------------------------------
// Debate room endpoints
// ---------------------------------------------------------------------------

/// `POST /api/debate/start`
#[derive(Debug, Serialize)]
pub struct OpenDebateRequest<'a> {
    pub topic: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenDebateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub opening_statement: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body shared by `POST /api/debate/respond` and `POST /api/debate/judge`.
#[derive(Debug, Serialize)]
pub struct TranscriptRequest<'a> {
    pub topic: &'a str,
    pub messages: &'a [Message],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub fact_checks: Vec<FactCheck>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Verification of one factual claim found in the user's argument.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FactCheck {
    pub claim: String,
    pub status: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub sources: Vec<FactSource>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FactSource {
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JudgeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub judgment: Option<Judgment>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Judgment {
    pub reasoning: String,
    pub user_score: u32,
    pub ai_score: u32,
    pub winner: Winner,
    #[serde(default)]
    pub improvements: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    User,
    Ai,
    #[serde(other)]
    Tie,
}

impl Winner {
    pub fn label(self) -> &'static str {
        match self {
            Winner::User => "You win",
            Winner::Ai => "AI wins",
            Winner::Tie => "Tie",
        }
    }
}

// ---------------------------------------------------------------------------
// Chatbot endpoint
// ---------------------------------------------------------------------------

/// `POST /api/chatbot/message`
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub messages: &'a [Message],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<Message>,
    #[serde(default)]
    pub error: Option<String>,
}

impl_envelope!(OpenDebateResponse, ReplyResponse, JudgeResponse, ChatResponse);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
