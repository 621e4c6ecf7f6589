// Scripted in-memory gateways for session tests.
//
// Each fake pops one pre-loaded result per call and records the call so tests
// can assert on exactly which requests were made. An exhausted script answers
// with a non-transient error so a forgotten response never loops a retry.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use sentinel_core::protocol::{Judgment, Message, Role, RoundResponse, Winner};
use sentinel_gateway::{ArenaApi, ChatApi, CourtroomApi, GatewayError, Reply};

fn exhausted<T>() -> Result<T, GatewayError> {
    Err(GatewayError::Malformed("no scripted response".into()))
}

fn pop<T>(queue: &Mutex<VecDeque<Result<T, GatewayError>>>) -> Result<T, GatewayError> {
    queue.lock().unwrap().pop_front().unwrap_or_else(exhausted)
}

pub fn transport() -> GatewayError {
    GatewayError::Transport("connection refused".into())
}

pub fn server_error() -> GatewayError {
    GatewayError::Status {
        status: 500,
        message: Some("boom".into()),
    }
}

pub fn round(pro: &str, con: &str, number: u32, completed: bool) -> RoundResponse {
    RoundResponse {
        pro_argument: Some(pro.into()),
        con_argument: Some(con.into()),
        round: Some(number),
        completed: Some(completed),
    }
}

pub fn judgment() -> Judgment {
    Judgment {
        reasoning: "The human cited stronger evidence.".into(),
        user_score: 78,
        ai_score: 71,
        winner: Winner::User,
        improvements: "Tighten the conclusion.".into(),
    }
}

// ---------------------------------------------------------------------------
// Courtroom
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ScriptedCourtroom {
    pub starts: Mutex<VecDeque<Result<String, GatewayError>>>,
    pub rounds: Mutex<VecDeque<Result<RoundResponse, GatewayError>>>,
    pub feedback: Mutex<VecDeque<Result<(), GatewayError>>>,
    pub summaries: Mutex<VecDeque<Result<Option<String>, GatewayError>>>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedCourtroom {
    pub fn push_start(&self, result: Result<String, GatewayError>) {
        self.starts.lock().unwrap().push_back(result);
    }

    pub fn push_round(&self, result: Result<RoundResponse, GatewayError>) {
        self.rounds.lock().unwrap().push_back(result);
    }

    pub fn push_feedback(&self, result: Result<(), GatewayError>) {
        self.feedback.lock().unwrap().push_back(result);
    }

    pub fn push_summary(&self, result: Result<Option<String>, GatewayError>) {
        self.summaries.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CourtroomApi for ScriptedCourtroom {
    async fn start_debate(&self, topic: &str) -> Result<String, GatewayError> {
        self.record(format!("start:{topic}"));
        pop(&self.starts)
    }

    async fn get_round(&self, session_id: &str) -> Result<RoundResponse, GatewayError> {
        self.record(format!("round:{session_id}"));
        pop(&self.rounds)
    }

    async fn submit_feedback(
        &self,
        session_id: &str,
        feedback: &str,
    ) -> Result<(), GatewayError> {
        self.record(format!("feedback:{session_id}:{feedback}"));
        pop(&self.feedback)
    }

    async fn get_summary(&self, session_id: &str) -> Result<Option<String>, GatewayError> {
        self.record(format!("summary:{session_id}"));
        pop(&self.summaries)
    }
}

// ---------------------------------------------------------------------------
// Debate room
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ScriptedArena {
    pub openings: Mutex<VecDeque<Result<String, GatewayError>>>,
    pub replies: Mutex<VecDeque<Result<Reply, GatewayError>>>,
    pub judgments: Mutex<VecDeque<Result<Judgment, GatewayError>>>,
    /// Transcript length seen by each respond/judge call.
    pub seen: Mutex<Vec<(String, usize)>>,
}

impl ScriptedArena {
    pub fn push_opening(&self, result: Result<String, GatewayError>) {
        self.openings.lock().unwrap().push_back(result);
    }

    pub fn push_reply(&self, result: Result<Reply, GatewayError>) {
        self.replies.lock().unwrap().push_back(result);
    }

    pub fn push_judgment(&self, result: Result<Judgment, GatewayError>) {
        self.judgments.lock().unwrap().push_back(result);
    }

    pub fn count(&self, call: &str) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == call)
            .count()
    }

    fn record(&self, call: &str, messages: &[Message]) {
        self.seen
            .lock()
            .unwrap()
            .push((call.to_string(), messages.len()));
    }
}

#[async_trait]
impl ArenaApi for ScriptedArena {
    async fn open_debate(&self, _topic: &str) -> Result<String, GatewayError> {
        self.record("open", &[]);
        pop(&self.openings)
    }

    async fn respond(&self, _topic: &str, messages: &[Message]) -> Result<Reply, GatewayError> {
        self.record("respond", messages);
        pop(&self.replies)
    }

    async fn judge(&self, _topic: &str, messages: &[Message]) -> Result<Judgment, GatewayError> {
        self.record("judge", messages);
        pop(&self.judgments)
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ScriptedChat {
    pub replies: Mutex<VecDeque<Result<Message, GatewayError>>>,
    pub history_lengths: Mutex<Vec<usize>>,
}

impl ScriptedChat {
    pub fn push_reply(&self, result: Result<&str, GatewayError>) {
        let result = result.map(|text| Message::new(Role::Assistant, text));
        self.replies.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl ChatApi for ScriptedChat {
    async fn send_chat(&self, messages: &[Message]) -> Result<Message, GatewayError> {
        self.history_lengths.lock().unwrap().push(messages.len());
        pop(&self.replies)
    }
}
