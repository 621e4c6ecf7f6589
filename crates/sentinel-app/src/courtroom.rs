// Polling ("courtroom") debate session.
//
// The session owns all local state for one debate and is mutated only by the
// application loop. Network calls run as spawned tasks that report back over
// the session's event channel; every event carries the generation it was
// spawned under so responses that outlive a reset are dropped.

use std::sync::Arc;
use std::time::Duration;

use sentinel_core::config::TimingConfig;
use sentinel_core::format::{format_arguments, points_or_placeholder};
use sentinel_core::protocol::{Role, RoundResponse};
use sentinel_core::transcript::Transcript;
use sentinel_gateway::{CourtroomApi, GatewayError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::events::CourtroomSnapshot;

/// Shown in place of a summary the gateway did not provide.
pub const NO_SUMMARY: &str = "No summary available";

// ---------------------------------------------------------------------------
// Status and events
// ---------------------------------------------------------------------------

/// Lifecycle of one courtroom debate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Collecting a topic.
    #[default]
    Idle,
    /// Session creation in flight.
    Starting,
    /// Waiting for the next round (scheduled poll, poll or feedback in flight).
    AwaitingRound,
    /// Arguments are on screen and feedback is accepted.
    RoundReady,
    /// The gateway declared the debate finished.
    Completed,
    /// A non-retryable failure; `error` says why.
    Errored,
}

impl SessionStatus {
    pub fn label(self) -> &'static str {
        match self {
            SessionStatus::Idle => "Idle",
            SessionStatus::Starting => "Starting",
            SessionStatus::AwaitingRound => "Awaiting round",
            SessionStatus::RoundReady => "Round ready",
            SessionStatus::Completed => "Completed",
            SessionStatus::Errored => "Error",
        }
    }
}

/// Results of spawned courtroom requests.
#[derive(Debug)]
pub enum CourtroomEvent {
    Started {
        generation: u64,
        result: Result<String, GatewayError>,
    },
    RoundFetched {
        generation: u64,
        session_id: String,
        result: Result<RoundResponse, GatewayError>,
    },
    FeedbackSubmitted {
        generation: u64,
        result: Result<(), GatewayError>,
    },
    SummaryFetched {
        generation: u64,
        result: Result<Option<String>, GatewayError>,
    },
}

impl CourtroomEvent {
    fn generation(&self) -> u64 {
        match self {
            CourtroomEvent::Started { generation, .. }
            | CourtroomEvent::RoundFetched { generation, .. }
            | CourtroomEvent::FeedbackSubmitted { generation, .. }
            | CourtroomEvent::SummaryFetched { generation, .. } => *generation,
        }
    }
}

// ---------------------------------------------------------------------------
// CourtroomSession
// ---------------------------------------------------------------------------

pub struct CourtroomSession {
    api: Arc<dyn CourtroomApi>,
    events: mpsc::Sender<CourtroomEvent>,
    first_poll_delay: Duration,
    poll_retry_delay: Duration,

    status: SessionStatus,
    topic: String,
    session_id: Option<String>,
    round: u32,
    completed: bool,
    pro_points: Vec<String>,
    con_points: Vec<String>,
    summary: Option<String>,
    /// Feedback handed to `submit_feedback` that has not been acknowledged.
    /// Kept after a failed submission so it is not lost.
    feedback: Option<String>,
    error: Option<String>,
    transcript: Transcript,

    /// Bumped on reset; events from older generations are discarded.
    generation: u64,
    /// The one outstanding request or scheduled poll. Replaced, never
    /// duplicated.
    pending: Option<JoinHandle<()>>,
    summary_task: Option<JoinHandle<()>>,
}

impl CourtroomSession {
    pub fn new(
        api: Arc<dyn CourtroomApi>,
        events: mpsc::Sender<CourtroomEvent>,
        timing: &TimingConfig,
    ) -> Self {
        CourtroomSession {
            api,
            events,
            first_poll_delay: timing.first_poll_delay(),
            poll_retry_delay: timing.poll_retry_delay(),
            status: SessionStatus::Idle,
            topic: String::new(),
            session_id: None,
            round: 0,
            completed: false,
            pro_points: Vec::new(),
            con_points: Vec::new(),
            summary: None,
            feedback: None,
            error: None,
            transcript: Transcript::new(),
            generation: 0,
            pending: None,
            summary_task: None,
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn pro_points(&self) -> &[String] {
        &self.pro_points
    }

    pub fn con_points(&self) -> &[String] {
        &self.con_points
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Whether a scheduled poll or request task is outstanding.
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// A topic can be submitted before any session exists.
    pub fn accepts_topic(&self) -> bool {
        self.session_id.is_none()
            && matches!(self.status, SessionStatus::Idle | SessionStatus::Errored)
    }

    pub fn snapshot(&self) -> CourtroomSnapshot {
        CourtroomSnapshot {
            status: self.status,
            topic: self.topic.clone(),
            session_id: self.session_id.clone(),
            round: self.round,
            completed: self.completed,
            pro_points: self.pro_points.clone(),
            con_points: self.con_points.clone(),
            summary: self.summary.clone(),
            summary_pending: self.summary_task.is_some(),
            unsent_feedback: self.feedback.clone(),
            error: self.error.clone(),
            transcript: self.transcript.messages().to_vec(),
            accepts_topic: self.accepts_topic(),
        }
    }

    // -- operations ---------------------------------------------------------

    /// Create a session for `topic`. The first poll is scheduled once the
    /// gateway returns the session id.
    pub fn start(&mut self, topic: &str) -> Result<(), SessionError> {
        let topic = topic.trim();
        if !self.accepts_topic() {
            return Err(SessionError::InvalidState("a debate is in progress"));
        }
        if topic.is_empty() {
            return Err(SessionError::EmptyTopic);
        }

        self.topic = topic.to_string();
        self.error = None;
        self.status = SessionStatus::Starting;
        info!("Starting courtroom debate: {}", self.topic);

        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let generation = self.generation;
        let topic = self.topic.clone();
        self.replace_pending(tokio::spawn(async move {
            let result = api.start_debate(&topic).await;
            let _ = tx.send(CourtroomEvent::Started { generation, result }).await;
        }));
        Ok(())
    }

    /// Send feedback on the current round, then poll for the next one.
    ///
    /// Also accepted from `Errored` while a session is live, so feedback
    /// kept from a failed submission can be resent.
    pub fn submit_feedback(&mut self, text: &str) -> Result<(), SessionError> {
        let Some(session_id) = self.session_id.clone() else {
            return Err(SessionError::NoSession);
        };
        if self.completed {
            return Err(SessionError::DebateCompleted);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        match self.status {
            SessionStatus::RoundReady | SessionStatus::Errored => {}
            SessionStatus::Starting | SessionStatus::AwaitingRound => {
                return Err(SessionError::Busy)
            }
            SessionStatus::Idle | SessionStatus::Completed => {
                return Err(SessionError::InvalidState("no round is on screen"))
            }
        }

        self.feedback = Some(text.to_string());
        self.error = None;
        self.status = SessionStatus::AwaitingRound;
        info!("Submitting feedback for round {}", self.round);

        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let generation = self.generation;
        let feedback = text.to_string();
        self.replace_pending(tokio::spawn(async move {
            let result = api.submit_feedback(&session_id, &feedback).await;
            let _ = tx
                .send(CourtroomEvent::FeedbackSubmitted { generation, result })
                .await;
        }));
        Ok(())
    }

    /// Return to `Idle`, cancelling every outstanding task. Idempotent.
    pub fn reset(&mut self) {
        self.cancel_tasks();
        self.generation += 1;
        self.status = SessionStatus::Idle;
        self.topic.clear();
        self.session_id = None;
        self.round = 0;
        self.completed = false;
        self.pro_points.clear();
        self.con_points.clear();
        self.summary = None;
        self.feedback = None;
        self.error = None;
        self.transcript.clear();
        debug!("Courtroom session reset (gen: {})", self.generation);
    }

    /// Abort the pending poll/request and any summary fetch.
    pub fn cancel_tasks(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        if let Some(handle) = self.summary_task.take() {
            handle.abort();
        }
    }

    // -- event handling -----------------------------------------------------

    /// Apply the result of a spawned request. Returns `false` when the event
    /// was stale and ignored.
    pub fn handle_event(&mut self, event: CourtroomEvent) -> bool {
        if event.generation() != self.generation {
            debug!(
                "Discarding stale courtroom event (event gen: {}, current gen: {})",
                event.generation(),
                self.generation
            );
            return false;
        }

        match event {
            CourtroomEvent::Started { result, .. } => self.on_started(result),
            CourtroomEvent::RoundFetched {
                session_id, result, ..
            } => {
                if self.session_id.as_deref() != Some(session_id.as_str())
                    || self.status != SessionStatus::AwaitingRound
                {
                    debug!("Discarding round for inactive session {}", session_id);
                    return false;
                }
                self.on_round(result)
            }
            CourtroomEvent::FeedbackSubmitted { result, .. } => self.on_feedback(result),
            CourtroomEvent::SummaryFetched { result, .. } => self.on_summary(result),
        }
        true
    }

    fn on_started(&mut self, result: Result<String, GatewayError>) {
        self.pending = None;
        match result {
            Ok(session_id) => {
                info!("Courtroom session created: {}", session_id);
                self.transcript.push(
                    Role::System,
                    format!("Debate started: \"{}\"", self.topic),
                );
                self.session_id = Some(session_id);
                self.status = SessionStatus::AwaitingRound;
                self.schedule_poll(self.first_poll_delay);
            }
            Err(e) => {
                warn!("Failed to start courtroom debate: {}", e);
                self.fail(format!("Error starting debate: {e}"));
            }
        }
    }

    fn on_round(&mut self, result: Result<RoundResponse, GatewayError>) {
        self.pending = None;
        match result {
            Ok(response) => {
                self.pro_points =
                    points_or_placeholder(format_arguments(response.pro_argument.as_deref()));
                self.con_points =
                    points_or_placeholder(format_arguments(response.con_argument.as_deref()));
                self.round = self.round.max(response.round.unwrap_or(1));
                self.error = None;

                if response.completed.unwrap_or(false) {
                    info!("Courtroom debate completed after round {}", self.round);
                    self.completed = true;
                    self.status = SessionStatus::Completed;
                    self.fetch_summary();
                } else {
                    debug!("Round {} ready", self.round);
                    self.status = SessionStatus::RoundReady;
                }
            }
            Err(e) if e.is_transient() => {
                warn!("Round poll failed, retrying: {}", e);
                self.schedule_poll(self.poll_retry_delay);
            }
            Err(e) => {
                warn!("Round poll failed: {}", e);
                self.fail(format!("Error fetching debate round: {e}"));
            }
        }
    }

    fn on_feedback(&mut self, result: Result<(), GatewayError>) {
        self.pending = None;
        match result {
            Ok(()) => {
                if let Some(feedback) = self.feedback.take() {
                    self.transcript.push(Role::User, feedback);
                }
                self.schedule_poll(Duration::ZERO);
            }
            Err(e) => {
                warn!("Feedback submission failed: {}", e);
                self.fail(format!("Error submitting feedback: {e}"));
            }
        }
    }

    fn on_summary(&mut self, result: Result<Option<String>, GatewayError>) {
        self.summary_task = None;
        match result {
            Ok(Some(summary)) => {
                self.transcript.push(Role::Judge, summary.clone());
                self.summary = Some(summary);
            }
            Ok(None) => self.summary = Some(NO_SUMMARY.to_string()),
            Err(e) => warn!("Summary fetch failed (ignored): {}", e),
        }
    }

    // -- internals ----------------------------------------------------------

    fn fail(&mut self, message: String) {
        self.status = SessionStatus::Errored;
        self.error = Some(message);
    }

    fn replace_pending(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.pending.replace(handle) {
            previous.abort();
        }
    }

    /// Poll for the next round after `delay`, replacing any pending task.
    fn schedule_poll(&mut self, delay: Duration) {
        let Some(session_id) = self.session_id.clone() else {
            return;
        };
        self.status = SessionStatus::AwaitingRound;

        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let generation = self.generation;
        self.replace_pending(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let result = api.get_round(&session_id).await;
            let _ = tx
                .send(CourtroomEvent::RoundFetched {
                    generation,
                    session_id,
                    result,
                })
                .await;
        }));
    }

    fn fetch_summary(&mut self) {
        let Some(session_id) = self.session_id.clone() else {
            return;
        };
        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let generation = self.generation;
        if let Some(previous) = self.summary_task.replace(tokio::spawn(async move {
            let result = api.get_summary(&session_id).await;
            let _ = tx
                .send(CourtroomEvent::SummaryFetched { generation, result })
                .await;
        })) {
            previous.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
