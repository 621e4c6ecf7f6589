// Timed debate room against an AI opponent.
//
// The room runs a countdown while debating; when it hits zero (or the user
// concedes the remaining time) the transcript goes to the judge exactly once.
// Like the courtroom session, all mutation happens on the application loop
// and spawned tasks report back with the generation they were started under.

use std::sync::Arc;
use std::time::Duration;

use sentinel_core::config::TimingConfig;
use sentinel_core::countdown::{Countdown, Tick};
use sentinel_core::protocol::{FactCheck, Judgment, Role};
use sentinel_core::transcript::Transcript;
use sentinel_gateway::{ArenaApi, GatewayError, Reply};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::events::ArenaSnapshot;

pub const TIME_UP_NOTICE: &str = "TIME UP! The judge is now reviewing the arguments...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArenaPhase {
    #[default]
    TopicSelection,
    /// Opening statement requested.
    Opening,
    Debating,
    /// Waiting for the judge.
    Judging,
    Judged,
}

impl ArenaPhase {
    pub fn label(self) -> &'static str {
        match self {
            ArenaPhase::TopicSelection => "Choose a topic",
            ArenaPhase::Opening => "Opening",
            ArenaPhase::Debating => "Debating",
            ArenaPhase::Judging => "Judging",
            ArenaPhase::Judged => "Judged",
        }
    }
}

#[derive(Debug)]
pub enum ArenaEvent {
    Opened {
        generation: u64,
        result: Result<String, GatewayError>,
    },
    Replied {
        generation: u64,
        result: Result<Reply, GatewayError>,
    },
    Judged {
        generation: u64,
        result: Result<Judgment, GatewayError>,
    },
    Tick {
        generation: u64,
    },
}

impl ArenaEvent {
    fn generation(&self) -> u64 {
        match self {
            ArenaEvent::Opened { generation, .. }
            | ArenaEvent::Replied { generation, .. }
            | ArenaEvent::Judged { generation, .. }
            | ArenaEvent::Tick { generation } => *generation,
        }
    }
}

pub struct ArenaSession {
    api: Arc<dyn ArenaApi>,
    events: mpsc::Sender<ArenaEvent>,
    tick_interval: Duration,

    phase: ArenaPhase,
    topic: String,
    transcript: Transcript,
    countdown: Countdown,
    fact_checks: Vec<FactCheck>,
    judgment: Option<Judgment>,
    error: Option<String>,
    awaiting_reply: bool,

    generation: u64,
    request: Option<JoinHandle<()>>,
    ticker: Option<JoinHandle<()>>,
}

impl ArenaSession {
    pub fn new(
        api: Arc<dyn ArenaApi>,
        events: mpsc::Sender<ArenaEvent>,
        timing: &TimingConfig,
    ) -> Self {
        ArenaSession {
            api,
            events,
            tick_interval: timing.countdown_tick(),
            phase: ArenaPhase::TopicSelection,
            topic: String::new(),
            transcript: Transcript::new(),
            countdown: Countdown::new(timing.debate_duration_secs),
            fact_checks: Vec::new(),
            judgment: None,
            error: None,
            awaiting_reply: false,
            generation: 0,
            request: None,
            ticker: None,
        }
    }

    pub fn phase(&self) -> ArenaPhase {
        self.phase
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn judgment(&self) -> Option<&Judgment> {
        self.judgment.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            phase: self.phase,
            topic: self.topic.clone(),
            remaining_secs: self.countdown.remaining(),
            duration_secs: self.countdown.duration(),
            awaiting_reply: self.awaiting_reply,
            transcript: self.transcript.messages().to_vec(),
            fact_checks: self.fact_checks.clone(),
            judgment: self.judgment.clone(),
            error: self.error.clone(),
        }
    }

    // -- operations ---------------------------------------------------------

    pub fn start(&mut self, topic: &str) -> Result<(), SessionError> {
        if self.phase != ArenaPhase::TopicSelection {
            return Err(SessionError::InvalidState("a debate is in progress"));
        }
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(SessionError::EmptyTopic);
        }

        self.topic = topic.to_string();
        self.error = None;
        self.phase = ArenaPhase::Opening;
        info!("Opening debate room: {}", self.topic);

        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let generation = self.generation;
        let topic = self.topic.clone();
        self.replace_request(tokio::spawn(async move {
            let result = api.open_debate(&topic).await;
            let _ = tx.send(ArenaEvent::Opened { generation, result }).await;
        }));
        Ok(())
    }

    /// Add the user's argument and ask the opponent to reply.
    pub fn send(&mut self, text: &str) -> Result<(), SessionError> {
        if self.phase != ArenaPhase::Debating {
            return Err(SessionError::InvalidState("the debate is not running"));
        }
        if self.awaiting_reply {
            return Err(SessionError::Busy);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        self.transcript.push(Role::User, text);
        self.awaiting_reply = true;

        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let generation = self.generation;
        let topic = self.topic.clone();
        let messages = self.transcript.messages().to_vec();
        self.replace_request(tokio::spawn(async move {
            let result = api.respond(&topic, &messages).await;
            let _ = tx.send(ArenaEvent::Replied { generation, result }).await;
        }));
        Ok(())
    }

    /// Concede the remaining time and go straight to judging.
    pub fn end_now(&mut self) -> Result<(), SessionError> {
        if self.phase != ArenaPhase::Debating {
            return Err(SessionError::InvalidState("the debate is not running"));
        }
        if self.countdown.expire() {
            self.begin_judging();
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.cancel_tasks();
        self.generation += 1;
        self.phase = ArenaPhase::TopicSelection;
        self.topic.clear();
        self.transcript.clear();
        self.countdown.reset();
        self.fact_checks.clear();
        self.judgment = None;
        self.error = None;
        self.awaiting_reply = false;
        debug!("Debate room reset (gen: {})", self.generation);
    }

    pub fn cancel_tasks(&mut self) {
        self.stop_ticker();
        self.countdown.stop();
        if let Some(handle) = self.request.take() {
            handle.abort();
        }
    }

    // -- event handling -----------------------------------------------------

    /// Apply one event. Returns `false` when it was stale or out of phase.
    pub fn handle_event(&mut self, event: ArenaEvent) -> bool {
        if event.generation() != self.generation {
            debug!(
                "Discarding stale debate room event (event gen: {}, current gen: {})",
                event.generation(),
                self.generation
            );
            return false;
        }

        match (self.phase, event) {
            (ArenaPhase::Opening, ArenaEvent::Opened { result, .. }) => self.on_opened(result),
            (ArenaPhase::Debating, ArenaEvent::Replied { result, .. }) => self.on_replied(result),
            (ArenaPhase::Judging, ArenaEvent::Judged { result, .. }) => self.on_judged(result),
            (ArenaPhase::Debating, ArenaEvent::Tick { .. }) => self.on_tick(),
            (phase, event) => {
                debug!("Ignoring {:?} in phase {:?}", event, phase);
                return false;
            }
        }
        true
    }

    fn on_opened(&mut self, result: Result<String, GatewayError>) {
        self.request = None;
        match result {
            Ok(opening) => {
                self.transcript.clear();
                self.transcript
                    .push(Role::System, format!("DEBATE STARTED: \"{}\"", self.topic));
                self.transcript.push(Role::Assistant, opening);
                self.phase = ArenaPhase::Debating;
                self.countdown.reset();
                self.countdown.start();
                self.start_ticker();
                info!("Debate room running ({}s)", self.countdown.duration());
            }
            Err(e) => {
                warn!("Failed to open debate room: {}", e);
                self.phase = ArenaPhase::TopicSelection;
                self.error = Some(format!("Failed to start debate: {e}"));
            }
        }
    }

    fn on_replied(&mut self, result: Result<Reply, GatewayError>) {
        self.request = None;
        self.awaiting_reply = false;
        match result {
            Ok(reply) => {
                self.transcript.push(Role::Assistant, reply.text);
                self.fact_checks.extend(reply.fact_checks);
            }
            Err(e) => {
                warn!("Opponent reply failed: {}", e);
                self.transcript.push(
                    Role::System,
                    format!("Error: Failed to get response. {e}"),
                );
            }
        }
    }

    fn on_tick(&mut self) {
        match self.countdown.tick() {
            Tick::Expired => {
                info!("Debate room countdown expired");
                self.begin_judging();
            }
            Tick::Running { .. } | Tick::Ignored => {}
        }
    }

    fn on_judged(&mut self, result: Result<Judgment, GatewayError>) {
        self.request = None;
        match result {
            Ok(judgment) => {
                info!(
                    "Judgment received: {} ({} vs {})",
                    judgment.winner.label(),
                    judgment.user_score,
                    judgment.ai_score
                );
                self.transcript.push(Role::Judge, judgment.reasoning.clone());
                self.judgment = Some(judgment);
            }
            Err(e) => {
                warn!("Judging failed: {}", e);
                self.transcript.push(
                    Role::System,
                    format!("Error: Failed to judge debate. {e}"),
                );
            }
        }
        self.phase = ArenaPhase::Judged;
    }

    // -- internals ----------------------------------------------------------

    /// The one-shot move from `Debating` to `Judging`. Callers gate it on the
    /// countdown's expiry latch.
    fn begin_judging(&mut self) {
        if self.phase != ArenaPhase::Debating {
            return;
        }
        self.stop_ticker();
        // A reply still in flight would land after the judge has the
        // transcript; drop it.
        if let Some(handle) = self.request.take() {
            handle.abort();
        }
        self.awaiting_reply = false;
        self.phase = ArenaPhase::Judging;
        self.transcript.push(Role::System, TIME_UP_NOTICE);

        let api = Arc::clone(&self.api);
        let tx = self.events.clone();
        let generation = self.generation;
        let topic = self.topic.clone();
        let messages = self.transcript.messages().to_vec();
        self.request = Some(tokio::spawn(async move {
            let result = api.judge(&topic, &messages).await;
            let _ = tx.send(ArenaEvent::Judged { generation, result }).await;
        }));
    }

    fn start_ticker(&mut self) {
        self.stop_ticker();
        let tx = self.events.clone();
        let generation = self.generation;
        let period = self.tick_interval;
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately; skip it so the first
            // decrement lands one full period after the start.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(ArenaEvent::Tick { generation }).await.is_err() {
                    break;
                }
            }
        }));
    }

    /// Abort the tick task only. The countdown's own running flag belongs
    /// to the phase transitions.
    fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    fn replace_request(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.request.replace(handle) {
            previous.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
