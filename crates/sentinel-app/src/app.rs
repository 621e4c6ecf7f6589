// Application state and the main event loop.
//
// The loop is the only place session state changes. It multiplexes user
// commands from the TUI with the results of gateway requests and countdown
// ticks, and pushes a fresh snapshot to the TUI after every handled input.

use std::sync::Arc;

use sentinel_core::config::Config;
use sentinel_gateway::{ArenaApi, ChatApi, CourtroomApi};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::arena::{ArenaEvent, ArenaPhase, ArenaSession};
use crate::chat::{ChatEvent, ChatSession};
use crate::courtroom::{CourtroomEvent, CourtroomSession};
use crate::error::SessionError;
use crate::events::{AppSnapshot, Screen, UiUpdate, UserCommand};

/// Capacity of each session's event channel.
const SESSION_CHANNEL_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub screen: Screen,
    pub courtroom: CourtroomSession,
    pub arena: ArenaSession,
    pub chat: ChatSession,
}

/// Receiving ends of the session event channels, consumed by [`run`].
pub struct SessionReceivers {
    pub courtroom: mpsc::Receiver<CourtroomEvent>,
    pub arena: mpsc::Receiver<ArenaEvent>,
    pub chat: mpsc::Receiver<ChatEvent>,
}

impl AppState {
    /// Wire up the three sessions against their gateways.
    pub fn new(
        config: &Config,
        courtroom_api: Arc<dyn CourtroomApi>,
        arena_api: Arc<dyn ArenaApi>,
        chat_api: Arc<dyn ChatApi>,
    ) -> (Self, SessionReceivers) {
        let (courtroom_tx, courtroom_rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);
        let (arena_tx, arena_rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);
        let (chat_tx, chat_rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);

        let state = AppState {
            screen: Screen::default(),
            courtroom: CourtroomSession::new(courtroom_api, courtroom_tx, &config.timing),
            arena: ArenaSession::new(arena_api, arena_tx, &config.timing),
            chat: ChatSession::new(chat_api, chat_tx),
        };
        let receivers = SessionReceivers {
            courtroom: courtroom_rx,
            arena: arena_rx,
            chat: chat_rx,
        };
        (state, receivers)
    }

    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            screen: self.screen,
            courtroom: self.courtroom.snapshot(),
            arena: self.arena.snapshot(),
            chat: self.chat.snapshot(),
        }
    }

    /// Route the input line to the active screen's primary action.
    pub fn submit(&mut self, text: &str) -> Result<(), SessionError> {
        match self.screen {
            Screen::Courtroom => {
                if self.courtroom.accepts_topic() {
                    self.courtroom.start(text)
                } else {
                    self.courtroom.submit_feedback(text)
                }
            }
            Screen::Arena => {
                if self.arena.phase() == ArenaPhase::TopicSelection {
                    self.arena.start(text)
                } else {
                    self.arena.send(text)
                }
            }
            Screen::Chat => self.chat.send(text),
        }
    }

    /// Reset the active screen's session.
    pub fn reset_active(&mut self) {
        match self.screen {
            Screen::Courtroom => self.courtroom.reset(),
            Screen::Arena => self.arena.reset(),
            Screen::Chat => self.chat.clear(),
        }
        info!("Reset {} session", self.screen.title());
    }

    pub fn cancel_all_tasks(&mut self) {
        self.courtroom.cancel_tasks();
        self.arena.cancel_tasks();
        self.chat.cancel_tasks();
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on four channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Courtroom request results
/// 3. Debate room request results and countdown ticks
/// 4. Chat replies
///
/// Exits on `Quit` or when the command channel closes, cancelling every
/// outstanding task on the way out.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut receivers: SessionReceivers,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");
    push_snapshot(&state, &ui_tx).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd, &ui_tx).await,
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            Some(event) = receivers.courtroom.recv() => {
                if state.courtroom.handle_event(event) {
                    push_snapshot(&state, &ui_tx).await;
                }
            }

            Some(event) = receivers.arena.recv() => {
                if state.arena.handle_event(event) {
                    push_snapshot(&state, &ui_tx).await;
                }
            }

            Some(event) = receivers.chat.recv() => {
                if state.chat.handle_event(event) {
                    push_snapshot(&state, &ui_tx).await;
                }
            }
        }
    }

    state.cancel_all_tasks();
    info!("Application event loop exiting");
    Ok(())
}

async fn push_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let outcome = match cmd {
        UserCommand::SwitchScreen(screen) => {
            state.screen = screen;
            info!("Switched to screen: {:?}", screen);
            Ok(())
        }
        UserCommand::Submit(text) => {
            let outcome = state.submit(&text);
            if outcome.is_err() && !text.trim().is_empty() {
                let _ = ui_tx.send(UiUpdate::RestoreInput(text)).await;
            }
            outcome
        }
        UserCommand::EndDebate => state.arena.end_now(),
        UserCommand::Reset => {
            state.reset_active();
            Ok(())
        }
        UserCommand::Quit => Ok(()),
    };

    if let Err(e) = outcome {
        warn!("Command refused: {}", e);
        let _ = ui_tx.send(UiUpdate::Notice(e.to_string())).await;
    }
    push_snapshot(state, ui_tx).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
