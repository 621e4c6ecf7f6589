// Terminal UI: view state, frame rendering and the input/render loop.
//
// The TUI keeps a `ViewState` holding the latest `AppSnapshot` pushed by the
// application loop plus purely local state (the input line, scroll offset,
// quit confirmation). It never mutates session state itself; everything goes
// through `UserCommand`s.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use sentinel_app::arena::ArenaPhase;
use sentinel_app::courtroom::SessionStatus;
use sentinel_app::events::{AppSnapshot, Screen, UiUpdate, UserCommand};
use tokio::sync::mpsc;
use tracing::{debug, info};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state mirroring the application for rendering.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Latest snapshot from the application loop.
    pub snapshot: AppSnapshot,
    /// Active screen. Switched locally on key press so the UI responds before
    /// the next snapshot confirms it.
    pub screen: Screen,
    /// Screen switch sent to the application loop but not yet echoed back in
    /// a snapshot. Snapshots naming another screen are older than the switch.
    pub requested_screen: Option<Screen>,
    /// Contents of the single-line input editor.
    pub input: String,
    /// Whether keystrokes go to the input editor.
    pub editing: bool,
    /// Transcript lines scrolled up from the bottom.
    pub scroll_back: usize,
    /// Last refused-command message from the application loop.
    pub notice: Option<String>,
    pub confirm_quit: bool,
}

impl ViewState {
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        match self.requested_screen {
            Some(requested) if requested != snapshot.screen => {}
            _ => {
                self.requested_screen = None;
                self.screen = snapshot.screen;
            }
        }

        // Feedback the gateway failed to take goes back on the input line.
        let courtroom = &snapshot.courtroom;
        let newly_failed = courtroom.status == SessionStatus::Errored
            && self.snapshot.courtroom.status != SessionStatus::Errored;
        if newly_failed && self.input.is_empty() {
            if let Some(feedback) = &courtroom.unsent_feedback {
                self.input = feedback.clone();
            }
        }

        self.snapshot = snapshot;
    }

    /// Put refused text back on the input line unless the user has already
    /// started typing something else.
    pub fn restore_input(&mut self, text: String) {
        if self.input.is_empty() {
            self.input = text;
        }
        self.editing = true;
    }

    /// Whether the active screen's input line currently takes a topic.
    pub fn accepts_topic(&self) -> bool {
        match self.screen {
            Screen::Courtroom => self.snapshot.courtroom.accepts_topic,
            Screen::Arena => self.snapshot.arena.phase == ArenaPhase::TopicSelection,
            Screen::Chat => false,
        }
    }

    /// Label for what Enter will send on the active screen.
    pub fn input_prompt(&self) -> &'static str {
        if self.accepts_topic() {
            return "Topic";
        }
        match self.screen {
            Screen::Courtroom => "Feedback",
            Screen::Arena => "Argument",
            Screen::Chat => "Message",
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => state.apply_snapshot(*snapshot),
        UiUpdate::Notice(message) => state.notice = Some(message),
        UiUpdate::RestoreInput(text) => state.restore_input(text),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    match state.screen {
        Screen::Courtroom => widgets::courtroom::render(frame, layout.main, state),
        Screen::Arena => widgets::arena::render(frame, layout.main, state),
        Screen::Chat => widgets::chat::render(frame, layout.main, state),
    }
    widgets::input_bar::render(frame, layout.input, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits or the application loop
/// closes the update channel. The terminal is restored on every exit path,
/// including panics.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    // Redraw at ~30 fps.
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(update) => apply_ui_update(&mut view_state, update),
                    None => {
                        info!("UI channel closed, leaving TUI");
                        break Ok(());
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            debug!("Sending command: {:?}", cmd);
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::from(e).context("terminal input error")),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::from(e).context("failed to draw frame"));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_app::events::{ArenaSnapshot, CourtroomSnapshot};
    use widgets::buffer_text;

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert_eq!(state.screen, Screen::Courtroom);
        assert!(state.input.is_empty());
        assert!(!state.editing);
        assert!(!state.confirm_quit);
        assert!(state.notice.is_none());
        assert_eq!(state.scroll_back, 0);
    }

    #[test]
    fn snapshot_replaces_mirror_and_screen() {
        let mut state = ViewState::default();
        state.input = "draft".into();
        let snapshot = AppSnapshot {
            screen: Screen::Chat,
            ..AppSnapshot::default()
        };
        apply_ui_update(&mut state, UiUpdate::Snapshot(Box::new(snapshot)));
        assert_eq!(state.screen, Screen::Chat);
        // Local editor contents survive snapshots.
        assert_eq!(state.input, "draft");
    }

    #[test]
    fn notice_is_stored() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Notice("topic must not be empty".into()));
        assert_eq!(state.notice.as_deref(), Some("topic must not be empty"));
    }

    #[test]
    fn refused_submit_text_is_restored() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::RestoreInput("my feedback".into()));
        assert_eq!(state.input, "my feedback");
        assert!(state.editing);
    }

    #[test]
    fn restore_does_not_clobber_new_typing() {
        let mut state = ViewState {
            input: "new".into(),
            ..ViewState::default()
        };
        apply_ui_update(&mut state, UiUpdate::RestoreInput("old".into()));
        assert_eq!(state.input, "new");
    }

    #[test]
    fn failed_feedback_returns_to_input_line() {
        let mut state = ViewState::default();
        state.snapshot.courtroom.status = SessionStatus::AwaitingRound;
        let mut snapshot = AppSnapshot::default();
        snapshot.courtroom = CourtroomSnapshot {
            status: SessionStatus::Errored,
            session_id: Some("s".into()),
            unsent_feedback: Some("press the cost argument".into()),
            error: Some("Error submitting feedback: gateway returned 500".into()),
            ..CourtroomSnapshot::default()
        };
        apply_ui_update(&mut state, UiUpdate::Snapshot(Box::new(snapshot.clone())));
        assert_eq!(state.input, "press the cost argument");

        // Only on the transition: clearing the line afterwards sticks.
        state.input.clear();
        apply_ui_update(&mut state, UiUpdate::Snapshot(Box::new(snapshot)));
        assert!(state.input.is_empty());
    }

    #[test]
    fn older_snapshot_does_not_undo_screen_switch() {
        let mut state = ViewState {
            screen: Screen::Arena,
            requested_screen: Some(Screen::Arena),
            ..ViewState::default()
        };
        // Pushed before the loop saw the switch.
        apply_ui_update(&mut state, UiUpdate::Snapshot(Box::default()));
        assert_eq!(state.screen, Screen::Arena);
        assert_eq!(state.requested_screen, Some(Screen::Arena));

        let confirmed = AppSnapshot {
            screen: Screen::Arena,
            ..AppSnapshot::default()
        };
        apply_ui_update(&mut state, UiUpdate::Snapshot(Box::new(confirmed)));
        assert_eq!(state.requested_screen, None);

        // With nothing outstanding the loop's screen wins again.
        apply_ui_update(&mut state, UiUpdate::Snapshot(Box::default()));
        assert_eq!(state.screen, Screen::Courtroom);
    }

    #[test]
    fn prompt_follows_session_state() {
        let mut state = ViewState::default();
        state.snapshot.courtroom = CourtroomSnapshot {
            accepts_topic: true,
            ..CourtroomSnapshot::default()
        };
        assert_eq!(state.input_prompt(), "Topic");

        state.snapshot.courtroom = CourtroomSnapshot {
            status: SessionStatus::RoundReady,
            session_id: Some("s".into()),
            ..CourtroomSnapshot::default()
        };
        assert_eq!(state.input_prompt(), "Feedback");

        state.screen = Screen::Arena;
        assert_eq!(state.input_prompt(), "Topic");
        state.snapshot.arena = ArenaSnapshot {
            phase: ArenaPhase::Debating,
            ..ArenaSnapshot::default()
        };
        assert_eq!(state.input_prompt(), "Argument");

        state.screen = Screen::Chat;
        assert_eq!(state.input_prompt(), "Message");
    }

    #[test]
    fn render_frame_does_not_panic_on_each_screen() {
        for screen in Screen::ALL {
            let backend = ratatui::backend::TestBackend::new(100, 30);
            let mut terminal = ratatui::Terminal::new(backend).unwrap();
            let state = ViewState {
                screen,
                ..ViewState::default()
            };
            terminal.draw(|frame| render_frame(frame, &state)).unwrap();
            assert!(buffer_text(&terminal).contains(screen.title()));
        }
    }

    #[test]
    fn quit_overlay_is_drawn_on_top() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState {
            confirm_quit: true,
            ..ViewState::default()
        };
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        assert!(buffer_text(&terminal).contains("Leave Sentinel?"));
    }
}
