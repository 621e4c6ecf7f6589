// Keyboard input handling and command dispatch.
//
// Two modes, like a pager: in normal mode single keys switch screens, scroll
// and trigger actions; in editing mode keystrokes go to the input line and
// Enter submits it to the active screen.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use sentinel_app::events::{Screen, UserCommand};
use sentinel_core::topics::{next_topic, ARENA_TOPICS, COURTROOM_TOPICS};

use super::ViewState;

/// Lines moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// application loop. Returns `None` when it only changed local view state.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Crossterm reports releases on some platforms; only act on presses.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl+C always quits immediately regardless of mode.
    if ctrl && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    // Available in both modes.
    if ctrl && key_event.code == KeyCode::Char('r') {
        view_state.scroll_back = 0;
        view_state.notice = None;
        return Some(UserCommand::Reset);
    }
    if key_event.code == KeyCode::Tab {
        cycle_topic(view_state);
        return None;
    }

    if view_state.editing {
        return handle_editing(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('1') => switch_screen(view_state, Screen::Courtroom),
        KeyCode::Char('2') => switch_screen(view_state, Screen::Arena),
        KeyCode::Char('3') => switch_screen(view_state, Screen::Chat),

        KeyCode::Enter | KeyCode::Char('i') => {
            view_state.editing = true;
            None
        }

        KeyCode::Char('e') if view_state.screen == Screen::Arena => Some(UserCommand::EndDebate),

        KeyCode::Up | KeyCode::Char('k') => {
            view_state.scroll_back = view_state.scroll_back.saturating_add(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_state.scroll_back = view_state.scroll_back.saturating_sub(1);
            None
        }
        KeyCode::PageUp => {
            view_state.scroll_back = view_state.scroll_back.saturating_add(PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            view_state.scroll_back = view_state.scroll_back.saturating_sub(PAGE_SIZE);
            None
        }

        KeyCode::Esc => {
            view_state.notice = None;
            None
        }

        // Quit asks first.
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// `y`/`q` confirm, `n`/Esc cancel, everything else is swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

fn handle_editing(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            // Leave the text in place for later.
            view_state.editing = false;
            None
        }
        KeyCode::Enter => {
            view_state.notice = None;
            view_state.scroll_back = 0;
            Some(UserCommand::Submit(std::mem::take(&mut view_state.input)))
        }
        KeyCode::Backspace => {
            view_state.input.pop();
            None
        }
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            view_state.input.push(c);
            None
        }
        _ => None,
    }
}

fn switch_screen(view_state: &mut ViewState, screen: Screen) -> Option<UserCommand> {
    if view_state.screen == screen {
        return None;
    }
    view_state.screen = screen;
    view_state.requested_screen = Some(screen);
    view_state.scroll_back = 0;
    Some(UserCommand::SwitchScreen(screen))
}

/// Fill the input line with the next example topic when the active screen
/// is waiting for one.
fn cycle_topic(view_state: &mut ViewState) {
    if !view_state.accepts_topic() {
        return;
    }
    let topics: &[&str] = match view_state.screen {
        Screen::Courtroom => &COURTROOM_TOPICS,
        Screen::Arena => &ARENA_TOPICS,
        Screen::Chat => return,
    };
    if let Some(topic) = next_topic(topics, &view_state.input) {
        view_state.input = topic.to_string();
        view_state.editing = true;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use sentinel_app::arena::ArenaPhase;
    use sentinel_app::courtroom::SessionStatus;
    use sentinel_app::events::UiUpdate;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn idle_state() -> ViewState {
        let mut state = ViewState::default();
        state.snapshot.courtroom.accepts_topic = true;
        state
    }

    fn type_text(state: &mut ViewState, text: &str) {
        for c in text.chars() {
            handle_key(key(KeyCode::Char(c)), state);
        }
    }

    // -- Screens --

    #[test]
    fn digits_switch_screens_in_normal_mode() {
        let mut state = ViewState::default();
        assert_eq!(
            handle_key(key(KeyCode::Char('2')), &mut state),
            Some(UserCommand::SwitchScreen(Screen::Arena))
        );
        assert_eq!(state.screen, Screen::Arena);
        assert_eq!(state.requested_screen, Some(Screen::Arena));
        assert_eq!(
            handle_key(key(KeyCode::Char('3')), &mut state),
            Some(UserCommand::SwitchScreen(Screen::Chat))
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('1')), &mut state),
            Some(UserCommand::SwitchScreen(Screen::Courtroom))
        );
    }

    #[test]
    fn same_screen_sends_nothing() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('1')), &mut state), None);
    }

    #[test]
    fn digits_are_typed_while_editing() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('i')), &mut state);
        assert!(state.editing);
        assert_eq!(handle_key(key(KeyCode::Char('2')), &mut state), None);
        assert_eq!(state.input, "2");
        assert_eq!(state.screen, Screen::Courtroom);
    }

    // -- Editing --

    #[test]
    fn enter_submits_and_clears_input() {
        let mut state = idle_state();
        handle_key(key(KeyCode::Enter), &mut state);
        type_text(&mut state, "Is AI safe?");
        handle_key(key(KeyCode::Backspace), &mut state);
        type_text(&mut state, "!");

        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(cmd, Some(UserCommand::Submit("Is AI safe!".into())));
        assert!(state.input.is_empty());
        assert!(state.editing);
    }

    #[test]
    fn refused_feedback_comes_back_to_the_line() {
        let mut state = ViewState::default();
        state.snapshot.courtroom.status = SessionStatus::AwaitingRound;
        state.snapshot.courtroom.session_id = Some("s".into());
        handle_key(key(KeyCode::Enter), &mut state);
        type_text(&mut state, "my feedback");

        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(cmd, Some(UserCommand::Submit("my feedback".into())));

        // The loop refuses it as busy and hands the text back.
        crate::tui::apply_ui_update(
            &mut state,
            UiUpdate::Notice("a request is already in flight".into()),
        );
        crate::tui::apply_ui_update(&mut state, UiUpdate::RestoreInput("my feedback".into()));
        assert_eq!(state.input, "my feedback");
        assert!(state.editing);
    }

    #[test]
    fn esc_leaves_editing_but_keeps_text() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Enter), &mut state);
        type_text(&mut state, "half");
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(!state.editing);
        assert_eq!(state.input, "half");
    }

    #[test]
    fn q_is_text_while_editing() {
        let mut state = ViewState::default();
        state.editing = true;
        handle_key(key(KeyCode::Char('q')), &mut state);
        assert!(!state.confirm_quit);
        assert_eq!(state.input, "q");
    }

    // -- Topics --

    #[test]
    fn tab_cycles_example_topics_when_topic_expected() {
        let mut state = idle_state();
        assert_eq!(handle_key(key(KeyCode::Tab), &mut state), None);
        assert_eq!(state.input, COURTROOM_TOPICS[0]);
        assert!(state.editing);
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.input, COURTROOM_TOPICS[1]);
    }

    #[test]
    fn tab_uses_debate_room_topics_on_arena() {
        let mut state = ViewState::default();
        state.screen = Screen::Arena;
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.input, ARENA_TOPICS[0]);
    }

    #[test]
    fn tab_ignored_once_debate_running() {
        let mut state = ViewState::default();
        state.snapshot.courtroom.status = SessionStatus::RoundReady;
        state.snapshot.courtroom.session_id = Some("s".into());
        handle_key(key(KeyCode::Tab), &mut state);
        assert!(state.input.is_empty());

        state.screen = Screen::Arena;
        state.snapshot.arena.phase = ArenaPhase::Debating;
        handle_key(key(KeyCode::Tab), &mut state);
        assert!(state.input.is_empty());

        state.screen = Screen::Chat;
        handle_key(key(KeyCode::Tab), &mut state);
        assert!(state.input.is_empty());
    }

    // -- Actions --

    #[test]
    fn ctrl_r_resets_in_any_mode() {
        let mut state = ViewState::default();
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('r')), &mut state),
            Some(UserCommand::Reset)
        );
        state.editing = true;
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('r')), &mut state),
            Some(UserCommand::Reset)
        );
        assert!(state.input.is_empty());
    }

    #[test]
    fn e_ends_debate_only_on_arena() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('e')), &mut state), None);
        state.screen = Screen::Arena;
        assert_eq!(
            handle_key(key(KeyCode::Char('e')), &mut state),
            Some(UserCommand::EndDebate)
        );
    }

    #[test]
    fn scrolling_moves_away_from_bottom_and_back() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::PageUp), &mut state);
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.scroll_back, PAGE_SIZE + 1);
        handle_key(key(KeyCode::PageDown), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.scroll_back, 0);
    }

    // -- Quit --

    #[test]
    fn q_asks_for_confirmation() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), None);
        assert!(state.confirm_quit);

        // Other keys are swallowed while the dialog is up.
        assert_eq!(handle_key(key(KeyCode::Char('2')), &mut state), None);
        assert_eq!(state.screen, Screen::Courtroom);

        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn n_cancels_quit() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('q')), &mut state);
        assert_eq!(handle_key(key(KeyCode::Char('n')), &mut state), None);
        assert!(!state.confirm_quit);
    }

    #[test]
    fn ctrl_c_quits_immediately() {
        let mut state = ViewState::default();
        state.editing = true;
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = ViewState::default();
        let mut event = key(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        assert_eq!(handle_key(event, &mut state), None);
        assert!(!state.confirm_quit);
    }
}
