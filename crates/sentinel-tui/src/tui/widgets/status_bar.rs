// Status bar widget: screen tabs, active session status, last notice.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use sentinel_app::arena::ArenaPhase;
use sentinel_app::courtroom::SessionStatus;
use sentinel_app::events::Screen;
use sentinel_core::countdown::format_clock;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [tab bar] | [session status] | [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = tab_spans(state.screen);

    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
    let (status, color) = session_status(state);
    spans.push(Span::styled(status, Style::default().fg(color)));

    if let Some(notice) = &state.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// "[1:Courtroom] [2:Debate Room] [3:Sentinel AI]" with the active tab highlighted.
pub fn tab_spans(active: Screen) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for screen in Screen::ALL {
        let style = if screen == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(
            format!("[{}:{}]", screen.index() + 1, screen.title()),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Short description of the active screen's session.
pub fn session_status(state: &ViewState) -> (String, Color) {
    match state.screen {
        Screen::Courtroom => {
            let courtroom = &state.snapshot.courtroom;
            let color = match courtroom.status {
                SessionStatus::Errored => Color::Red,
                SessionStatus::Completed => Color::Green,
                SessionStatus::Idle => Color::Gray,
                _ => Color::White,
            };
            if courtroom.round > 0 {
                (
                    format!("Round {} · {}", courtroom.round, courtroom.status.label()),
                    color,
                )
            } else {
                (courtroom.status.label().to_string(), color)
            }
        }
        Screen::Arena => {
            let arena = &state.snapshot.arena;
            match arena.phase {
                ArenaPhase::Debating => (
                    format!("Debating · {}", format_clock(arena.remaining_secs)),
                    clock_color(arena.remaining_secs),
                ),
                ArenaPhase::Judged => (arena.phase.label().to_string(), Color::Green),
                phase => (phase.label().to_string(), Color::White),
            }
        }
        Screen::Chat => {
            if state.snapshot.chat.sending {
                ("Waiting for reply".to_string(), Color::Yellow)
            } else {
                ("Ready".to_string(), Color::Gray)
            }
        }
    }
}

/// Clock colour: white normally, yellow in the last minute, red in the last ten seconds.
pub fn clock_color(remaining_secs: u32) -> Color {
    match remaining_secs {
        0..=10 => Color::Red,
        11..=60 => Color::Yellow,
        _ => Color::White,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
