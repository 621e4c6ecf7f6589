// Help bar widget: context-sensitive key hints.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use sentinel_app::arena::ArenaPhase;
use sentinel_app::events::Screen;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();
    for (i, (key, action)) in hints(state).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Style::default()));
        }
        spans.push(Span::styled(
            key,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {action}"), Style::default().fg(Color::Gray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// (key, action) pairs valid in the current mode.
pub fn hints(state: &ViewState) -> Vec<(&'static str, &'static str)> {
    let mut hints = Vec::new();
    if state.editing {
        hints.push(("Enter", "send"));
        hints.push(("Esc", "stop typing"));
    } else {
        hints.push(("i", "type"));
        hints.push(("1-3", "screens"));
        hints.push(("↑↓", "scroll"));
    }
    if state.accepts_topic() && state.screen != Screen::Chat {
        hints.push(("Tab", "example topic"));
    }
    if !state.editing
        && state.screen == Screen::Arena
        && state.snapshot.arena.phase == ArenaPhase::Debating
    {
        hints.push(("e", "end debate"));
    }
    hints.push(("Ctrl+R", "reset"));
    if !state.editing {
        hints.push(("q", "quit"));
    }
    hints
}
