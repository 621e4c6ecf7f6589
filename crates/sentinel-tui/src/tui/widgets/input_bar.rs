// Single-line input editor.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let border = if state.editing { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", state.input_prompt()));

    frame.render_widget(Paragraph::new(input_line(state)).block(block), area);

    if state.editing {
        // Block cursor after the text, clamped to the inner width.
        let inner_width = area.width.saturating_sub(2);
        let typed = state.input.chars().count() as u16;
        let x = area.x + 1 + typed.min(inner_width.saturating_sub(1));
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn input_line(state: &ViewState) -> Line<'static> {
    if state.input.is_empty() && !state.editing {
        let hint = if state.accepts_topic() {
            "Press i to type a topic, Tab for an example"
        } else {
            "Press i to type"
        };
        return Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)));
    }
    Line::from(state.input.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::buffer_text;
    use sentinel_app::events::Screen;

    fn draw(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(60, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn idle_shows_hint_and_prompt() {
        let state = ViewState {
            screen: Screen::Chat,
            ..ViewState::default()
        };
        let text = draw(&state);
        assert!(text.contains("Message"));
        assert!(text.contains("Press i to type"));
    }

    #[test]
    fn editing_shows_typed_text() {
        let state = ViewState {
            screen: Screen::Chat,
            editing: true,
            input: "is nuclear power safe".into(),
            ..ViewState::default()
        };
        let text = draw(&state);
        assert!(text.contains("is nuclear power safe"));
        assert!(!text.contains("Press i"));
    }
}
