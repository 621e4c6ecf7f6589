// Leave-confirmation dialog drawn over the whole frame when
// `ViewState::confirm_quit` is set.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const DIALOG_WIDTH: u16 = 40;
const DIALOG_HEIGHT: u16 = 6;

pub fn render(frame: &mut Frame, area: Rect) {
    let dialog = dialog_area(area);
    frame.render_widget(Clear, dialog);

    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let lines = vec![
        Line::from(" Running debates end when you leave."),
        Line::default(),
        Line::from(vec![
            Span::raw(" "),
            key("y", Color::Green),
            Span::raw(" leave   "),
            key("n", Color::Red),
            Span::raw(" stay"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " Leave Sentinel? ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(Color::Black)),
        dialog,
    );
}

/// Centre the dialog in `area`, shrinking it on tiny terminals.
fn dialog_area(area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(DIALOG_HEIGHT.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [dialog] = Layout::horizontal([Constraint::Length(DIALOG_WIDTH.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    dialog
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::buffer_text;

    #[test]
    fn dialog_sits_in_the_middle() {
        let area = Rect::new(0, 0, 100, 30);
        let dialog = dialog_area(area);
        assert_eq!((dialog.width, dialog.height), (DIALOG_WIDTH, DIALOG_HEIGHT));
        assert_eq!(dialog.x, (100 - DIALOG_WIDTH) / 2);
        assert_eq!(dialog.y, (30 - DIALOG_HEIGHT) / 2);
    }

    #[test]
    fn dialog_shrinks_to_fit() {
        let area = Rect::new(0, 0, 20, 4);
        let dialog = dialog_area(area);
        assert!(dialog.width <= 20 && dialog.height <= 4);
    }

    #[test]
    fn dialog_names_both_keys() {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, frame.area())).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Leave Sentinel?"));
        assert!(text.contains("y leave"));
        assert!(text.contains("n stay"));
    }
}
