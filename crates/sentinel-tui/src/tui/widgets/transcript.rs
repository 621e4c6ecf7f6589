// Transcript panel shared by all three screens.
//
// Each message renders as a "name  HH:MM" header followed by its content.
// The view sticks to the bottom unless the user has scrolled back.

use chrono::Local;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use sentinel_core::protocol::Message;

use super::role_style;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    title: Line<'_>,
    messages: &[Message],
    scroll_back: usize,
) {
    let lines = transcript_lines(messages);
    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = bottom_scroll(lines.len(), inner_height, scroll_back);

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

pub fn transcript_lines(messages: &[Message]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        let time = message.timestamp.with_timezone(&Local).format("%H:%M");
        lines.push(Line::from(vec![
            Span::styled(message.role.label(), role_style(message.role)),
            Span::styled(format!("  {time}"), Style::default().fg(Color::DarkGray)),
        ]));
        for text in message.content.lines() {
            lines.push(Line::from(format!("  {text}")));
        }
    }
    lines
}

/// Scroll offset that shows the last `height` lines, moved up by
/// `scroll_back` and clamped to the top.
fn bottom_scroll(line_count: usize, height: usize, scroll_back: usize) -> u16 {
    let max = line_count.saturating_sub(height);
    max.saturating_sub(scroll_back).min(u16::MAX as usize) as u16
}
