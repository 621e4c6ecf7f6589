// Sentinel AI chat screen.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;
use sentinel_app::events::Screen;

use super::transcript;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let chat = &state.snapshot.chat;
    let mut title = vec![Span::styled(
        Screen::Chat.title(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if chat.sending {
        title.push(Span::styled(" (thinking...)", Style::default().fg(Color::Magenta)));
    }
    transcript::render(
        frame,
        area,
        Line::from(title),
        &chat.messages,
        state.scroll_back,
    );
}
