// TUI widget modules, one per panel.

pub mod arena;
pub mod chat;
pub mod courtroom;
pub mod help_bar;
pub mod input_bar;
pub mod quit_confirm;
pub mod status_bar;
pub mod transcript;

use ratatui::style::{Color, Modifier, Style};
use sentinel_core::protocol::Role;

/// Colour used for a speaker's name throughout the UI.
pub fn role_style(role: Role) -> Style {
    let color = match role {
        Role::User => Color::Cyan,
        Role::Assistant => Color::Magenta,
        Role::System => Color::Yellow,
        Role::Judge => Color::Green,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Flatten a test terminal's buffer into one string for `contains` checks.
#[cfg(test)]
pub(crate) fn buffer_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}
