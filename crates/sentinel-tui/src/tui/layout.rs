// Screen layout: panel arrangement and sizing.
//
// Every screen shares the same frame:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Main area (screen specific)                       |
// +--------------------------------------------------+
// | Input line (3 rows, bordered)                     |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// The courtroom splits its main area into a header, the pro/con argument
// columns and the transcript. The debate room puts the transcript beside a
// sidebar holding fact checks and the judgment.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved areas of the shared frame.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    pub main: Rect,
    pub input: Rect,
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(6),    // main
            Constraint::Length(3), // input
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        main: vertical[1],
        input: vertical[2],
        help_bar: vertical[3],
    }
}

#[derive(Debug, Clone)]
pub struct CourtroomLayout {
    /// Topic, round and session status.
    pub header: Rect,
    pub pro: Rect,
    pub con: Rect,
    pub transcript: Rect,
}

pub fn courtroom_layout(main: Rect) -> CourtroomLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Percentage(55),
            Constraint::Min(3),
        ])
        .split(main);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(vertical[1]);

    CourtroomLayout {
        header: vertical[0],
        pro: columns[0],
        con: columns[1],
        transcript: vertical[2],
    }
}

#[derive(Debug, Clone)]
pub struct ArenaLayout {
    /// Topic, phase and the countdown clock.
    pub header: Rect,
    pub transcript: Rect,
    pub sidebar: Rect,
}

pub fn arena_layout(main: Rect) -> ArenaLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(main);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(vertical[1]);

    ArenaLayout {
        header: vertical[0],
        transcript: horizontal[0],
        sidebar: horizontal[1],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
