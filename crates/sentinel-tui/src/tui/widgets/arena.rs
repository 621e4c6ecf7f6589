// Debate room screen: header with the countdown clock, the transcript, and
// a sidebar holding fact checks until the judgment replaces them.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use sentinel_app::arena::ArenaPhase;
use sentinel_app::events::{ArenaSnapshot, Screen};
use sentinel_core::countdown::format_clock;
use sentinel_core::protocol::{FactCheck, Judgment};

use super::status_bar::clock_color;
use super::transcript;
use crate::tui::layout::arena_layout;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let arena = &state.snapshot.arena;
    let layout = arena_layout(area);

    frame.render_widget(
        Paragraph::new(header_line(arena))
            .block(Block::default().borders(Borders::ALL).title(Screen::Arena.title())),
        layout.header,
    );

    let title = if arena.awaiting_reply {
        Line::from(vec![
            Span::raw("Debate "),
            Span::styled("(opponent is typing...)", Style::default().fg(Color::Magenta)),
        ])
    } else {
        Line::from("Debate")
    };
    transcript::render(
        frame,
        layout.transcript,
        title,
        &arena.transcript,
        state.scroll_back,
    );

    let (sidebar_title, lines) = match &arena.judgment {
        Some(judgment) => ("Verdict", judgment_lines(judgment)),
        None => ("Fact checks", fact_check_lines(&arena.fact_checks)),
    };
    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(sidebar_title))
            .wrap(Wrap { trim: true }),
        layout.sidebar,
    );
}

pub fn header_line(arena: &ArenaSnapshot) -> Line<'static> {
    let gray = Style::default().fg(Color::Gray);
    if arena.phase == ArenaPhase::TopicSelection {
        let mut spans = vec![Span::styled(
            format!("Pick a topic for a {} debate.", format_clock(arena.duration_secs)),
            gray,
        )];
        if let Some(error) = &arena.error {
            spans.push(Span::styled(format!("  {error}"), Style::default().fg(Color::Red)));
        }
        return Line::from(spans);
    }

    let clock_style = if arena.phase == ArenaPhase::Debating {
        Style::default()
            .fg(clock_color(arena.remaining_secs))
            .add_modifier(Modifier::BOLD)
    } else {
        gray
    };
    Line::from(vec![
        Span::styled(format_clock(arena.remaining_secs), clock_style),
        Span::styled(format!("  {}  ", arena.phase.label()), gray),
        Span::styled(
            arena.topic.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ])
}

pub fn fact_check_lines(checks: &[FactCheck]) -> Vec<Line<'static>> {
    if checks.is_empty() {
        return vec![Line::from(Span::styled(
            "Claims you make are checked here.",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    let mut lines = Vec::new();
    for check in checks {
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", check.status),
                Style::default().fg(status_color(&check.status)).add_modifier(Modifier::BOLD),
            ),
            Span::raw(check.claim.clone()),
        ]));
        if !check.reason.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {}", check.reason),
                Style::default().fg(Color::Gray),
            )));
        }
        for source in &check.sources {
            lines.push(Line::from(Span::styled(
                format!("  - {}", source.title),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    lines
}

fn status_color(status: &str) -> Color {
    let status = status.to_ascii_lowercase();
    if status.contains("false") || status.contains("incorrect") {
        Color::Red
    } else if status.contains("true") || status.contains("verified") || status.contains("correct") {
        Color::Green
    } else {
        Color::Yellow
    }
}

pub fn judgment_lines(judgment: &Judgment) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            judgment.winner.label(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "You {}  ·  AI {}",
            judgment.user_score, judgment.ai_score
        )),
        Line::default(),
        Line::from(judgment.reasoning.clone()),
    ];
    if !judgment.improvements.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "To improve:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(judgment.improvements.clone()));
    }
    lines
}
