// Courtroom screen: session header, pro/con argument columns, transcript.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use sentinel_app::courtroom::{SessionStatus, NO_SUMMARY};
use sentinel_app::events::{CourtroomSnapshot, Screen};

use super::transcript;
use crate::tui::layout::courtroom_layout;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let courtroom = &state.snapshot.courtroom;
    let layout = courtroom_layout(area);

    frame.render_widget(
        Paragraph::new(header_lines(courtroom))
            .block(Block::default().borders(Borders::ALL).title(Screen::Courtroom.title()))
            .wrap(Wrap { trim: true }),
        layout.header,
    );

    render_points(frame, layout.pro, "Pro", Color::Green, &courtroom.pro_points, courtroom);
    render_points(frame, layout.con, "Con", Color::Red, &courtroom.con_points, courtroom);

    transcript::render(
        frame,
        layout.transcript,
        Line::from("Proceedings"),
        &courtroom.transcript,
        state.scroll_back,
    );
}

/// Topic and round on the first line, then the current error, feedback the
/// gateway has not taken, and the verdict state of a finished debate.
pub fn header_lines(courtroom: &CourtroomSnapshot) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);
    let mut lines = Vec::new();

    if courtroom.topic.is_empty() {
        lines.push(Line::from(Span::styled(
            "No debate yet. Enter a topic to begin.",
            label,
        )));
    } else {
        let mut spans = vec![
            Span::styled("Topic: ", label),
            Span::styled(
                courtroom.topic.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ];
        if courtroom.round > 0 {
            spans.push(Span::styled(format!("   Round {}", courtroom.round), label));
        }
        if courtroom.completed {
            spans.push(Span::styled("   Final", Style::default().fg(Color::Green)));
        }
        lines.push(Line::from(spans));
    }

    if let Some(error) = &courtroom.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    // While the submission is in flight the feedback is not "unsent" yet.
    if courtroom.status != SessionStatus::AwaitingRound {
        if let Some(feedback) = &courtroom.unsent_feedback {
            lines.push(Line::from(vec![
                Span::styled("Unsent feedback: ", Style::default().fg(Color::Yellow)),
                Span::raw(feedback.clone()),
            ]));
        }
    }
    if courtroom.status == SessionStatus::Completed && courtroom.summary.is_none() {
        let text = if courtroom.summary_pending {
            "Waiting for the verdict..."
        } else {
            NO_SUMMARY
        };
        lines.push(Line::from(Span::styled(text, label)));
    }
    lines
}

fn render_points(
    frame: &mut Frame,
    area: Rect,
    side: &str,
    color: Color,
    points: &[String],
    courtroom: &CourtroomSnapshot,
) {
    let title = Span::styled(
        format!(" {side} "),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title);

    let lines: Vec<Line> = if points.is_empty() {
        vec![Line::from(Span::styled(
            placeholder(courtroom.status),
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        points
            .iter()
            .enumerate()
            .map(|(i, point)| Line::from(format!("{}. {point}", i + 1)))
            .collect()
    };

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn placeholder(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Starting | SessionStatus::AwaitingRound => "Waiting for arguments...",
        _ => "No arguments yet",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::buffer_text;

    fn draw(courtroom: CourtroomSnapshot) -> String {
        let mut state = ViewState::default();
        state.snapshot.courtroom = courtroom;
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn idle_header_invites_topic() {
        let lines = header_lines(&CourtroomSnapshot::default());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].to_string().contains("Enter a topic"));
    }

    #[test]
    fn header_shows_topic_round_and_error() {
        let courtroom = CourtroomSnapshot {
            topic: "Space exploration".into(),
            round: 2,
            error: Some("Error fetching debate round: gateway returned 500".into()),
            ..CourtroomSnapshot::default()
        };
        let lines = header_lines(&courtroom);
        assert_eq!(lines[0].to_string(), "Topic: Space exploration   Round 2");
        assert!(lines[1].to_string().starts_with("Error fetching debate round"));
    }

    #[test]
    fn failed_feedback_shows_error_and_kept_text() {
        let courtroom = CourtroomSnapshot {
            status: SessionStatus::Errored,
            topic: "t".into(),
            session_id: Some("s".into()),
            unsent_feedback: Some("press the economic angle".into()),
            error: Some("Error submitting feedback: gateway returned 500".into()),
            ..CourtroomSnapshot::default()
        };
        let lines = header_lines(&courtroom);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].to_string().starts_with("Error submitting feedback"));
        assert_eq!(lines[2].to_string(), "Unsent feedback: press the economic angle");
    }

    #[test]
    fn feedback_in_flight_is_not_unsent() {
        let courtroom = CourtroomSnapshot {
            status: SessionStatus::AwaitingRound,
            topic: "t".into(),
            session_id: Some("s".into()),
            unsent_feedback: Some("press the economic angle".into()),
            ..CourtroomSnapshot::default()
        };
        assert_eq!(header_lines(&courtroom).len(), 1);
    }

    #[test]
    fn verdict_line_tracks_summary_request() {
        let mut courtroom = CourtroomSnapshot {
            status: SessionStatus::Completed,
            topic: "t".into(),
            completed: true,
            summary_pending: true,
            ..CourtroomSnapshot::default()
        };
        assert_eq!(header_lines(&courtroom)[1].to_string(), "Waiting for the verdict...");

        // The fetch failed and was dropped: nothing more is coming.
        courtroom.summary_pending = false;
        assert_eq!(header_lines(&courtroom)[1].to_string(), NO_SUMMARY);

        courtroom.summary = Some("Pro wins.".into());
        assert_eq!(header_lines(&courtroom).len(), 1);
    }

    #[test]
    fn points_are_numbered_per_side() {
        let text = draw(CourtroomSnapshot {
            status: SessionStatus::RoundReady,
            topic: "Remote work".into(),
            round: 1,
            pro_points: vec!["Less commuting".into(), "Flexible hours".into()],
            con_points: vec!["Isolation".into()],
            ..CourtroomSnapshot::default()
        });
        assert!(text.contains("1. Less commuting"));
        assert!(text.contains("2. Flexible hours"));
        assert!(text.contains("1. Isolation"));
    }

    #[test]
    fn empty_columns_show_waiting_placeholder() {
        let text = draw(CourtroomSnapshot {
            status: SessionStatus::AwaitingRound,
            topic: "Remote work".into(),
            ..CourtroomSnapshot::default()
        });
        assert!(text.contains("Waiting for arguments..."));
    }
}
