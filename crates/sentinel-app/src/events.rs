// Messages exchanged between the application loop and the TUI.

use sentinel_core::protocol::{FactCheck, Judgment, Message};

use crate::arena::ArenaPhase;
use crate::courtroom::SessionStatus;

/// The three top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Courtroom,
    Arena,
    Chat,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Courtroom, Screen::Arena, Screen::Chat];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Courtroom => "Courtroom",
            Screen::Arena => "Debate Room",
            Screen::Chat => "Sentinel AI",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Screen::Courtroom => 0,
            Screen::Arena => 1,
            Screen::Chat => 2,
        }
    }
}

/// Commands from the TUI to the application loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    SwitchScreen(Screen),
    /// The input line, routed to the active screen's primary action.
    Submit(String),
    /// Debate room: concede the remaining time.
    EndDebate,
    /// Reset the active screen's session.
    Reset,
    Quit,
}

/// Pushes from the application loop to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    Snapshot(Box<AppSnapshot>),
    /// A refused command; shown in the status bar until the next notice.
    Notice(String),
    /// Text from a refused `Submit`, handed back so the user can edit it.
    RestoreInput(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSnapshot {
    pub screen: Screen,
    pub courtroom: CourtroomSnapshot,
    pub arena: ArenaSnapshot,
    pub chat: ChatSnapshot,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourtroomSnapshot {
    pub status: SessionStatus,
    pub topic: String,
    pub session_id: Option<String>,
    pub round: u32,
    pub completed: bool,
    pub pro_points: Vec<String>,
    pub con_points: Vec<String>,
    pub summary: Option<String>,
    /// The summary request is still outstanding.
    pub summary_pending: bool,
    pub unsent_feedback: Option<String>,
    pub error: Option<String>,
    pub transcript: Vec<Message>,
    pub accepts_topic: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArenaSnapshot {
    pub phase: ArenaPhase,
    pub topic: String,
    pub remaining_secs: u32,
    pub duration_secs: u32,
    pub awaiting_reply: bool,
    pub transcript: Vec<Message>,
    pub fact_checks: Vec<FactCheck>,
    pub judgment: Option<Judgment>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatSnapshot {
    pub messages: Vec<Message>,
    pub sending: bool,
}
