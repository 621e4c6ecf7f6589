use thiserror::Error;

/// A session operation refused before any request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("message must not be empty")]
    EmptyInput,

    #[error("no active debate session")]
    NoSession,

    #[error("the debate has already completed")]
    DebateCompleted,

    #[error("a request is already in flight")]
    Busy,

    #[error("not available while {0}")]
    InvalidState(&'static str),
}
