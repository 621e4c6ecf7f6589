// Shared types for the Sentinel debate client: gateway wire bodies,
// transcripts, the argument formatter, the debate-room countdown and the
// configuration loader.

pub mod config;
pub mod countdown;
pub mod format;
pub mod protocol;
pub mod topics;
pub mod transcript;
