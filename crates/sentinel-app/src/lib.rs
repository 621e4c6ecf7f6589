// Session state machines and the application event loop for the Sentinel
// debate client. Everything here is UI-agnostic; the TUI crate only sends
// `UserCommand`s and renders `AppSnapshot`s.

pub mod app;
pub mod arena;
pub mod chat;
pub mod courtroom;
pub mod error;
pub mod events;

#[cfg(test)]
mod testing;

pub use error::SessionError;
