// HTTP client for the debate gateway.
//
// `api` defines the async traits the session layer programs against;
// `client` is the reqwest implementation; `error` classifies failures into
// transient (transport) and persistent (protocol / application) kinds.

pub mod api;
pub mod client;
pub mod error;

pub use api::{ArenaApi, ChatApi, CourtroomApi, Reply};
pub use client::GatewayClient;
pub use error::GatewayError;
