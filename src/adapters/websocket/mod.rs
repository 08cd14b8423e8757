//! WebSocket adapter streaming dialogue turns.
//!
//! - [`messages`] - message protocol types
//! - [`handler`] - axum upgrade handler and connection loop

pub mod handler;
pub mod messages;

pub use handler::ws_handler;
pub use messages::{ClientMessage, PongMessage, ServerMessage};
