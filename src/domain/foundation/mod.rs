//! Foundation module - Shared domain primitives.
//!
//! Identifiers, lifecycle status and error vocabulary used across the
//! dialogue engine.

mod errors;
mod ids;
mod session_status;
mod state_machine;

pub use errors::{ErrorCode, ValidationError};
pub use ids::SessionId;
pub use session_status::SessionStatus;
pub use state_machine::StateMachine;
