//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations over the
//! ports.

pub mod dialogue;

pub use dialogue::{
    CreateSessionCommand, CreateSessionResult, DeleteSessionCommand, DialogueError,
    DialogueManager, GetMetricsQuery, ProcessMessageCommand, ResetSessionCommand,
    ResetSessionResult,
};
