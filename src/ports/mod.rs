//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the dialogue engine and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - hosted chat-completion model
//! - `ResponseSynthesizer` - phrasing of agent replies
//! - `SessionStore` - live sessions keyed by id
//! - `SessionArchive` - append-only record of finished sessions

mod ai_provider;
mod response_synthesizer;
mod session_archive;
mod session_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, TokenUsage,
};
pub use response_synthesizer::{
    Exchange, RedirectRequest, ResponseSynthesizer, SynthesisError, SynthesisRequest,
};
pub use session_archive::{ArchiveError, SessionArchive};
pub use session_store::{SessionStore, SessionStoreError};
