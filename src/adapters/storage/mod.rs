//! Storage Adapters
//!
//! - **InMemorySessionStore** - live sessions keyed by id
//! - **JsonlSessionArchive** - append-only JSON-lines log of finished sessions
//! - **InMemorySessionArchive** - archive kept in memory (testing)

mod in_memory_session_archive;
mod in_memory_session_store;
mod jsonl_session_archive;

pub use in_memory_session_archive::InMemorySessionArchive;
pub use in_memory_session_store::InMemorySessionStore;
pub use jsonl_session_archive::JsonlSessionArchive;
