//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - Hosted model providers and response synthesizers
//! - `storage` - Session store and archive implementations
//! - `http` - REST API (axum)
//! - `websocket` - Turn stream over WebSocket

pub mod ai;
pub mod http;
pub mod storage;
pub mod websocket;
