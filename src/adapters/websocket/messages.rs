//! WebSocket message types for the turn stream.
//!
//! - Server → Client: turn results, errors, pongs
//! - Client → Server: user messages, pings

use serde::{Deserialize, Serialize};

use crate::adapters::http::dialogue::ErrorResponse;
use crate::domain::persuasion::TurnResult;

// ============================================
// Server → Client Messages
// ============================================

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Outcome of one processed user message.
    TurnResult(TurnResult),

    Error(ErrorResponse),

    /// Heartbeat response.
    Pong(PongMessage),
}

#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

// ============================================
// Client → Server Messages
// ============================================

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    SendMessage { content: String },

    /// Heartbeat request.
    Ping,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"send_message","content":"Tell me more"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::SendMessage { content } if content == "Tell me more"));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"shout"}"#).is_err());
    }

    #[test]
    fn server_messages_are_tagged() {
        let json = serde_json::to_value(ServerMessage::Error(ErrorResponse::bad_request("nope")))
            .unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "VALIDATION_FAILED");

        let json = serde_json::to_value(ServerMessage::Pong(PongMessage {
            timestamp: "now".into(),
        }))
        .unwrap();
        assert_eq!(json["type"], "pong");
    }
}
