//! WebSocket upgrade handler for the per-session turn stream.
//!
//! Messages on one connection are processed in arrival order, so a single
//! socket never runs two turns of its session concurrently.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::adapters::http::dialogue::{error_body, error_status, DialogueHandlers, ErrorResponse};
use crate::application::handlers::dialogue::{GetMetricsQuery, ProcessMessageCommand};
use crate::domain::foundation::SessionId;

use super::messages::{ClientMessage, PongMessage, ServerMessage};

/// Outbound messages buffered per connection.
const OUTBOUND_BUFFER: usize = 32;

/// Route: `GET /ws/session/:id`
///
/// Unknown sessions are rejected before the upgrade.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(session_id): Path<String>,
    State(handlers): State<DialogueHandlers>,
) -> Response {
    let session_id: SessionId = match session_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid session ID")),
            )
                .into_response()
        }
    };

    let query = GetMetricsQuery {
        session_id: session_id.clone(),
    };
    if let Err(e) = handlers.manager.metrics(query).await {
        return (
            error_status(&e),
            Json(error_body(&e, handlers.verbose_errors)),
        )
            .into_response();
    }

    ws.on_upgrade(move |socket| handle_socket(socket, session_id, handlers))
}

async fn handle_socket(socket: WebSocket, session_id: SessionId, handlers: DialogueHandlers) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(OUTBOUND_BUFFER);

    tracing::debug!(session_id = %session_id, "websocket connected");

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = send_message(&mut sender, &msg).await {
                tracing::debug!("Send error, closing connection: {}", e);
                break;
            }
        }
    });

    let recv_session = session_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    let reply = handle_client_text(&handlers, &recv_session, &text).await;
                    if tx.send(reply).await.is_err() {
                        break;
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(session_id = %recv_session, "Received unsupported binary message");
                }
                Ok(Message::Close(_)) => break,
                // Protocol pings are answered by axum
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(session_id = %recv_session, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    let client_done = tokio::select! {
        _ = &mut send_task => false,
        _ = &mut recv_task => true,
    };
    if client_done {
        // Flush replies still queued
        let _ = send_task.await;
    } else {
        recv_task.abort();
    }

    tracing::debug!(session_id = %session_id, "websocket closed");
}

async fn handle_client_text(
    handlers: &DialogueHandlers,
    session_id: &SessionId,
    text: &str,
) -> ServerMessage {
    let client_msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(_) => {
            return ServerMessage::Error(ErrorResponse::bad_request("Invalid message format"))
        }
    };

    match client_msg {
        ClientMessage::Ping => ServerMessage::Pong(PongMessage {
            timestamp: Utc::now().to_rfc3339(),
        }),
        ClientMessage::SendMessage { content } => {
            let cmd = ProcessMessageCommand {
                session_id: session_id.clone(),
                message: content,
            };
            match handlers.manager.process(cmd).await {
                Ok(result) => ServerMessage::TurnResult(result),
                Err(e) => ServerMessage::Error(error_body(&e, handlers.verbose_errors)),
            }
        }
    }
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}
