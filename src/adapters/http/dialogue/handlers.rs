//! HTTP handlers for dialogue endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::dialogue::{
    CreateSessionCommand, DeleteSessionCommand, DialogueError, DialogueManager, GetMetricsQuery,
    ProcessMessageCommand, ResetSessionCommand,
};
use crate::domain::foundation::{ErrorCode, SessionId};
use crate::domain::persuasion::{Condition, DonationContext};

use super::dto::{
    BannerResponse, CreateSessionRequest, CreateSessionResponse, ErrorResponse, HealthResponse,
    MessageRequest, MessageResponse, ResetSessionResponse, ScenarioResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DialogueHandlers {
    pub(crate) manager: Arc<DialogueManager>,
    /// Expose internal error details in 5xx bodies
    pub(crate) verbose_errors: bool,
}

impl DialogueHandlers {
    pub fn new(manager: Arc<DialogueManager>) -> Self {
        Self {
            manager,
            verbose_errors: false,
        }
    }

    pub fn with_verbose_errors(mut self, verbose: bool) -> Self {
        self.verbose_errors = verbose;
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /
pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "ATLAS API - Adaptive Trust Limited Action System".to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        backend: "running".to_string(),
    })
}

/// POST /api/session/create
pub async fn create_session(
    State(handlers): State<DialogueHandlers>,
    Json(req): Json<CreateSessionRequest>,
) -> Response {
    let condition = match req.condition.parse::<Condition>() {
        Ok(condition) => condition,
        Err(_) => {
            return handle_dialogue_error(
                DialogueError::InvalidCondition("Condition must be 'C1' or 'C3'".to_string()),
                handlers.verbose_errors,
            )
        }
    };
    let cmd = CreateSessionCommand {
        condition,
        context: req.donation_context.unwrap_or_default(),
    };

    match handlers.manager.create_session(cmd).await {
        Ok(result) => Json(CreateSessionResponse {
            session_id: result.session_id.to_string(),
            opening_message: result.opening_message,
            condition: result.condition.to_string(),
        })
        .into_response(),
        Err(e) => handle_dialogue_error(e, handlers.verbose_errors),
    }
}

/// POST /api/session/message
pub async fn process_message(
    State(handlers): State<DialogueHandlers>,
    Json(req): Json<MessageRequest>,
) -> Response {
    let session_id = match parse_session_id(&req.session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let cmd = ProcessMessageCommand {
        session_id,
        message: req.message,
    };

    match handlers.manager.process(cmd).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => handle_dialogue_error(e, handlers.verbose_errors),
    }
}

/// GET /api/session/:id/metrics
pub async fn get_metrics(
    State(handlers): State<DialogueHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.manager.metrics(GetMetricsQuery { session_id }).await {
        Ok(metrics) => Json(metrics).into_response(),
        Err(e) => handle_dialogue_error(e, handlers.verbose_errors),
    }
}

/// POST /api/session/:id/reset
pub async fn reset_session(
    State(handlers): State<DialogueHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .manager
        .reset_session(ResetSessionCommand { session_id })
        .await
    {
        Ok(result) => Json(ResetSessionResponse {
            session_id: result.session_id.to_string(),
            opening_message: result.opening_message,
            message: "Session reset".to_string(),
        })
        .into_response(),
        Err(e) => handle_dialogue_error(e, handlers.verbose_errors),
    }
}

/// DELETE /api/session/:id
pub async fn delete_session(
    State(handlers): State<DialogueHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .manager
        .delete_session(DeleteSessionCommand { session_id })
        .await
    {
        Ok(()) => Json(MessageResponse {
            message: "Session deleted and saved".to_string(),
        })
        .into_response(),
        Err(e) => handle_dialogue_error(e, handlers.verbose_errors),
    }
}

/// POST /api/scenario/setup - Validate and echo a campaign description
pub async fn setup_scenario(Json(context): Json<DonationContext>) -> Response {
    match context.validate() {
        Ok(()) => Json(ScenarioResponse {
            donation_context: context,
        })
        .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        )
            .into_response(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session ID")),
        )
            .into_response()
    })
}

pub(crate) fn error_status(error: &DialogueError) -> StatusCode {
    match error {
        DialogueError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        DialogueError::InvalidCondition(_) | DialogueError::Validation(_) => {
            StatusCode::BAD_REQUEST
        }
        DialogueError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_body(error: &DialogueError, verbose: bool) -> ErrorResponse {
    match error {
        DialogueError::SessionNotFound(id) => ErrorResponse::not_found("Session", id.as_str()),
        DialogueError::Store(e) => {
            tracing::error!(error = %e, "session store failure");
            if verbose {
                ErrorResponse::new(ErrorCode::StorageError, e.to_string())
            } else {
                ErrorResponse::internal("Internal server error")
            }
        }
        other => ErrorResponse::new(other.code(), other.to_string()),
    }
}

fn handle_dialogue_error(error: DialogueError, verbose: bool) -> Response {
    (error_status(&error), Json(error_body(&error, verbose))).into_response()
}
