//! HTTP adapter for dialogue endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    BannerResponse, CreateSessionRequest, CreateSessionResponse, ErrorResponse, HealthResponse,
    MessageRequest, MessageResponse, ResetSessionResponse, ScenarioResponse,
};
pub use handlers::DialogueHandlers;
pub(crate) use handlers::{error_body, error_status};
pub use routes::dialogue_routes;
