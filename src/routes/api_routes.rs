use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::agent::ChatAgent;
use crate::errors::AppError;
use crate::models::SessionResponse;
use crate::service::chat_service::ChatService;

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET `/api/status`: whether the model credential is configured
pub async fn status_handler<A: ChatAgent>(State(svc): State<ChatService<A>>) -> impl IntoResponse {
    Json(svc.status())
}

/// GET `/api/sessions/{id}`: a session and its completed turns
pub async fn get_session_handler<A: ChatAgent>(
    Path(id): Path<String>,
    State(svc): State<ChatService<A>>,
) -> Response {
    match svc.get_session(&id).await {
        Ok(session) => Json(SessionResponse::from(session)).into_response(),
        Err(e) => error_response(&e),
    }
}

// ── Helper ────────────────────────────────────────────────────────────────────

pub fn status_code(err: &AppError) -> StatusCode {
    if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_configuration() || err.is_agent_unavailable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_response(err: &AppError) -> Response {
    (status_code(err), err.to_string()).into_response()
}
