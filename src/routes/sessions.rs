use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::session::{CreateSessionRequest, SessionSummary},
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Routes handling the session lifecycle.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", post(create_session).get(list_sessions))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/complete", post(complete_session))
}

/// Schedule a new session.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session created", body = SessionSummary)
    )
)]
pub async fn create_session(
    State(state): State<SharedState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<SessionSummary>, AppError> {
    payload.validate()?;
    let summary = session_service::create_session(&state, payload).await?;
    Ok(Json(summary))
}

/// List every known session.
#[utoipa::path(
    get,
    path = "/sessions",
    tag = "sessions",
    responses(
        (status = 200, description = "Known sessions", body = Vec<SessionSummary>)
    )
)]
pub async fn list_sessions(
    State(state): State<SharedState>,
) -> Result<Json<Vec<SessionSummary>>, AppError> {
    let sessions = session_service::list_sessions(&state).await?;
    Ok(Json(sessions))
}

/// Fetch one session.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    responses(
        (status = 200, description = "Session found", body = SessionSummary)
    )
)]
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    let summary = session_service::get_session(&state, id).await?;
    Ok(Json(summary))
}

/// Delete a session and everything it owns.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    responses(
        (status = 200, description = "Session deleted")
    )
)]
pub async fn delete_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<(), AppError> {
    session_service::delete_session(&state, id).await?;
    Ok(())
}

/// Close a session to further roster changes. Irreversible.
#[utoipa::path(
    post,
    path = "/sessions/{id}/complete",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    responses(
        (status = 200, description = "Session completed", body = SessionSummary)
    )
)]
pub async fn complete_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    let summary = session_service::complete_session(&state, id).await?;
    Ok(Json(summary))
}
