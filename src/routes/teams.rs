use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::team::{FormTeamsRequest, TeamsResponse},
    error::AppError,
    services::team_service,
    state::SharedState,
};

/// Routes handling team formation.
pub fn router() -> Router<SharedState> {
    Router::new().route("/sessions/{id}/teams", post(form_teams).get(list_teams))
}

/// Form a session's teams from scratch, replacing any previous ones.
#[utoipa::path(
    post,
    path = "/sessions/{id}/teams",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    request_body = FormTeamsRequest,
    responses(
        (status = 200, description = "Teams formed", body = TeamsResponse)
    )
)]
pub async fn form_teams(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FormTeamsRequest>,
) -> Result<Json<TeamsResponse>, AppError> {
    payload.validate()?;
    let teams = team_service::form_teams(&state, id, payload).await?;
    Ok(Json(teams))
}

/// List a session's current teams.
#[utoipa::path(
    get,
    path = "/sessions/{id}/teams",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    responses(
        (status = 200, description = "Current teams", body = TeamsResponse)
    )
)]
pub async fn list_teams(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamsResponse>, AppError> {
    let teams = team_service::list_teams(&state, id).await?;
    Ok(Json(teams))
}
