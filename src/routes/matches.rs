use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::matches::{CreateMatchRequest, DeclareWinnerRequest, MatchResultView, MatchView},
    error::AppError,
    services::match_service,
    state::SharedState,
};

/// Routes handling matches and their outcomes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/sessions/{id}/matches",
            post(create_match).get(list_matches),
        )
        .route("/matches/{id}/winner", post(declare_winner))
}

/// Record a match between two of a session's current teams.
#[utoipa::path(
    post,
    path = "/sessions/{id}/matches",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    request_body = CreateMatchRequest,
    responses(
        (status = 200, description = "Match recorded", body = MatchView)
    )
)]
pub async fn create_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateMatchRequest>,
) -> Result<Json<MatchView>, AppError> {
    let view = match_service::create_match(&state, id, payload).await?;
    Ok(Json(view))
}

/// List a session's matches in creation order.
#[utoipa::path(
    get,
    path = "/sessions/{id}/matches",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    responses(
        (status = 200, description = "Recorded matches", body = Vec<MatchView>)
    )
)]
pub async fn list_matches(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MatchView>>, AppError> {
    let matches = match_service::list_matches(&state, id).await?;
    Ok(Json(matches))
}

/// Declare the winner of a match and apply the rating update. Irreversible.
#[utoipa::path(
    post,
    path = "/matches/{id}/winner",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Identifier of the match")),
    request_body = DeclareWinnerRequest,
    responses(
        (status = 200, description = "Winner declared and ratings applied", body = MatchResultView)
    )
)]
pub async fn declare_winner(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeclareWinnerRequest>,
) -> Result<Json<MatchResultView>, AppError> {
    let result = match_service::declare_winner(&state, id, payload).await?;
    Ok(Json(result))
}
