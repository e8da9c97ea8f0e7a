use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::group::{CreateGroupRequest, GroupView},
    error::AppError,
    services::group_service,
    state::SharedState,
};

/// Routes handling groups kept together during team formation.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions/{id}/groups", post(create_group).get(list_groups))
        .route("/sessions/{id}/groups/{name}", delete(delete_group))
}

/// Register a group whose members must land on the same team.
#[utoipa::path(
    post,
    path = "/sessions/{id}/groups",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    request_body = CreateGroupRequest,
    responses(
        (status = 200, description = "Group registered", body = GroupView)
    )
)]
pub async fn create_group(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<Json<GroupView>, AppError> {
    payload.validate()?;
    let view = group_service::create_group(&state, id, payload).await?;
    Ok(Json(view))
}

/// List a session's groups in creation order.
#[utoipa::path(
    get,
    path = "/sessions/{id}/groups",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    responses(
        (status = 200, description = "Registered groups", body = Vec<GroupView>)
    )
)]
pub async fn list_groups(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<GroupView>>, AppError> {
    let groups = group_service::list_groups(&state, id).await?;
    Ok(Json(groups))
}

/// Remove a group by name.
#[utoipa::path(
    delete,
    path = "/sessions/{id}/groups/{name}",
    tag = "groups",
    params(
        ("id" = Uuid, Path, description = "Identifier of the session"),
        ("name" = String, Path, description = "Name of the group")
    ),
    responses(
        (status = 200, description = "Group deleted")
    )
)]
pub async fn delete_group(
    State(state): State<SharedState>,
    Path((id, name)): Path<(Uuid, String)>,
) -> Result<(), AppError> {
    group_service::delete_group(&state, id, name).await?;
    Ok(())
}
