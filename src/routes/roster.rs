use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::roster::{
        BulkAdmitRequest, BulkAdmitResponse, BulkRemoveRequest, JoinRequest, RosterResponse,
        RsvpView,
    },
    error::AppError,
    services::roster_service,
    state::SharedState,
};

/// Routes handling RSVPs and the waitlist.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/sessions/{id}/rsvps",
            post(join).get(list_roster).delete(bulk_remove),
        )
        .route("/sessions/{id}/rsvps/{participant_id}", delete(leave))
        .route("/sessions/{id}/rsvps/bulk", post(bulk_admit))
}

/// RSVP a participant; confirmed while room remains, waitlisted otherwise.
#[utoipa::path(
    post,
    path = "/sessions/{id}/rsvps",
    tag = "roster",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    request_body = JoinRequest,
    responses(
        (status = 200, description = "RSVP recorded (confirmed or waitlisted)", body = RsvpView)
    )
)]
pub async fn join(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JoinRequest>,
) -> Result<Json<RsvpView>, AppError> {
    payload.validate()?;
    let view = roster_service::join(&state, id, payload).await?;
    Ok(Json(view))
}

/// List the confirmed roster and the waitlist in arrival order.
#[utoipa::path(
    get,
    path = "/sessions/{id}/rsvps",
    tag = "roster",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    responses(
        (status = 200, description = "Current roster", body = RosterResponse)
    )
)]
pub async fn list_roster(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RosterResponse>, AppError> {
    let roster = roster_service::list(&state, id).await?;
    Ok(Json(roster))
}

/// Withdraw a participant's RSVP, promoting the waitlist head if needed.
#[utoipa::path(
    delete,
    path = "/sessions/{id}/rsvps/{participant_id}",
    tag = "roster",
    params(
        ("id" = Uuid, Path, description = "Identifier of the session"),
        ("participant_id" = Uuid, Path, description = "Participant withdrawing")
    ),
    responses(
        (status = 200, description = "RSVP withdrawn")
    )
)]
pub async fn leave(
    State(state): State<SharedState>,
    Path((id, participant_id)): Path<(Uuid, Uuid)>,
) -> Result<(), AppError> {
    roster_service::leave(&state, id, participant_id).await?;
    Ok(())
}

/// Force participants onto the confirmed roster, bypassing capacity.
#[utoipa::path(
    post,
    path = "/sessions/{id}/rsvps/bulk",
    tag = "roster",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    request_body = BulkAdmitRequest,
    responses(
        (status = 200, description = "Forced admission applied", body = BulkAdmitResponse)
    )
)]
pub async fn bulk_admit(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BulkAdmitRequest>,
) -> Result<Json<BulkAdmitResponse>, AppError> {
    payload.validate()?;
    let outcome = roster_service::bulk_admit(&state, id, payload).await?;
    Ok(Json(outcome))
}

/// Remove several participants from the roster in one pass.
#[utoipa::path(
    delete,
    path = "/sessions/{id}/rsvps",
    tag = "roster",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    request_body = BulkRemoveRequest,
    responses(
        (status = 200, description = "Remaining roster", body = RosterResponse)
    )
)]
pub async fn bulk_remove(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BulkRemoveRequest>,
) -> Result<Json<RosterResponse>, AppError> {
    payload.validate()?;
    let roster = roster_service::remove_many(&state, id, payload).await?;
    Ok(Json(roster))
}
