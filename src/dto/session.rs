use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{dao::models::SessionEntity, dto::format_system_time};

/// Payload used to schedule a new session.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSessionRequest {
    /// RFC 3339 date and time of play.
    pub scheduled_at: String,
    /// Venue of the session.
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: String,
    /// Confirmed-roster capacity; forced admissions may exceed it.
    #[validate(range(min = 1, message = "max_players must be positive"))]
    pub max_players: u32,
}

/// Summary of a session returned by every session endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSummary {
    /// Identifier of the session.
    pub id: Uuid,
    /// RFC 3339 date and time of play.
    pub scheduled_at: String,
    /// Venue of the session.
    pub location: String,
    /// Confirmed-roster capacity.
    pub max_players: u32,
    /// Whether the session has been closed.
    pub completed: bool,
}

impl From<SessionEntity> for SessionSummary {
    fn from(value: SessionEntity) -> Self {
        Self {
            id: value.id,
            scheduled_at: format_system_time(value.scheduled_at),
            location: value.location,
            max_players: value.max_players,
            completed: value.completed,
        }
    }
}
