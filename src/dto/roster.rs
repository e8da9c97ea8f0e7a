use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dao::models::RsvpStatus;

/// Payload for a participant RSVPing to a session.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct JoinRequest {
    /// Externally assigned participant identifier.
    pub participant_id: Uuid,
    /// Display name recorded on the participant's first appearance.
    #[validate(length(min = 1, message = "display_name must not be empty"))]
    pub display_name: String,
}

/// One roster entry as returned to callers.
#[derive(Debug, Serialize, ToSchema)]
pub struct RsvpView {
    /// Participant this entry belongs to.
    pub participant_id: Uuid,
    /// Display name of the participant.
    pub display_name: String,
    /// Confirmed or waitlisted.
    pub status: RsvpStatus,
    /// Arrival order within the session.
    pub order_position: i64,
}

/// Confirmed and waitlisted entries for a session, each in arrival order.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterResponse {
    /// Entries holding a roster spot.
    pub confirmed: Vec<RsvpView>,
    /// Entries queued for promotion.
    pub waitlist: Vec<RsvpView>,
}

/// One participant of a forced-admission batch.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct ParticipantInput {
    /// Externally assigned participant identifier.
    pub participant_id: Uuid,
    /// Display name recorded on the participant's first appearance.
    #[validate(length(min = 1, message = "display_name must not be empty"))]
    pub display_name: String,
}

/// Planner request to force participants onto the confirmed roster.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct BulkAdmitRequest {
    /// Participants to admit, in the order they should appear.
    #[validate(length(min = 1, message = "participants must not be empty"))]
    #[validate(nested)]
    pub participants: Vec<ParticipantInput>,
}

/// Outcome of a forced-admission batch.
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkAdmitResponse {
    /// Participants inserted as confirmed.
    pub admitted: Vec<Uuid>,
    /// Participants skipped because they already had an entry.
    pub skipped: Vec<Uuid>,
}

/// Planner request to remove several participants from a session.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct BulkRemoveRequest {
    /// Participants whose entries should be removed.
    #[validate(length(min = 1, message = "participant_ids must not be empty"))]
    pub participant_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(display_name: &str) -> ParticipantInput {
        ParticipantInput {
            participant_id: Uuid::new_v4(),
            display_name: display_name.into(),
        }
    }

    #[test]
    fn bulk_admit_requires_at_least_one_participant() {
        let empty = BulkAdmitRequest {
            participants: vec![],
        };
        assert!(empty.validate().is_err());

        let filled = BulkAdmitRequest {
            participants: vec![input("ana")],
        };
        assert!(filled.validate().is_ok());
    }

    #[test]
    fn bulk_admit_validates_nested_display_names() {
        let blank = BulkAdmitRequest {
            participants: vec![input("")],
        };
        assert!(blank.validate().is_err());
    }
}
