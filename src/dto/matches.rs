use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::MatchEntity;

/// Payload used to record a match between two formed teams, referenced by
/// their team numbers from the latest formation run.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMatchRequest {
    /// Team number of the first side.
    pub team_a: u32,
    /// Team number of the second side.
    pub team_b: u32,
}

/// One match as returned to callers. Teams are referenced by their stable
/// ids so a later formation run cannot change what a match points at.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchView {
    /// Identifier of the match.
    pub id: Uuid,
    /// Team id of the first side.
    pub team_a: Uuid,
    /// Team id of the second side.
    pub team_b: Uuid,
    /// Team id of the winner, once declared.
    pub winner: Option<Uuid>,
    /// Whether the outcome has been declared.
    pub completed: bool,
}

impl From<MatchEntity> for MatchView {
    fn from(value: MatchEntity) -> Self {
        Self {
            id: value.id,
            team_a: value.team_a,
            team_b: value.team_b,
            winner: value.winner,
            completed: value.completed,
        }
    }
}

/// Payload used to declare the winner of a match.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeclareWinnerRequest {
    /// Team id of the winning side.
    pub winning_team: Uuid,
}

/// Rating movement of one participant after a completed match.
#[derive(Debug, Serialize, ToSchema)]
pub struct RatingChangeView {
    /// Participant whose rating moved.
    pub participant_id: Uuid,
    /// Rating before the match.
    pub old_rating: i32,
    /// Rating after the match.
    pub new_rating: i32,
}

/// Outcome of a declared match, including every rating movement.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchResultView {
    /// Identifier of the match.
    pub id: Uuid,
    /// Team id of the winning side.
    pub winner: Uuid,
    /// Rating movement for every member of both teams.
    pub rating_changes: Vec<RatingChangeView>,
}
