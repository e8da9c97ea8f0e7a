use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Distribution algorithm used when forming teams.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FormationStrategy {
    /// Shuffle individuals, then fill the smallest team first.
    Even,
    /// Sort individuals by rating and fill the lowest-rated team first.
    Balanced,
}

/// Payload used to (re)form the teams of a session.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct FormTeamsRequest {
    /// How many teams to form.
    #[validate(range(min = 2, message = "num_teams must be at least 2"))]
    pub num_teams: u32,
    /// Distribution algorithm.
    pub strategy: FormationStrategy,
    /// Optional RNG seed making an even-distribution run reproducible.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// One member of a formed team.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamMemberView {
    /// Participant identifier.
    pub participant_id: Uuid,
    /// Display name of the participant.
    pub display_name: String,
    /// Current Elo rating.
    pub rating: i32,
}

/// One formed team as returned to callers.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamView {
    /// 1-based team number unique within the session.
    pub team_number: u32,
    /// Members in assignment order.
    pub members: Vec<TeamMemberView>,
}

/// Every team of a session, ordered by team number.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamsResponse {
    /// Formed teams; some may be empty when the roster is small.
    pub teams: Vec<TeamView>,
}
