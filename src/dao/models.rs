use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Global skill record for a player, shared across sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantEntity {
    /// Externally assigned stable identifier.
    pub id: Uuid,
    /// Display name shown on rosters and teams.
    pub display_name: String,
    /// Current Elo rating.
    pub rating: i32,
    /// Completed matches this participant took part in.
    pub games_played: u32,
    /// Matches this participant's team won. Never exceeds `games_played`.
    pub wins: u32,
}

impl ParticipantEntity {
    /// Build a fresh record for a participant seen for the first time.
    pub fn new(id: Uuid, display_name: String, default_rating: i32) -> Self {
        Self {
            id,
            display_name,
            rating: default_rating,
            games_played: 0,
            wins: 0,
        }
    }
}

/// A scheduled meetup that owns its RSVPs, groups, teams, and matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionEntity {
    /// Primary key of the session.
    pub id: Uuid,
    /// Scheduled date and time of play.
    pub scheduled_at: SystemTime,
    /// Where the session takes place.
    pub location: String,
    /// Confirmed-roster capacity for organic RSVPs.
    pub max_players: u32,
    /// Set once when the session is closed; never cleared.
    pub completed: bool,
}

/// Admission state of an RSVP entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    /// Holds a roster spot.
    Confirmed,
    /// Queued for promotion when a confirmed spot frees up.
    Waitlist,
}

/// One participant's RSVP for one session. Unique per (session, participant).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RsvpEntity {
    /// Session this entry belongs to.
    pub session_id: Uuid,
    /// Participant who RSVP'd.
    pub participant_id: Uuid,
    /// Confirmed or waitlisted.
    pub status: RsvpStatus,
    /// Arrival order used for replay and FIFO promotion; unique per session.
    /// Organic joins count up from 1, forced admissions sit in a negative
    /// range so they always sort first.
    pub order_position: i64,
}

/// Named cluster of participants kept together during team formation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupEntity {
    /// Stable identifier for the group.
    pub id: Uuid,
    /// Session this group belongs to.
    pub session_id: Uuid,
    /// Name unique within the session.
    pub name: String,
    /// Member participant ids in registration order.
    pub members: Vec<Uuid>,
}

/// One formed team for a session. Rebuilt from scratch on every formation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Session this team belongs to.
    pub session_id: Uuid,
    /// 1-based team number unique within the session.
    pub team_number: u32,
    /// Member participant ids in assignment order.
    pub members: Vec<Uuid>,
}

/// A match between two of a session's teams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEntity {
    /// Primary key of the match.
    pub id: Uuid,
    /// Session this match belongs to.
    pub session_id: Uuid,
    /// First team.
    pub team_a: Uuid,
    /// Second team.
    pub team_b: Uuid,
    /// Winning team, set exactly once at completion.
    pub winner: Option<Uuid>,
    /// Whether the outcome has been declared and ratings applied.
    pub completed: bool,
}
