pub mod memory;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{
    GroupEntity, MatchEntity, ParticipantEntity, RsvpEntity, RsvpStatus, SessionEntity, TeamEntity,
};
use crate::dao::storage::StorageResult;

/// Abstraction over the transactional record store backing the engine.
///
/// Backends own durability only. Ordering guarantees are part of the
/// contract: `list_rsvps` sorts by order position, `list_groups` preserves
/// creation order, and `list_teams` sorts by team number.
pub trait RecordStore: Send + Sync {
    /// Fetch a participant's global rating row.
    fn find_participant(&self, id: Uuid)
    -> BoxFuture<'static, StorageResult<Option<ParticipantEntity>>>;
    /// Insert or fully replace a participant's rating row.
    fn upsert_participant(
        &self,
        participant: ParticipantEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;

    /// Persist a new session.
    fn insert_session(&self, session: SessionEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a session by id.
    fn find_session(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<SessionEntity>>>;
    /// List every known session in creation order.
    fn list_sessions(&self) -> BoxFuture<'static, StorageResult<Vec<SessionEntity>>>;
    /// Set a session's irreversible completed flag.
    fn set_session_completed(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete a session and cascade to its RSVPs, groups, teams, and matches.
    fn delete_session(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>>;

    /// Insert a new RSVP entry.
    fn insert_rsvp(&self, rsvp: RsvpEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Remove and return the entry for (session, participant), if any.
    fn delete_rsvp(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<RsvpEntity>>>;
    /// Update the admission status of an existing entry.
    fn update_rsvp_status(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        status: RsvpStatus,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Update the order position of an existing entry.
    fn update_rsvp_position(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        order_position: i64,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// List a session's entries ordered by ascending order position.
    fn list_rsvps(&self, session_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<RsvpEntity>>>;

    /// Persist a new group.
    fn insert_group(&self, group: GroupEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// List a session's groups in creation order.
    fn list_groups(&self, session_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<GroupEntity>>>;
    /// Remove a group by name, returning it if it existed.
    fn delete_group(
        &self,
        session_id: Uuid,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<GroupEntity>>>;

    /// Persist a formed team.
    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Drop every team for a session ahead of a fresh formation run.
    fn delete_teams(&self, session_id: Uuid) -> BoxFuture<'static, StorageResult<()>>;
    /// List a session's teams ordered by team number.
    fn list_teams(&self, session_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;

    /// Persist a new match.
    fn insert_match(&self, game: MatchEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a match by id.
    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>>;
    /// Record a match outcome: winner set and completed flag raised.
    fn complete_match(&self, id: Uuid, winner: Uuid) -> BoxFuture<'static, StorageResult<()>>;
    /// List a session's matches in creation order.
    fn list_matches(&self, session_id: Uuid)
    -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>>;

    /// Cheap connectivity probe used by the health endpoint.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
