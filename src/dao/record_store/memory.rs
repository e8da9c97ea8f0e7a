//! In-memory reference implementation of the record store.
//!
//! Backs the default deployment and every integration test. All operations
//! resolve synchronously; the trait's futures are satisfied with
//! already-ready values.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use futures::FutureExt;
use futures::future::{self, BoxFuture};
use indexmap::IndexMap;
use uuid::Uuid;

use crate::dao::models::{
    GroupEntity, MatchEntity, ParticipantEntity, RsvpEntity, RsvpStatus, SessionEntity, TeamEntity,
};
use crate::dao::record_store::RecordStore;
use crate::dao::storage::{StorageError, StorageResult};

/// DashMap/IndexMap backed store; cheap to clone, shared via `Arc`.
#[derive(Default)]
pub struct MemoryStore {
    inner: Arc<Tables>,
}

#[derive(Default)]
struct Tables {
    participants: DashMap<Uuid, ParticipantEntity>,
    sessions: RwLock<IndexMap<Uuid, SessionEntity>>,
    rsvps: DashMap<Uuid, Vec<RsvpEntity>>,
    groups: DashMap<Uuid, Vec<GroupEntity>>,
    teams: DashMap<Uuid, Vec<TeamEntity>>,
    matches: RwLock<IndexMap<Uuid, MatchEntity>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn ready<T: Send + 'static>(value: StorageResult<T>) -> BoxFuture<'static, StorageResult<T>> {
    future::ready(value).boxed()
}

impl RecordStore for MemoryStore {
    fn find_participant(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ParticipantEntity>>> {
        let found = self.inner.participants.get(&id).map(|row| row.clone());
        ready(Ok(found))
    }

    fn upsert_participant(
        &self,
        participant: ParticipantEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.inner
            .participants
            .insert(participant.id, participant);
        ready(Ok(()))
    }

    fn insert_session(&self, session: SessionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let mut sessions = self.inner.sessions.write().expect("sessions lock poisoned");
        sessions.insert(session.id, session);
        ready(Ok(()))
    }

    fn find_session(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<SessionEntity>>> {
        let sessions = self.inner.sessions.read().expect("sessions lock poisoned");
        ready(Ok(sessions.get(&id).cloned()))
    }

    fn list_sessions(&self) -> BoxFuture<'static, StorageResult<Vec<SessionEntity>>> {
        let sessions = self.inner.sessions.read().expect("sessions lock poisoned");
        ready(Ok(sessions.values().cloned().collect()))
    }

    fn set_session_completed(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let mut sessions = self.inner.sessions.write().expect("sessions lock poisoned");
        let result = match sessions.get_mut(&id) {
            Some(session) => {
                session.completed = true;
                Ok(())
            }
            None => Err(StorageError::MissingRecord(format!("session {id}"))),
        };
        ready(result)
    }

    fn delete_session(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        {
            let mut sessions = self.inner.sessions.write().expect("sessions lock poisoned");
            sessions.shift_remove(&id);
        }
        self.inner.rsvps.remove(&id);
        self.inner.groups.remove(&id);
        self.inner.teams.remove(&id);
        let mut matches = self.inner.matches.write().expect("matches lock poisoned");
        matches.retain(|_, game| game.session_id != id);
        ready(Ok(()))
    }

    fn insert_rsvp(&self, rsvp: RsvpEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner
            .rsvps
            .entry(rsvp.session_id)
            .or_default()
            .push(rsvp);
        ready(Ok(()))
    }

    fn delete_rsvp(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<RsvpEntity>>> {
        let removed = self.inner.rsvps.get_mut(&session_id).and_then(|mut rows| {
            rows.iter()
                .position(|row| row.participant_id == participant_id)
                .map(|index| rows.remove(index))
        });
        ready(Ok(removed))
    }

    fn update_rsvp_status(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        status: RsvpStatus,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let result = match self.inner.rsvps.get_mut(&session_id).and_then(|mut rows| {
            rows.iter_mut()
                .find(|row| row.participant_id == participant_id)
                .map(|row| row.status = status)
        }) {
            Some(()) => Ok(()),
            None => Err(StorageError::MissingRecord(format!(
                "rsvp ({session_id}, {participant_id})"
            ))),
        };
        ready(result)
    }

    fn update_rsvp_position(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        order_position: i64,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let result = match self.inner.rsvps.get_mut(&session_id).and_then(|mut rows| {
            rows.iter_mut()
                .find(|row| row.participant_id == participant_id)
                .map(|row| row.order_position = order_position)
        }) {
            Some(()) => Ok(()),
            None => Err(StorageError::MissingRecord(format!(
                "rsvp ({session_id}, {participant_id})"
            ))),
        };
        ready(result)
    }

    fn list_rsvps(&self, session_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<RsvpEntity>>> {
        let mut rows = self
            .inner
            .rsvps
            .get(&session_id)
            .map(|rows| rows.clone())
            .unwrap_or_default();
        rows.sort_by_key(|row| row.order_position);
        ready(Ok(rows))
    }

    fn insert_group(&self, group: GroupEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner
            .groups
            .entry(group.session_id)
            .or_default()
            .push(group);
        ready(Ok(()))
    }

    fn list_groups(&self, session_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<GroupEntity>>> {
        let rows = self
            .inner
            .groups
            .get(&session_id)
            .map(|rows| rows.clone())
            .unwrap_or_default();
        ready(Ok(rows))
    }

    fn delete_group(
        &self,
        session_id: Uuid,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<GroupEntity>>> {
        let removed = self.inner.groups.get_mut(&session_id).and_then(|mut rows| {
            rows.iter()
                .position(|row| row.name == name)
                .map(|index| rows.remove(index))
        });
        ready(Ok(removed))
    }

    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner
            .teams
            .entry(team.session_id)
            .or_default()
            .push(team);
        ready(Ok(()))
    }

    fn delete_teams(&self, session_id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.teams.remove(&session_id);
        ready(Ok(()))
    }

    fn list_teams(&self, session_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let mut rows = self
            .inner
            .teams
            .get(&session_id)
            .map(|rows| rows.clone())
            .unwrap_or_default();
        rows.sort_by_key(|row| row.team_number);
        ready(Ok(rows))
    }

    fn insert_match(&self, game: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let mut matches = self.inner.matches.write().expect("matches lock poisoned");
        matches.insert(game.id, game);
        ready(Ok(()))
    }

    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let matches = self.inner.matches.read().expect("matches lock poisoned");
        ready(Ok(matches.get(&id).cloned()))
    }

    fn complete_match(&self, id: Uuid, winner: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let mut matches = self.inner.matches.write().expect("matches lock poisoned");
        let result = match matches.get_mut(&id) {
            Some(game) => {
                game.winner = Some(winner);
                game.completed = true;
                Ok(())
            }
            None => Err(StorageError::MissingRecord(format!("match {id}"))),
        };
        ready(result)
    }

    fn list_matches(
        &self,
        session_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let matches = self.inner.matches.read().expect("matches lock poisoned");
        let rows = matches
            .values()
            .filter(|game| game.session_id == session_id)
            .cloned()
            .collect();
        ready(Ok(rows))
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn session(id: Uuid) -> SessionEntity {
        SessionEntity {
            id,
            scheduled_at: SystemTime::now(),
            location: "beach court".into(),
            max_players: 12,
            completed: false,
        }
    }

    #[tokio::test]
    async fn rsvps_come_back_sorted_by_position() {
        let store = MemoryStore::new();
        let session_id = Uuid::new_v4();
        for position in [3, -5, 1] {
            store
                .insert_rsvp(RsvpEntity {
                    session_id,
                    participant_id: Uuid::new_v4(),
                    status: RsvpStatus::Confirmed,
                    order_position: position,
                })
                .await
                .unwrap();
        }

        let rows = store.list_rsvps(session_id).await.unwrap();
        let positions: Vec<i64> = rows.iter().map(|row| row.order_position).collect();
        assert_eq!(positions, vec![-5, 1, 3]);
    }

    #[tokio::test]
    async fn deleting_a_session_cascades() {
        let store = MemoryStore::new();
        let session_id = Uuid::new_v4();
        store.insert_session(session(session_id)).await.unwrap();
        store
            .insert_rsvp(RsvpEntity {
                session_id,
                participant_id: Uuid::new_v4(),
                status: RsvpStatus::Confirmed,
                order_position: 1,
            })
            .await
            .unwrap();
        store
            .insert_group(GroupEntity {
                id: Uuid::new_v4(),
                session_id,
                name: "carpool".into(),
                members: vec![Uuid::new_v4()],
            })
            .await
            .unwrap();
        let team_id = Uuid::new_v4();
        store
            .insert_team(TeamEntity {
                id: team_id,
                session_id,
                team_number: 1,
                members: vec![],
            })
            .await
            .unwrap();
        store
            .insert_match(MatchEntity {
                id: Uuid::new_v4(),
                session_id,
                team_a: team_id,
                team_b: team_id,
                winner: None,
                completed: false,
            })
            .await
            .unwrap();

        store.delete_session(session_id).await.unwrap();

        assert!(store.find_session(session_id).await.unwrap().is_none());
        assert!(store.list_rsvps(session_id).await.unwrap().is_empty());
        assert!(store.list_groups(session_id).await.unwrap().is_empty());
        assert!(store.list_teams(session_id).await.unwrap().is_empty());
        assert!(store.list_matches(session_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn completing_a_missing_match_reports_missing_record() {
        let store = MemoryStore::new();
        let err = store
            .complete_match(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::MissingRecord(_)));
    }
}
