//! Session lifecycle: creation, lookup, deletion, and irreversible completion.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{models::SessionEntity, record_store::RecordStore},
    dto::{parse_system_time, session::CreateSessionRequest, session::SessionSummary},
    error::ServiceError,
    state::SharedState,
};

/// Schedule a new session.
pub async fn create_session(
    state: &SharedState,
    request: CreateSessionRequest,
) -> Result<SessionSummary, ServiceError> {
    let store = state.require_record_store().await?;

    if request.max_players == 0 {
        return Err(ServiceError::InvalidInput(
            "max_players must be positive".into(),
        ));
    }

    let scheduled_at = parse_system_time(&request.scheduled_at).map_err(|err| {
        ServiceError::InvalidInput(format!(
            "scheduled_at must be an RFC 3339 timestamp: {err}"
        ))
    })?;

    let session = SessionEntity {
        id: Uuid::new_v4(),
        scheduled_at,
        location: request.location,
        max_players: request.max_players,
        completed: false,
    };
    store.insert_session(session.clone()).await?;
    info!(session_id = %session.id, max_players = session.max_players, "session created");

    Ok(session.into())
}

/// Fetch one session.
pub async fn get_session(state: &SharedState, id: Uuid) -> Result<SessionSummary, ServiceError> {
    let store = state.require_record_store().await?;
    let session = load_session(&store, id).await?;
    Ok(session.into())
}

/// List every known session in creation order.
pub async fn list_sessions(state: &SharedState) -> Result<Vec<SessionSummary>, ServiceError> {
    let store = state.require_record_store().await?;
    let sessions = store.list_sessions().await?;
    Ok(sessions.into_iter().map(Into::into).collect())
}

/// Delete a session, cascading to its RSVPs, groups, teams, and matches.
pub async fn delete_session(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_record_store().await?;
    load_session(&store, id).await?;
    let gate = state.session_gate(id);
    let _guard = gate.lock().await;

    load_session(&store, id).await?;
    store.delete_session(id).await?;
    state.forget_session_gate(id);
    info!(session_id = %id, "session deleted");
    Ok(())
}

/// Close a session to further RSVP mutation. Irreversible.
pub async fn complete_session(state: &SharedState, id: Uuid) -> Result<SessionSummary, ServiceError> {
    let store = state.require_record_store().await?;
    load_session(&store, id).await?;
    let gate = state.session_gate(id);
    let _guard = gate.lock().await;

    let session = load_session(&store, id).await?;
    if session.completed {
        return Err(ServiceError::Conflict(format!(
            "session `{id}` is already completed"
        )));
    }
    store.set_session_completed(id).await?;
    info!(session_id = %id, "session completed");

    let session = load_session(&store, id).await?;
    Ok(session.into())
}

/// Load a session or fail with `NotFound`.
pub(crate) async fn load_session(
    store: &Arc<dyn RecordStore>,
    id: Uuid,
) -> Result<SessionEntity, ServiceError> {
    store
        .find_session(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("session `{id}` not found")))
}
