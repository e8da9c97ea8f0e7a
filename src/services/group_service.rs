//! Group registry: named clusters of participants kept together during team
//! formation, plus the grouped/individual classification of a roster.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{models::GroupEntity, record_store::RecordStore},
    dto::group::{CreateGroupRequest, GroupView},
    error::ServiceError,
    services::{roster_service, session_service::load_session},
    state::SharedState,
};

/// Partition of a session's confirmed roster used by team formation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRoster {
    /// One member list per group, in group creation order; members in
    /// confirmed-roster order. Only nonempty lists appear here.
    pub groups: Vec<Vec<Uuid>>,
    /// Confirmed participants without a group, in confirmed-roster order.
    pub individuals: Vec<Uuid>,
}

/// Register a group whose members must land on the same team.
pub async fn create_group(
    state: &SharedState,
    session_id: Uuid,
    request: CreateGroupRequest,
) -> Result<GroupView, ServiceError> {
    let store = state.require_record_store().await?;
    load_session(&store, session_id).await?;
    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    // Re-check under the gate; the session may have been deleted meanwhile.
    load_session(&store, session_id).await?;
    let existing = store.list_groups(session_id).await?;
    if existing.iter().any(|group| group.name == request.name) {
        return Err(ServiceError::Conflict(format!(
            "group `{}` already exists for session `{session_id}`",
            request.name
        )));
    }

    let mut members = Vec::new();
    let mut seen = HashSet::new();
    for member in request.members {
        if seen.insert(member) {
            members.push(member);
        }
    }
    if members.is_empty() {
        return Err(ServiceError::InvalidInput(
            "a group requires at least one member".into(),
        ));
    }

    // One group per participant per session.
    for group in &existing {
        if let Some(member) = members.iter().find(|member| group.members.contains(member)) {
            return Err(ServiceError::Conflict(format!(
                "participant `{member}` already belongs to group `{}`",
                group.name
            )));
        }
    }

    let group = GroupEntity {
        id: Uuid::new_v4(),
        session_id,
        name: request.name,
        members,
    };
    store.insert_group(group.clone()).await?;
    info!(
        session_id = %session_id,
        group = %group.name,
        members = group.members.len(),
        "group registered"
    );

    Ok(group.into())
}

/// List a session's groups in creation order.
pub async fn list_groups(
    state: &SharedState,
    session_id: Uuid,
) -> Result<Vec<GroupView>, ServiceError> {
    let store = state.require_record_store().await?;
    load_session(&store, session_id).await?;
    let groups = store.list_groups(session_id).await?;
    Ok(groups.into_iter().map(Into::into).collect())
}

/// Remove a group by name.
pub async fn delete_group(
    state: &SharedState,
    session_id: Uuid,
    name: String,
) -> Result<(), ServiceError> {
    let store = state.require_record_store().await?;
    load_session(&store, session_id).await?;
    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    load_session(&store, session_id).await?;
    let removed = store.delete_group(session_id, name.clone()).await?;
    if removed.is_none() {
        return Err(ServiceError::NotFound(format!(
            "group `{name}` not found for session `{session_id}`"
        )));
    }
    info!(session_id = %session_id, group = %name, "group deleted");
    Ok(())
}

/// Partition the confirmed roster into grouped members and individuals.
///
/// Groups iterate in creation order; each claims its confirmed members in
/// roster order. A participant registered in several groups counts for the
/// first group only. Waitlisted participants never appear.
pub(crate) async fn classify(
    store: &Arc<dyn RecordStore>,
    session_id: Uuid,
) -> Result<ClassifiedRoster, ServiceError> {
    let confirmed = roster_service::confirmed_ids(store, session_id).await?;
    let groups = store.list_groups(session_id).await?;

    let mut claimed: HashSet<Uuid> = HashSet::new();
    let mut grouped = Vec::new();
    for group in &groups {
        let members: Vec<Uuid> = confirmed
            .iter()
            .filter(|id| group.members.contains(id) && !claimed.contains(id))
            .copied()
            .collect();
        if members.is_empty() {
            continue;
        }
        claimed.extend(members.iter().copied());
        grouped.push(members);
    }

    let individuals = confirmed
        .into_iter()
        .filter(|id| !claimed.contains(id))
        .collect();

    Ok(ClassifiedRoster {
        groups: grouped,
        individuals,
    })
}
