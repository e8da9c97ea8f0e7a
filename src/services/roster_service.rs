//! Roster ledger: RSVP joins, leaves, FIFO waitlist promotion, and the
//! planner's forced-admission escape hatch.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::{
        models::{ParticipantEntity, RsvpEntity, RsvpStatus, SessionEntity},
        record_store::RecordStore,
    },
    dto::roster::{
        BulkAdmitRequest, BulkAdmitResponse, BulkRemoveRequest, JoinRequest, RosterResponse,
        RsvpView,
    },
    error::ServiceError,
    services::session_service::load_session,
    state::SharedState,
};

/// RSVP a participant to a session.
///
/// The participant is confirmed while the session has room and waitlisted
/// otherwise; a full session is a status, not an error. New participants get
/// a rating row with the configured default rating.
pub async fn join(
    state: &SharedState,
    session_id: Uuid,
    request: JoinRequest,
) -> Result<RsvpView, ServiceError> {
    let store = state.require_record_store().await?;
    load_session(&store, session_id).await?;
    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    let session = load_open_session(&store, session_id).await?;
    let participant = ensure_participant(
        &store,
        state.config().default_rating,
        request.participant_id,
        request.display_name,
    )
    .await?;

    let rsvps = store.list_rsvps(session_id).await?;
    if rsvps
        .iter()
        .any(|row| row.participant_id == participant.id)
    {
        return Err(ServiceError::Conflict(format!(
            "participant `{}` already joined session `{session_id}`",
            participant.id
        )));
    }

    let next_position = next_organic_position(&rsvps);
    let confirmed_count = rsvps
        .iter()
        .filter(|row| row.status == RsvpStatus::Confirmed)
        .count() as u32;
    let status = if confirmed_count < session.max_players {
        RsvpStatus::Confirmed
    } else {
        RsvpStatus::Waitlist
    };

    let entry = RsvpEntity {
        session_id,
        participant_id: participant.id,
        status,
        order_position: next_position,
    };
    store.insert_rsvp(entry.clone()).await?;
    info!(
        session_id = %session_id,
        participant_id = %participant.id,
        status = ?status,
        position = next_position,
        "rsvp recorded"
    );

    Ok(RsvpView {
        participant_id: participant.id,
        display_name: participant.display_name,
        status: entry.status,
        order_position: entry.order_position,
    })
}

/// Withdraw a participant's RSVP.
///
/// Leaving a confirmed spot promotes the earliest waitlisted entry (strict
/// FIFO), then every remaining entry is re-sequenced to a dense 1..N order
/// that preserves relative priority.
pub async fn leave(
    state: &SharedState,
    session_id: Uuid,
    participant_id: Uuid,
) -> Result<(), ServiceError> {
    let store = state.require_record_store().await?;
    load_session(&store, session_id).await?;
    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    load_open_session(&store, session_id).await?;
    let removed = store.delete_rsvp(session_id, participant_id).await?;
    let Some(removed) = removed else {
        return Err(ServiceError::NotFound(format!(
            "participant `{participant_id}` has no rsvp for session `{session_id}`"
        )));
    };

    settle_after_removal(&store, session_id, &removed).await?;
    info!(
        session_id = %session_id,
        participant_id = %participant_id,
        "rsvp withdrawn"
    );
    Ok(())
}

/// Planner removal of several participants in one pass.
///
/// Each removal applies the same promotion and re-sequencing as `leave`.
/// Participants without an entry are skipped with a warning so one typo does
/// not abort the whole batch.
pub async fn remove_many(
    state: &SharedState,
    session_id: Uuid,
    request: BulkRemoveRequest,
) -> Result<RosterResponse, ServiceError> {
    let store = state.require_record_store().await?;
    load_session(&store, session_id).await?;
    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    load_open_session(&store, session_id).await?;
    for participant_id in request.participant_ids {
        match store.delete_rsvp(session_id, participant_id).await? {
            Some(removed) => settle_after_removal(&store, session_id, &removed).await?,
            None => warn!(
                session_id = %session_id,
                participant_id = %participant_id,
                "skipping removal of participant without an rsvp"
            ),
        }
    }

    build_roster(&store, session_id).await
}

/// Force participants onto the confirmed roster, bypassing capacity and the
/// waitlist.
///
/// Forced entries take positions from a negative range below every existing
/// position so they always sort ahead of organic RSVPs. Capacity may be
/// exceeded; that is the point of the escape hatch. Participants that
/// already hold an entry, or repeat within the batch, are skipped so
/// (session, participant) stays unique.
pub async fn bulk_admit(
    state: &SharedState,
    session_id: Uuid,
    request: BulkAdmitRequest,
) -> Result<BulkAdmitResponse, ServiceError> {
    let store = state.require_record_store().await?;
    load_session(&store, session_id).await?;
    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    load_open_session(&store, session_id).await?;
    let rsvps = store.list_rsvps(session_id).await?;

    let floor = rsvps
        .iter()
        .map(|row| row.order_position)
        .min()
        .unwrap_or(0)
        .min(0);
    let batch_len = request.participants.len() as i64;

    // Covers entries already on the roster and repeats within the batch.
    let mut present: HashSet<Uuid> = rsvps.iter().map(|row| row.participant_id).collect();

    let mut admitted = Vec::new();
    let mut skipped = Vec::new();
    for (index, input) in request.participants.into_iter().enumerate() {
        if !present.insert(input.participant_id) {
            warn!(
                session_id = %session_id,
                participant_id = %input.participant_id,
                "skipping forced admission of participant already present"
            );
            skipped.push(input.participant_id);
            continue;
        }

        let participant = ensure_participant(
            &store,
            state.config().default_rating,
            input.participant_id,
            input.display_name,
        )
        .await?;

        store
            .insert_rsvp(RsvpEntity {
                session_id,
                participant_id: participant.id,
                status: RsvpStatus::Confirmed,
                order_position: floor - batch_len + index as i64,
            })
            .await?;
        admitted.push(participant.id);
    }

    info!(
        session_id = %session_id,
        admitted = admitted.len(),
        skipped = skipped.len(),
        "forced admission applied"
    );
    Ok(BulkAdmitResponse { admitted, skipped })
}

/// List a session's confirmed and waitlisted entries in arrival order.
pub async fn list(state: &SharedState, session_id: Uuid) -> Result<RosterResponse, ServiceError> {
    let store = state.require_record_store().await?;
    load_session(&store, session_id).await?;
    build_roster(&store, session_id).await
}

/// Confirmed participant ids for a session, in arrival order.
pub(crate) async fn confirmed_ids(
    store: &Arc<dyn RecordStore>,
    session_id: Uuid,
) -> Result<Vec<Uuid>, ServiceError> {
    let rsvps = store.list_rsvps(session_id).await?;
    Ok(rsvps
        .into_iter()
        .filter(|row| row.status == RsvpStatus::Confirmed)
        .map(|row| row.participant_id)
        .collect())
}

/// Fetch a participant's rating row, creating it with the default rating on
/// first appearance.
pub(crate) async fn ensure_participant(
    store: &Arc<dyn RecordStore>,
    default_rating: i32,
    id: Uuid,
    display_name: String,
) -> Result<ParticipantEntity, ServiceError> {
    if let Some(existing) = store.find_participant(id).await? {
        return Ok(existing);
    }
    let created = ParticipantEntity::new(id, display_name, default_rating);
    store.upsert_participant(created.clone()).await?;
    Ok(created)
}

/// Load a session and reject mutation once it is completed.
async fn load_open_session(
    store: &Arc<dyn RecordStore>,
    session_id: Uuid,
) -> Result<SessionEntity, ServiceError> {
    let session = load_session(store, session_id).await?;
    if session.completed {
        return Err(ServiceError::Conflict(format!(
            "session `{session_id}` is completed and no longer accepts roster changes"
        )));
    }
    Ok(session)
}

/// Promote the FIFO head of the waitlist when a confirmed spot freed up,
/// then re-sequence all remaining entries densely from 1.
async fn settle_after_removal(
    store: &Arc<dyn RecordStore>,
    session_id: Uuid,
    removed: &RsvpEntity,
) -> Result<(), ServiceError> {
    let rsvps = store.list_rsvps(session_id).await?;

    if removed.status == RsvpStatus::Confirmed {
        if let Some(head) = rsvps
            .iter()
            .find(|row| row.status == RsvpStatus::Waitlist)
        {
            store
                .update_rsvp_status(session_id, head.participant_id, RsvpStatus::Confirmed)
                .await?;
            info!(
                session_id = %session_id,
                participant_id = %head.participant_id,
                "waitlist entry promoted"
            );
        }
    }

    for (index, row) in rsvps.iter().enumerate() {
        let dense = index as i64 + 1;
        if row.order_position != dense {
            store
                .update_rsvp_position(session_id, row.participant_id, dense)
                .await?;
        }
    }
    Ok(())
}

/// Next order position for an organic join: one past the highest existing
/// position, never below 1.
fn next_organic_position(rsvps: &[RsvpEntity]) -> i64 {
    rsvps
        .iter()
        .map(|row| row.order_position)
        .max()
        .unwrap_or(0)
        .max(0)
        + 1
}

async fn build_roster(
    store: &Arc<dyn RecordStore>,
    session_id: Uuid,
) -> Result<RosterResponse, ServiceError> {
    let rsvps = store.list_rsvps(session_id).await?;

    let mut confirmed = Vec::new();
    let mut waitlist = Vec::new();
    for row in rsvps {
        let display_name = store
            .find_participant(row.participant_id)
            .await?
            .map(|participant| participant.display_name)
            .unwrap_or_else(|| row.participant_id.to_string());
        let view = RsvpView {
            participant_id: row.participant_id,
            display_name,
            status: row.status,
            order_position: row.order_position,
        };
        match row.status {
            RsvpStatus::Confirmed => confirmed.push(view),
            RsvpStatus::Waitlist => waitlist.push(view),
        }
    }

    Ok(RosterResponse { confirmed, waitlist })
}
