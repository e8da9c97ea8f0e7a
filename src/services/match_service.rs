//! Match state: recording a match between two formed teams and declaring its
//! winner, which drives the rating update for every member of both teams.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::{
        models::{MatchEntity, TeamEntity},
        record_store::RecordStore,
    },
    dto::matches::{
        CreateMatchRequest, DeclareWinnerRequest, MatchResultView, MatchView, RatingChangeView,
    },
    error::ServiceError,
    rating,
    services::session_service::load_session,
    state::SharedState,
};

/// Record a match between two of a session's current teams.
pub async fn create_match(
    state: &SharedState,
    session_id: Uuid,
    request: CreateMatchRequest,
) -> Result<MatchView, ServiceError> {
    let store = state.require_record_store().await?;
    load_session(&store, session_id).await?;
    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    load_session(&store, session_id).await?;
    if request.team_a == request.team_b {
        return Err(ServiceError::InvalidInput(
            "a match requires two distinct teams".into(),
        ));
    }

    let teams = store.list_teams(session_id).await?;
    let team_a = find_team(&teams, session_id, request.team_a)?;
    let team_b = find_team(&teams, session_id, request.team_b)?;
    if team_a.members.is_empty() || team_b.members.is_empty() {
        return Err(ServiceError::InvalidInput(
            "both teams need at least one member".into(),
        ));
    }

    let game = MatchEntity {
        id: Uuid::new_v4(),
        session_id,
        team_a: team_a.id,
        team_b: team_b.id,
        winner: None,
        completed: false,
    };
    store.insert_match(game.clone()).await?;
    info!(
        session_id = %session_id,
        match_id = %game.id,
        team_a = request.team_a,
        team_b = request.team_b,
        "match recorded"
    );

    Ok(game.into())
}

/// List a session's matches in creation order.
pub async fn list_matches(
    state: &SharedState,
    session_id: Uuid,
) -> Result<Vec<MatchView>, ServiceError> {
    let store = state.require_record_store().await?;
    load_session(&store, session_id).await?;
    let matches = store.list_matches(session_id).await?;
    Ok(matches.into_iter().map(Into::into).collect())
}

/// Declare the winner of a match and apply the rating update.
///
/// Every member of both teams plays against the opposing team's average
/// rating: winners gain, losers lose, and everyone's game count moves up by
/// one. Member updates commit one participant at a time; a failure part-way
/// leaves earlier updates in place and the match still open, so a retry is
/// safe for the participants not yet touched.
pub async fn declare_winner(
    state: &SharedState,
    match_id: Uuid,
    request: DeclareWinnerRequest,
) -> Result<MatchResultView, ServiceError> {
    let store = state.require_record_store().await?;
    let found = store.find_match(match_id).await?;
    let Some(game) = found else {
        return Err(ServiceError::NotFound(format!(
            "match `{match_id}` not found"
        )));
    };

    let gate = state.session_gate(game.session_id);
    let _guard = gate.lock().await;

    // Re-read under the gate; a concurrent declaration may have won the race.
    let game = store
        .find_match(match_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("match `{match_id}` not found")))?;
    if game.completed {
        return Err(ServiceError::Conflict(format!(
            "match `{match_id}` is already completed"
        )));
    }
    if request.winning_team != game.team_a && request.winning_team != game.team_b {
        return Err(ServiceError::InvalidInput(format!(
            "team `{}` is not part of match `{match_id}`",
            request.winning_team
        )));
    }

    let teams = store.list_teams(game.session_id).await?;
    let team_a = find_team_by_id(&teams, game.team_a, match_id)?;
    let team_b = find_team_by_id(&teams, game.team_b, match_id)?;

    let average_a = team_average_rating(&store, team_a).await?;
    let average_b = team_average_rating(&store, team_b).await?;

    let a_won = request.winning_team == team_a.id;
    let mut rating_changes = Vec::new();
    apply_team_result(&store, team_a, average_b, a_won, &mut rating_changes).await?;
    apply_team_result(&store, team_b, average_a, !a_won, &mut rating_changes).await?;

    store.complete_match(match_id, request.winning_team).await?;
    info!(
        session_id = %game.session_id,
        match_id = %match_id,
        winner = %request.winning_team,
        "match completed and ratings applied"
    );

    Ok(MatchResultView {
        id: match_id,
        winner: request.winning_team,
        rating_changes,
    })
}

fn find_team<'a>(
    teams: &'a [TeamEntity],
    session_id: Uuid,
    team_number: u32,
) -> Result<&'a TeamEntity, ServiceError> {
    teams
        .iter()
        .find(|team| team.team_number == team_number)
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "team {team_number} not found for session `{session_id}`"
            ))
        })
}

fn find_team_by_id<'a>(
    teams: &'a [TeamEntity],
    team_id: Uuid,
    match_id: Uuid,
) -> Result<&'a TeamEntity, ServiceError> {
    teams.iter().find(|team| team.id == team_id).ok_or_else(|| {
        ServiceError::NotFound(format!(
            "team `{team_id}` of match `{match_id}` no longer exists; teams were re-formed"
        ))
    })
}

/// Average rating of a team's members, skipping participants without a
/// rating row.
async fn team_average_rating(
    store: &Arc<dyn RecordStore>,
    team: &TeamEntity,
) -> Result<i32, ServiceError> {
    let mut ratings = Vec::with_capacity(team.members.len());
    for member in &team.members {
        match store.find_participant(*member).await? {
            Some(participant) => ratings.push(participant.rating),
            None => warn!(
                team_id = %team.id,
                participant_id = %member,
                "team member has no rating row; excluded from the team average"
            ),
        }
    }
    rating::team_average(&ratings).ok_or_else(|| {
        ServiceError::InvalidInput(format!("team `{}` has no rated members", team.id))
    })
}

/// Apply one side's outcome: new rating against the opposing average, game
/// count up by one, win count up for the winning side.
async fn apply_team_result(
    store: &Arc<dyn RecordStore>,
    team: &TeamEntity,
    opposing_average: i32,
    won: bool,
    rating_changes: &mut Vec<RatingChangeView>,
) -> Result<(), ServiceError> {
    for member in &team.members {
        let Some(mut participant) = store.find_participant(*member).await? else {
            warn!(
                team_id = %team.id,
                participant_id = %member,
                "team member has no rating row; skipping rating update"
            );
            continue;
        };

        let old_rating = participant.rating;
        let new_rating = rating::update_rating(
            old_rating,
            opposing_average,
            participant.games_played,
            won,
        );
        participant.rating = new_rating;
        participant.games_played += 1;
        if won {
            participant.wins += 1;
        }
        store.upsert_participant(participant).await?;

        rating_changes.push(RatingChangeView {
            participant_id: *member,
            old_rating,
            new_rating,
        });
    }
    Ok(())
}
