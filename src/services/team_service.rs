//! Team formation: partition a session's confirmed roster into teams, either
//! randomized-even or rating-balanced, always keeping groups together.

use std::collections::HashMap;
use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{models::TeamEntity, record_store::RecordStore},
    dto::team::{FormTeamsRequest, FormationStrategy, TeamMemberView, TeamView, TeamsResponse},
    error::ServiceError,
    services::{
        group_service::{self, ClassifiedRoster},
        session_service::load_session,
    },
    state::SharedState,
};

/// Form a session's teams from scratch, replacing any previous ones.
pub async fn form_teams(
    state: &SharedState,
    session_id: Uuid,
    request: FormTeamsRequest,
) -> Result<TeamsResponse, ServiceError> {
    if request.num_teams < 2 {
        return Err(ServiceError::InvalidInput(
            "num_teams must be at least 2".into(),
        ));
    }

    let store = state.require_record_store().await?;
    load_session(&store, session_id).await?;
    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    load_session(&store, session_id).await?;
    let roster = group_service::classify(&store, session_id).await?;
    let num_teams = request.num_teams as usize;

    let assignment = match request.strategy {
        FormationStrategy::Even => {
            let mut rng = match request.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            distribute_even(&roster, num_teams, &mut rng)
        }
        FormationStrategy::Balanced => {
            let default_rating = state.config().default_rating;
            let ratings = load_ratings(&store, &roster, default_rating).await?;
            distribute_balanced(&roster, &ratings, default_rating, num_teams)
        }
    };

    store.delete_teams(session_id).await?;
    for (index, members) in assignment.iter().enumerate() {
        store
            .insert_team(TeamEntity {
                id: Uuid::new_v4(),
                session_id,
                team_number: index as u32 + 1,
                members: members.clone(),
            })
            .await?;
    }
    info!(
        session_id = %session_id,
        strategy = ?request.strategy,
        num_teams = request.num_teams,
        "teams formed"
    );

    list_teams_inner(state, &store, session_id).await
}

/// List a session's current teams ordered by team number.
pub async fn list_teams(
    state: &SharedState,
    session_id: Uuid,
) -> Result<TeamsResponse, ServiceError> {
    let store = state.require_record_store().await?;
    load_session(&store, session_id).await?;
    list_teams_inner(state, &store, session_id).await
}

async fn list_teams_inner(
    state: &SharedState,
    store: &Arc<dyn RecordStore>,
    session_id: Uuid,
) -> Result<TeamsResponse, ServiceError> {
    let teams = store.list_teams(session_id).await?;

    let mut views = Vec::with_capacity(teams.len());
    for team in teams {
        let mut members = Vec::with_capacity(team.members.len());
        for member in team.members {
            let (display_name, rating) = match store.find_participant(member).await? {
                Some(participant) => (participant.display_name, participant.rating),
                None => (member.to_string(), state.config().default_rating),
            };
            members.push(TeamMemberView {
                participant_id: member,
                display_name,
                rating,
            });
        }
        views.push(TeamView {
            team_number: team.team_number,
            members,
        });
    }

    Ok(TeamsResponse { teams: views })
}

/// Current ratings for the whole classified roster, falling back to the
/// default rating for participants without a rating row. The fallback is
/// for balancing only and never written back.
async fn load_ratings(
    store: &Arc<dyn RecordStore>,
    roster: &ClassifiedRoster,
    default_rating: i32,
) -> Result<HashMap<Uuid, i32>, ServiceError> {
    let mut ratings = HashMap::new();
    let all = roster
        .groups
        .iter()
        .flatten()
        .chain(roster.individuals.iter());
    for id in all {
        let rating = store
            .find_participant(*id)
            .await?
            .map(|participant| participant.rating)
            .unwrap_or(default_rating);
        ratings.insert(*id, rating);
    }
    Ok(ratings)
}

/// Even distribution: groups first, each placed atomically on the currently
/// smallest team, then shuffled individuals one by one onto the smallest
/// team. Greedy bin balancing, so the final size spread is bounded by the
/// largest group size.
fn distribute_even(
    roster: &ClassifiedRoster,
    num_teams: usize,
    rng: &mut StdRng,
) -> Vec<Vec<Uuid>> {
    let mut teams: Vec<Vec<Uuid>> = vec![Vec::new(); num_teams];

    for group in &roster.groups {
        let target = smallest_team(&teams);
        teams[target].extend(group.iter().copied());
    }

    let mut individuals = roster.individuals.clone();
    individuals.shuffle(rng);
    for id in individuals {
        let target = smallest_team(&teams);
        teams[target].push(id);
    }

    teams
}

/// Balanced distribution: groups to the team with the lowest summed rating,
/// then individuals sorted by rating descending, each to the team with the
/// lowest running sum. Participants missing from the rating table count at
/// the default rating. Deterministic for a fixed roster and rating table.
fn distribute_balanced(
    roster: &ClassifiedRoster,
    ratings: &HashMap<Uuid, i32>,
    default_rating: i32,
    num_teams: usize,
) -> Vec<Vec<Uuid>> {
    let rating_of = |id: &Uuid| i64::from(ratings.get(id).copied().unwrap_or(default_rating));

    let mut teams: Vec<Vec<Uuid>> = vec![Vec::new(); num_teams];
    let mut sums = vec![0i64; num_teams];

    for group in &roster.groups {
        let target = lightest_team(&sums);
        for member in group {
            sums[target] += rating_of(member);
            teams[target].push(*member);
        }
    }

    let mut individuals = roster.individuals.clone();
    // Stable sort keeps arrival order among equal ratings.
    individuals.sort_by_key(|id| std::cmp::Reverse(rating_of(id)));
    for id in individuals {
        let target = lightest_team(&sums);
        sums[target] += rating_of(&id);
        teams[target].push(id);
    }

    teams
}

/// Index of the team with the fewest members; lowest index wins ties.
fn smallest_team(teams: &[Vec<Uuid>]) -> usize {
    (0..teams.len())
        .min_by_key(|index| teams[*index].len())
        .unwrap_or(0)
}

/// Index of the team with the lowest summed rating; lowest index wins ties.
fn lightest_team(sums: &[i64]) -> usize {
    (0..sums.len())
        .min_by_key(|index| sums[*index])
        .unwrap_or(0)
}
