//! End-to-end tests of the roster, group, formation, and match workflows
//! running against the in-memory record store.

use std::sync::Arc;

use uuid::Uuid;

use volley_roster_back::{
    ServiceError,
    config::AppConfig,
    dao::models::RsvpStatus,
    dao::record_store::memory::MemoryStore,
    dto::{
        group::CreateGroupRequest,
        matches::{CreateMatchRequest, DeclareWinnerRequest},
        roster::{BulkAdmitRequest, JoinRequest, ParticipantInput},
        session::CreateSessionRequest,
        team::{FormTeamsRequest, FormationStrategy},
    },
    services::{group_service, match_service, roster_service, session_service, team_service},
    state::{AppState, SharedState},
};

async fn fresh_state() -> SharedState {
    let state = AppState::new(AppConfig::default());
    state
        .install_record_store(Arc::new(MemoryStore::new()))
        .await;
    state
}

async fn fresh_session(state: &SharedState, max_players: u32) -> Uuid {
    session_service::create_session(
        state,
        CreateSessionRequest {
            scheduled_at: "2026-08-30T18:00:00Z".into(),
            location: "river court".into(),
            max_players,
        },
    )
    .await
    .expect("create session")
    .id
}

fn player(name: &str) -> JoinRequest {
    JoinRequest {
        participant_id: Uuid::new_v4(),
        display_name: name.into(),
    }
}

#[tokio::test]
async fn join_then_leave_returns_the_roster_to_empty() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 10).await;
    let request = player("ana");
    let participant_id = request.participant_id;

    roster_service::join(&state, session_id, request)
        .await
        .unwrap();
    roster_service::leave(&state, session_id, participant_id)
        .await
        .unwrap();

    let roster = roster_service::list(&state, session_id).await.unwrap();
    assert!(roster.confirmed.is_empty());
    assert!(roster.waitlist.is_empty());
}

#[tokio::test]
async fn duplicate_join_is_a_conflict() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 10).await;
    let request = player("bo");
    let duplicate = JoinRequest {
        participant_id: request.participant_id,
        display_name: request.display_name.clone(),
    };

    roster_service::join(&state, session_id, request)
        .await
        .unwrap();
    let err = roster_service::join(&state, session_id, duplicate)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn joining_a_full_session_waitlists_instead_of_failing() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 2).await;

    for name in ["ana", "bo"] {
        let view = roster_service::join(&state, session_id, player(name))
            .await
            .unwrap();
        assert_eq!(view.status, RsvpStatus::Confirmed);
    }
    let view = roster_service::join(&state, session_id, player("cleo"))
        .await
        .unwrap();
    assert_eq!(view.status, RsvpStatus::Waitlist);
}

#[tokio::test]
async fn leaving_promotes_the_waitlist_head_fifo() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 1).await;

    let a = player("ana");
    let b = player("bo");
    let c = player("cleo");
    let (a_id, b_id, c_id) = (a.participant_id, b.participant_id, c.participant_id);

    roster_service::join(&state, session_id, a).await.unwrap();
    roster_service::join(&state, session_id, b).await.unwrap();
    roster_service::join(&state, session_id, c).await.unwrap();
    roster_service::leave(&state, session_id, a_id)
        .await
        .unwrap();

    let roster = roster_service::list(&state, session_id).await.unwrap();
    assert_eq!(roster.confirmed.len(), 1);
    assert_eq!(roster.confirmed[0].participant_id, b_id);
    assert_eq!(roster.waitlist.len(), 1);
    assert_eq!(roster.waitlist[0].participant_id, c_id);

    // Positions are dense again after the removal pass.
    assert_eq!(roster.confirmed[0].order_position, 1);
    assert_eq!(roster.waitlist[0].order_position, 2);
}

#[tokio::test]
async fn leaving_without_an_rsvp_is_not_found() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 4).await;

    let err = roster_service::leave(&state, session_id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn forced_admissions_outrank_organic_rsvps_and_may_exceed_capacity() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 2).await;

    for name in ["ana", "bo"] {
        roster_service::join(&state, session_id, player(name))
            .await
            .unwrap();
    }

    let forced = ParticipantInput {
        participant_id: Uuid::new_v4(),
        display_name: "dre".into(),
    };
    let forced_id = forced.participant_id;
    let outcome = roster_service::bulk_admit(
        &state,
        session_id,
        BulkAdmitRequest {
            participants: vec![forced],
        },
    )
    .await
    .unwrap();
    assert_eq!(outcome.admitted, vec![forced_id]);
    assert!(outcome.skipped.is_empty());

    let roster = roster_service::list(&state, session_id).await.unwrap();
    // Capacity was 2; the forced admission makes it 3 confirmed.
    assert_eq!(roster.confirmed.len(), 3);
    assert_eq!(roster.confirmed[0].participant_id, forced_id);
    assert!(roster.confirmed[0].order_position < roster.confirmed[1].order_position);
}

#[tokio::test]
async fn forced_admission_skips_participants_already_on_the_roster() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 4).await;

    let request = player("ana");
    let existing = request.participant_id;
    roster_service::join(&state, session_id, request)
        .await
        .unwrap();

    let outcome = roster_service::bulk_admit(
        &state,
        session_id,
        BulkAdmitRequest {
            participants: vec![ParticipantInput {
                participant_id: existing,
                display_name: "ana".into(),
            }],
        },
    )
    .await
    .unwrap();
    assert!(outcome.admitted.is_empty());
    assert_eq!(outcome.skipped, vec![existing]);
}

#[tokio::test]
async fn forced_admission_deduplicates_within_one_batch() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 4).await;

    let repeat = Uuid::new_v4();
    let outcome = roster_service::bulk_admit(
        &state,
        session_id,
        BulkAdmitRequest {
            participants: vec![
                ParticipantInput {
                    participant_id: repeat,
                    display_name: "dre".into(),
                },
                ParticipantInput {
                    participant_id: repeat,
                    display_name: "dre".into(),
                },
            ],
        },
    )
    .await
    .unwrap();
    assert_eq!(outcome.admitted, vec![repeat]);
    assert_eq!(outcome.skipped, vec![repeat]);

    // (session, participant) stays unique: exactly one confirmed entry.
    let roster = roster_service::list(&state, session_id).await.unwrap();
    assert_eq!(roster.confirmed.len(), 1);
    assert_eq!(roster.confirmed[0].participant_id, repeat);
    assert!(roster.waitlist.is_empty());
}

#[tokio::test]
async fn unknown_session_ids_leave_no_gate_behind() {
    let state = fresh_state().await;
    let missing = Uuid::new_v4();

    let err = roster_service::join(&state, missing, player("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(!state.has_session_gate(missing));

    let session_id = fresh_session(&state, 4).await;
    roster_service::join(&state, session_id, player("ana"))
        .await
        .unwrap();
    assert!(state.has_session_gate(session_id));

    session_service::delete_session(&state, session_id)
        .await
        .unwrap();
    assert!(!state.has_session_gate(session_id));
}

#[tokio::test]
async fn completed_sessions_reject_roster_changes() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 4).await;

    session_service::complete_session(&state, session_id)
        .await
        .unwrap();

    let err = roster_service::join(&state, session_id, player("late"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // Completion itself is one-shot.
    let err = session_service::complete_session(&state, session_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn duplicate_group_names_and_double_membership_conflict() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 8).await;

    let shared_member = Uuid::new_v4();
    group_service::create_group(
        &state,
        session_id,
        CreateGroupRequest {
            name: "carpool".into(),
            members: vec![shared_member, Uuid::new_v4()],
        },
    )
    .await
    .unwrap();

    let err = group_service::create_group(
        &state,
        session_id,
        CreateGroupRequest {
            name: "carpool".into(),
            members: vec![Uuid::new_v4()],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let err = group_service::create_group(
        &state,
        session_id,
        CreateGroupRequest {
            name: "roommates".into(),
            members: vec![shared_member],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn formation_keeps_groups_together_and_covers_the_roster() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 12).await;

    let mut roster_ids = Vec::new();
    for index in 0..9 {
        let request = player(&format!("p{index}"));
        roster_ids.push(request.participant_id);
        roster_service::join(&state, session_id, request)
            .await
            .unwrap();
    }
    let carpool: Vec<Uuid> = roster_ids[0..3].to_vec();
    group_service::create_group(
        &state,
        session_id,
        CreateGroupRequest {
            name: "carpool".into(),
            members: carpool.clone(),
        },
    )
    .await
    .unwrap();

    let response = team_service::form_teams(
        &state,
        session_id,
        FormTeamsRequest {
            num_teams: 3,
            strategy: FormationStrategy::Even,
            seed: Some(17),
        },
    )
    .await
    .unwrap();

    assert_eq!(response.teams.len(), 3);
    let mut assigned: Vec<Uuid> = response
        .teams
        .iter()
        .flat_map(|team| team.members.iter().map(|member| member.participant_id))
        .collect();
    assigned.sort();
    let mut expected = roster_ids.clone();
    expected.sort();
    assert_eq!(assigned, expected);

    let carpool_homes: Vec<u32> = response
        .teams
        .iter()
        .filter(|team| {
            team.members
                .iter()
                .any(|member| carpool.contains(&member.participant_id))
        })
        .map(|team| team.team_number)
        .collect();
    assert_eq!(carpool_homes.len(), 1, "carpool split across teams");
}

#[tokio::test]
async fn formation_with_fewer_players_than_teams_leaves_teams_empty() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 4).await;
    roster_service::join(&state, session_id, player("solo"))
        .await
        .unwrap();

    let response = team_service::form_teams(
        &state,
        session_id,
        FormTeamsRequest {
            num_teams: 3,
            strategy: FormationStrategy::Balanced,
            seed: None,
        },
    )
    .await
    .unwrap();

    let sizes: Vec<usize> = response.teams.iter().map(|team| team.members.len()).collect();
    assert_eq!(sizes.iter().sum::<usize>(), 1);
    assert_eq!(response.teams.len(), 3);
}

#[tokio::test]
async fn single_team_request_is_invalid() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 4).await;

    let err = team_service::form_teams(
        &state,
        session_id,
        FormTeamsRequest {
            num_teams: 1,
            strategy: FormationStrategy::Even,
            seed: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn declaring_a_winner_updates_every_rating_once() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 4).await;

    let mut ids = Vec::new();
    for name in ["ana", "bo", "cleo", "dre"] {
        let request = player(name);
        ids.push(request.participant_id);
        roster_service::join(&state, session_id, request)
            .await
            .unwrap();
    }

    team_service::form_teams(
        &state,
        session_id,
        FormTeamsRequest {
            num_teams: 2,
            strategy: FormationStrategy::Balanced,
            seed: None,
        },
    )
    .await
    .unwrap();

    let game = match_service::create_match(
        &state,
        session_id,
        CreateMatchRequest {
            team_a: 1,
            team_b: 2,
        },
    )
    .await
    .unwrap();

    let result = match_service::declare_winner(
        &state,
        game.id,
        DeclareWinnerRequest {
            winning_team: game.team_a,
        },
    )
    .await
    .unwrap();

    assert_eq!(result.winner, game.team_a);
    assert_eq!(result.rating_changes.len(), 4);

    // Everyone started at the 1200 default, so the matchup was even:
    // provisional winners gain 50, provisional losers lose 50.
    let store = state.record_store().await.unwrap();
    let mut winners = 0;
    let mut losers = 0;
    for id in &ids {
        let row = store.find_participant(*id).await.unwrap().unwrap();
        assert_eq!(row.games_played, 1);
        match row.rating {
            1250 => {
                winners += 1;
                assert_eq!(row.wins, 1);
            }
            1150 => {
                losers += 1;
                assert_eq!(row.wins, 0);
            }
            other => panic!("unexpected rating {other}"),
        }
    }
    assert_eq!(winners, 2);
    assert_eq!(losers, 2);

    // Declaring twice is a conflict and leaves ratings alone.
    let err = match_service::declare_winner(
        &state,
        game.id,
        DeclareWinnerRequest {
            winning_team: game.team_a,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn declaring_an_outside_team_is_invalid() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 4).await;

    for name in ["ana", "bo"] {
        roster_service::join(&state, session_id, player(name))
            .await
            .unwrap();
    }
    team_service::form_teams(
        &state,
        session_id,
        FormTeamsRequest {
            num_teams: 2,
            strategy: FormationStrategy::Even,
            seed: Some(5),
        },
    )
    .await
    .unwrap();
    let game = match_service::create_match(
        &state,
        session_id,
        CreateMatchRequest {
            team_a: 1,
            team_b: 2,
        },
    )
    .await
    .unwrap();

    let err = match_service::declare_winner(
        &state,
        game.id,
        DeclareWinnerRequest {
            winning_team: Uuid::new_v4(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn deleting_a_session_cascades_to_everything_it_owns() {
    let state = fresh_state().await;
    let session_id = fresh_session(&state, 4).await;

    roster_service::join(&state, session_id, player("ana"))
        .await
        .unwrap();
    session_service::delete_session(&state, session_id)
        .await
        .unwrap();

    let err = roster_service::list(&state, session_id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
