use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Volley Roster Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sessions::create_session,
        crate::routes::sessions::list_sessions,
        crate::routes::sessions::get_session,
        crate::routes::sessions::delete_session,
        crate::routes::sessions::complete_session,
        crate::routes::roster::join,
        crate::routes::roster::list_roster,
        crate::routes::roster::leave,
        crate::routes::roster::bulk_admit,
        crate::routes::roster::bulk_remove,
        crate::routes::groups::create_group,
        crate::routes::groups::list_groups,
        crate::routes::groups::delete_group,
        crate::routes::teams::form_teams,
        crate::routes::teams::list_teams,
        crate::routes::matches::create_match,
        crate::routes::matches::list_matches,
        crate::routes::matches::declare_winner,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::session::CreateSessionRequest,
            crate::dto::session::SessionSummary,
            crate::dto::roster::JoinRequest,
            crate::dto::roster::RsvpView,
            crate::dto::roster::RosterResponse,
            crate::dto::roster::ParticipantInput,
            crate::dto::roster::BulkAdmitRequest,
            crate::dto::roster::BulkAdmitResponse,
            crate::dto::roster::BulkRemoveRequest,
            crate::dto::group::CreateGroupRequest,
            crate::dto::group::GroupView,
            crate::dto::team::FormTeamsRequest,
            crate::dto::team::FormationStrategy,
            crate::dto::team::TeamMemberView,
            crate::dto::team::TeamView,
            crate::dto::team::TeamsResponse,
            crate::dto::matches::CreateMatchRequest,
            crate::dto::matches::MatchView,
            crate::dto::matches::DeclareWinnerRequest,
            crate::dto::matches::RatingChangeView,
            crate::dto::matches::MatchResultView,
            crate::dao::models::RsvpStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sessions", description = "Session lifecycle"),
        (name = "roster", description = "RSVP and waitlist management"),
        (name = "groups", description = "Groups kept together during formation"),
        (name = "teams", description = "Team formation"),
        (name = "matches", description = "Match results and rating updates"),
    )
)]
pub struct ApiDoc;
