use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod groups;
pub mod health;
pub mod matches;
pub mod roster;
pub mod sessions;
pub mod teams;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sessions::router())
        .merge(roster::router())
        .merge(groups::router())
        .merge(teams::router())
        .merge(matches::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
