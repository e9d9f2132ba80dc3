use axum::Router;

use crate::state::SharedState;

pub mod auth;
pub mod docs;
pub mod health;
pub mod home;
pub mod prediction;
pub mod profile;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(home::router())
        .merge(auth::router())
        .merge(profile::router())
        .merge(prediction::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
