mod home;
mod profile;

use axum::middleware;
use axum::routing::get;

use crate::application::auth::require_session;
use crate::application::state::AppState;

pub(super) fn router(state: &AppState) -> axum::Router<AppState> {
    let session_routes = axum::Router::new()
        .route("/user/profile", get(profile::profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    axum::Router::new()
        .route("/", get(home::home_page))
        .route("/health", get(home::health))
        .merge(session_routes)
}
