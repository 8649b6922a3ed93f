use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use tracing::warn;

use crate::application::routes::render_html;
use crate::application::state::AppState;
use crate::presentation::web::templates::HomeTemplate;

#[tracing::instrument]
pub(crate) async fn home_page() -> Result<Html<String>, StatusCode> {
    render_html(HomeTemplate {
        title: "My book shelf",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness probe that also confirms the database answers.
pub(crate) async fn health(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.database.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(err) => {
            warn!(error = %err, "health check failed to reach database");
            (StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
        }
    }
}
