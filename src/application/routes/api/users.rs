use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use tracing::{error, info, warn};

use crate::application::auth::{AuthenticatedUser, expired_session_cookie, session_cookie};
use crate::application::errors::{ApiError, AppError};
use crate::application::routes::support::JsonBody;
use crate::application::state::AppState;
use crate::domain::users::User;

#[derive(Debug, Deserialize)]
pub(crate) struct Credentials {
    email: String,
    password: String,
}

/// Registration accepts any user document; only the credentials are kept.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RegisterSubmission {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Credentials>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .user_service
        .create(&payload.email, &payload.password)
        .await?;
    Ok(Json(user))
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn register(
    State(state): State<AppState>,
    payload: Result<JsonBody<RegisterSubmission>, ApiError>,
) -> Response {
    let result = match payload {
        Ok(JsonBody(submission)) => {
            state
                .user_service
                .create(&submission.email, &submission.password)
                .await
        }
        Err(ApiError(err)) => Err(err),
    };

    match result {
        Ok(user) => Json(RegisterResponse {
            success: true,
            user: Some(user),
            message: None,
        })
        .into_response(),
        Err(err) => {
            let status = err.status();
            let message = if status.is_server_error() {
                error!(error = %err, "registration failed");
                "internal server error".to_string()
            } else {
                err.to_string()
            };
            (
                status,
                Json(RegisterResponse {
                    success: false,
                    user: None,
                    message: Some(message),
                }),
            )
                .into_response()
        }
    }
}

/// Checks the credentials and, on success, issues a fresh session token in
/// the `auth` cookie.
#[tracing::instrument(skip(state, cookies, payload))]
pub(crate) async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    JsonBody(payload): JsonBody<Credentials>,
) -> Result<&'static str, ApiError> {
    let user = state.user_service.find_by_email(&payload.email).await?;

    if !state
        .user_service
        .compare_password(&user, &payload.password)
        .await?
    {
        warn!(user_id = %user.id, "login rejected: wrong password");
        return Err(AppError::WrongPassword.into());
    }

    let session = state.user_service.generate_token(&user).await?;
    cookies.add(session_cookie(session.token, state.insecure_cookies));

    info!(user_id = %session.user.id, "user logged in");
    Ok("ok")
}

#[tracing::instrument(skip(state, cookies, auth))]
pub(crate) async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
    auth: AuthenticatedUser,
) -> Result<&'static str, ApiError> {
    state.user_service.clear_token(&auth.user).await?;
    cookies.remove(expired_session_cookie());

    info!(user_id = %auth.user.id, "user logged out");
    Ok("ok")
}
