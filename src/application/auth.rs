use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use tracing::{Span, warn};

use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::users::User;

pub const SESSION_COOKIE_NAME: &str = "auth";

/// Extension type to carry the authenticated user through request handlers,
/// together with the token they presented.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}

/// Middleware guarding session-only routes.
///
/// Resolves the `auth` cookie to a user and stores the result in request
/// extensions. Any failure ends the request here with an error response.
pub async fn require_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, &cookies).await {
        Ok(auth) => {
            request.extensions_mut().insert(auth);
            next.run(request).await
        }
        Err(err) => {
            warn!(error = %err, uri = %request.uri(), "rejected unauthenticated request");
            ApiError::from(err).into_response()
        }
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by `require_session` when the route is behind it
        if let Some(auth) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(auth.clone());
        }

        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| ApiError(AppError::unexpected(message)))?;

        authenticate(state, &cookies).await.map_err(ApiError::from)
    }
}

async fn authenticate(state: &AppState, cookies: &Cookies) -> Result<AuthenticatedUser, AppError> {
    let cookie = cookies
        .get(SESSION_COOKIE_NAME)
        .ok_or_else(|| AppError::unauthorized("missing session cookie"))?;
    let token = cookie.value().to_owned();

    let user = state.user_service.verify_token(&token).await?;
    Span::current().record("user.id", tracing::field::display(&user.id));

    Ok(AuthenticatedUser { user, token })
}

/// Builds the session cookie handed out at login.
pub fn session_cookie(token: String, insecure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!insecure)
        .build()
}

/// Cookie value used to expire the session cookie on the client.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build()
}
