use axum::Json;
use serde::Serialize;

use crate::application::auth::AuthenticatedUser;
use crate::domain::ids::UserId;

#[derive(Debug, Serialize)]
pub(crate) struct ProfileResponse {
    #[serde(rename = "_id")]
    id: UserId,
    email: String,
    token: String,
}

/// Echoes the identity resolved from the session cookie.
#[tracing::instrument(skip(auth), fields(user.id = %auth.user.id))]
pub(crate) async fn profile(auth: AuthenticatedUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        id: auth.user.id,
        email: auth.user.email,
        token: auth.token,
    })
}
