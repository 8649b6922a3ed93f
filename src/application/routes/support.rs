use axum::extract::{FromRequest, FromRequestParts, Json as JsonPayload, Query, Request};
use axum::http::request::Parts;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::application::errors::{ApiError, AppError};
use crate::domain::book_items::BookFields;
use crate::domain::ids::BookId;

/// JSON body extractor whose rejections are `400` responses with the usual
/// `{ "message": ... }` error body.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send + 'static,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonPayload(payload) = JsonPayload::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                warn!(error = %rejection.body_text(), "failed to parse JSON payload");
                ApiError::from(AppError::validation(rejection.body_text()))
            })?;

        Ok(Self(payload))
    }
}

/// Query-string extractor with the same rejection behaviour as [`JsonBody`].
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                warn!(error = %rejection.body_text(), "failed to parse query string");
                ApiError::from(AppError::validation(rejection.body_text()))
            })?;

        Ok(Self(params))
    }
}

/// `?id=` query carried by the single-book endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct IdQuery {
    #[serde(default)]
    id: Option<String>,
}

impl IdQuery {
    pub fn book_id(&self) -> Result<BookId, AppError> {
        let raw = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validation("id query parameter is required"))?;

        raw.parse::<BookId>()
            .map_err(|_| AppError::validation(format!("invalid book id: {raw}")))
    }
}

/// Requires a JSON object; books are free-form but never scalars or arrays.
pub(crate) fn into_object(value: Value) -> Result<BookFields, AppError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::validation("book must be a JSON object")),
    }
}
