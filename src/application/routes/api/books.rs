use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::application::errors::{ApiError, AppError};
use crate::application::routes::support::{IdQuery, JsonBody, QueryParams, into_object};
use crate::application::state::AppState;
use crate::domain::RepositoryError;
use crate::domain::book_items::{Book, NewBook, ReplaceBook, take_id};
use crate::domain::ids::BookId;
use crate::domain::listing::ListRequest;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListBooksQuery {
    #[serde(default)]
    skip: Option<String>,
    #[serde(default)]
    limit: Option<String>,
    #[serde(default)]
    order: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatedBook {
    post: bool,
    #[serde(rename = "bookId")]
    book_id: BookId,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdatedBook {
    success: bool,
    doc: Book,
}

fn book_error(id: BookId) -> impl FnOnce(RepositoryError) -> ApiError {
    move |err| match err {
        RepositoryError::NotFound => AppError::not_found(format!("book {id} not found")).into(),
        other => other.into(),
    }
}

#[tracing::instrument(skip(state))]
pub(crate) async fn get_book(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<IdQuery>,
) -> Result<Json<Book>, ApiError> {
    let id = query.book_id()?;
    let book = state.book_repo.get(id).await.map_err(book_error(id))?;
    Ok(Json(book))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn list_books(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListBooksQuery>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let request = ListRequest::from_params(
        query.skip.as_deref(),
        query.limit.as_deref(),
        query.order.as_deref(),
    );
    let books = state.book_repo.list(&request).await?;
    Ok(Json(books))
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn create_book(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Json<CreatedBook>, ApiError> {
    let fields = into_object(payload)?;
    let book = state.book_repo.insert(NewBook::new(fields)).await?;

    info!(book_id = %book.id, "book created");
    Ok(Json(CreatedBook {
        post: true,
        book_id: book.id,
    }))
}

/// Replaces every field of the book named by `_id` with the submitted ones.
#[tracing::instrument(skip(state, payload))]
pub(crate) async fn update_book(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Json<UpdatedBook>, ApiError> {
    let fields = into_object(payload)?;
    let (id, fields) = take_id(fields).map_err(|err| AppError::validation(err.to_string()))?;

    let doc = state
        .book_repo
        .replace(id, ReplaceBook::new(fields))
        .await
        .map_err(book_error(id))?;

    info!(book_id = %id, "book updated");
    Ok(Json(UpdatedBook { success: true, doc }))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn delete_book(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<IdQuery>,
) -> Result<Json<bool>, ApiError> {
    let id = query.book_id()?;
    state.book_repo.delete(id).await.map_err(book_error(id))?;

    info!(book_id = %id, "book deleted");
    Ok(Json(true))
}
