pub(crate) mod books;
pub(crate) mod users;

use axum::middleware;
use axum::routing::{delete, get, post};

use crate::application::auth::require_session;
use crate::application::state::AppState;

pub(super) fn router(state: &AppState) -> axum::Router<AppState> {
    user_routes(state).merge(book_routes())
}

fn user_routes(state: &AppState) -> axum::Router<AppState> {
    let session_routes = axum::Router::new()
        .route("/user/logout", get(users::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    axum::Router::new()
        .route("/user", post(users::create_user))
        .route("/register", post(users::register))
        .route("/user/login", post(users::login))
        .merge(session_routes)
}

fn book_routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/getBook", get(books::get_book))
        .route("/books", get(books::list_books))
        .route("/book", post(books::create_book))
        .route("/book_update", post(books::update_book))
        .route("/delete_book", delete(books::delete_book))
}
