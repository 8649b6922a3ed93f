pub mod auth;
pub mod books;
pub mod errors;
pub mod ids;
pub mod listing;
pub mod repositories;

// Re-exports
pub use auth::users;
pub use books::books as book_items;
pub use errors::RepositoryError;
