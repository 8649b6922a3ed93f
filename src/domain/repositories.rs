use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::book_items::{Book, NewBook, ReplaceBook};
use crate::domain::ids::{BookId, UserId};
use crate::domain::listing::{ListRequest, SortDirection};
use crate::domain::users::{NewUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError>;
    async fn get_by_token_hash(&self, token_hash: &str) -> Result<User, RepositoryError>;
    /// Stores (or with `None`, clears) the session token digest.
    async fn set_token_hash(
        &self,
        id: UserId,
        token_hash: Option<&str>,
    ) -> Result<User, RepositoryError>;
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn insert(&self, book: NewBook) -> Result<Book, RepositoryError>;
    async fn get(&self, id: BookId) -> Result<Book, RepositoryError>;
    async fn list(&self, request: &ListRequest) -> Result<Vec<Book>, RepositoryError>;
    async fn replace(&self, id: BookId, book: ReplaceBook) -> Result<Book, RepositoryError>;
    async fn delete(&self, id: BookId) -> Result<(), RepositoryError>;

    async fn list_all(&self) -> Result<Vec<Book>, RepositoryError> {
        self.list(&ListRequest::show_all(SortDirection::Asc)).await
    }
}
