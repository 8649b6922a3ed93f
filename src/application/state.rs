use std::sync::Arc;

use crate::application::services::UserService;
use crate::domain::repositories::{BookRepository, UserRepository};
use crate::infrastructure::database::Database;
use crate::infrastructure::repositories::{SqlBookRepository, SqlUserRepository};

/// Settings that shape request handling rather than storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppStateConfig {
    /// Omit the `Secure` attribute on the session cookie (plain-HTTP setups).
    pub insecure_cookies: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub user_repo: Arc<dyn UserRepository>,
    pub book_repo: Arc<dyn BookRepository>,
    pub user_service: UserService,
    pub insecure_cookies: bool,
}

impl AppState {
    /// Build the full application state from a database connection and config.
    pub fn from_database(database: &Database, config: AppStateConfig) -> Self {
        let pool = database.clone_pool();

        let user_repo: Arc<dyn UserRepository> = Arc::new(SqlUserRepository::new(pool.clone()));
        let book_repo: Arc<dyn BookRepository> = Arc::new(SqlBookRepository::new(pool));
        let user_service = UserService::new(Arc::clone(&user_repo));

        Self {
            database: database.clone(),
            user_repo,
            book_repo,
            user_service,
            insecure_cookies: config.insecure_cookies,
        }
    }
}
