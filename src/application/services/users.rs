use std::sync::Arc;

use tracing::info;

use crate::application::errors::AppError;
use crate::domain::RepositoryError;
use crate::domain::repositories::UserRepository;
use crate::domain::users::{NewUser, User, normalize_email};
use crate::infrastructure::auth::{
    generate_session_token, hash_password, hash_token, verify_password,
};

/// A freshly issued login session: the updated user and the plaintext token
/// to hand to the client. Only the token's digest is stored.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub user: User,
    pub token: String,
}

/// Account operations layered over the user repository.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Registers a new account, hashing the password before it is stored.
    pub async fn create(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AppError::validation("email is required"));
        }
        if password.is_empty() {
            return Err(AppError::validation("password is required"));
        }

        let password = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|err| AppError::unexpected(format!("password hashing task failed: {err}")))??;

        let user = self
            .users
            .insert(NewUser::new(email, password_hash))
            .await
            .map_err(AppError::from)?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, AppError> {
        match self.users.get_by_email(&normalize_email(email)).await {
            Ok(user) => Ok(user),
            Err(RepositoryError::NotFound) => {
                Err(AppError::not_found("Auth failed, user not found"))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Returns whether `candidate` is the user's password. A mismatch is
    /// `Ok(false)`; errors mean the check itself could not run.
    pub async fn compare_password(&self, user: &User, candidate: &str) -> Result<bool, AppError> {
        let candidate = candidate.to_owned();
        let stored = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored))
            .await
            .map_err(|err| {
                AppError::unexpected(format!("password verification task failed: {err}"))
            })??;
        Ok(matches)
    }

    /// Issues a new session token, replacing any previous one.
    pub async fn generate_token(&self, user: &User) -> Result<IssuedSession, AppError> {
        let token = generate_session_token();
        let user = self
            .users
            .set_token_hash(user.id, Some(&hash_token(&token)))
            .await
            .map_err(AppError::from)?;

        Ok(IssuedSession { user, token })
    }

    /// Resolves the user owning `token`.
    pub async fn verify_token(&self, token: &str) -> Result<User, AppError> {
        if token.is_empty() {
            return Err(AppError::unauthorized("missing session token"));
        }

        match self.users.get_by_token_hash(&hash_token(token)).await {
            Ok(user) => Ok(user),
            Err(RepositoryError::NotFound) => Err(AppError::unauthorized("invalid session token")),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn clear_token(&self, user: &User) -> Result<User, AppError> {
        self.users
            .set_token_hash(user.id, None)
            .await
            .map_err(AppError::from)
    }
}
