use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::query_as;

use crate::domain::RepositoryError;
use crate::domain::ids::UserId;
use crate::domain::repositories::UserRepository;
use crate::domain::users::{NewUser, User};
use crate::infrastructure::database::DatabasePool;

#[derive(Clone)]
pub struct SqlUserRepository {
    pool: DatabasePool,
}

impl SqlUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_user(record: UserRecord) -> User {
        User::new(
            UserId::from(record.id),
            record.email,
            record.password_hash,
            record.token_hash,
            record.created_at,
        )
    }

    async fn fetch_one_where(&self, column: &str, value: &str) -> Result<User, RepositoryError> {
        let sql = format!(
            "SELECT id, email, password_hash, token_hash, created_at FROM users WHERE {column} = ?"
        );
        let record = query_as::<_, UserRecord>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        Ok(Self::into_user(record))
    }
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn insert(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let record = query_as::<_, UserRecord>(
            r"INSERT INTO users (email, password_hash, created_at)
              VALUES (?, ?, ?)
              RETURNING id, email, password_hash, token_hash, created_at",
        )
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err
                && db_err.is_unique_violation()
            {
                return RepositoryError::conflict("A user with this email already exists");
            }
            RepositoryError::unexpected(err.to_string())
        })?;

        Ok(Self::into_user(record))
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        self.fetch_one_where("email", email).await
    }

    async fn get_by_token_hash(&self, token_hash: &str) -> Result<User, RepositoryError> {
        self.fetch_one_where("token_hash", token_hash).await
    }

    async fn set_token_hash(
        &self,
        id: UserId,
        token_hash: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let record = query_as::<_, UserRecord>(
            r"UPDATE users SET token_hash = ?
              WHERE id = ?
              RETURNING id, email, password_hash, token_hash, created_at",
        )
        .bind(token_hash)
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Self::into_user(record))
    }
}

#[derive(sqlx::FromRow)]
struct UserRecord {
    id: i64,
    email: String,
    password_hash: String,
    token_hash: Option<String>,
    created_at: DateTime<Utc>,
}
