use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, query, query_as};

use crate::domain::RepositoryError;
use crate::domain::book_items::{Book, BookFields, NewBook, ReplaceBook};
use crate::domain::ids::BookId;
use crate::domain::listing::ListRequest;
use crate::domain::repositories::BookRepository;
use crate::infrastructure::database::DatabasePool;

#[derive(Clone)]
pub struct SqlBookRepository {
    pool: DatabasePool,
}

impl SqlBookRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_book(record: BookRecord) -> Result<Book, RepositoryError> {
        let fields: BookFields = serde_json::from_str(&record.fields).map_err(|err| {
            RepositoryError::unexpected(format!("book {} has corrupt fields: {err}", record.id))
        })?;

        Ok(Book {
            id: BookId::from(record.id),
            fields,
        })
    }

    fn encode_fields(fields: &BookFields) -> Result<String, RepositoryError> {
        serde_json::to_string(fields).map_err(|err| RepositoryError::unexpected(err.to_string()))
    }
}

#[async_trait]
impl BookRepository for SqlBookRepository {
    async fn insert(&self, new_book: NewBook) -> Result<Book, RepositoryError> {
        let fields = Self::encode_fields(&new_book.fields)?;
        let now = Utc::now();

        let record = query_as::<_, BookRecord>(
            r"INSERT INTO books (fields, created_at, updated_at)
              VALUES (?, ?, ?)
              RETURNING id, fields",
        )
        .bind(fields)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Self::into_book(record)
    }

    async fn get(&self, id: BookId) -> Result<Book, RepositoryError> {
        let record = query_as::<_, BookRecord>("SELECT id, fields FROM books WHERE id = ?")
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        Self::into_book(record)
    }

    async fn list(&self, request: &ListRequest) -> Result<Vec<Book>, RepositoryError> {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT id, fields FROM books ORDER BY id ");
        builder.push(request.direction().as_sql());

        // SQLite only accepts OFFSET after LIMIT; -1 means unbounded.
        builder.push(" LIMIT ");
        builder.push_bind(request.limit().as_option().map_or(-1, saturating_i64));
        builder.push(" OFFSET ");
        builder.push_bind(saturating_i64(request.skip()));

        let records = builder
            .build_query_as::<BookRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        records.into_iter().map(Self::into_book).collect()
    }

    async fn replace(&self, id: BookId, book: ReplaceBook) -> Result<Book, RepositoryError> {
        let fields = Self::encode_fields(&book.fields)?;

        let record = query_as::<_, BookRecord>(
            r"UPDATE books SET fields = ?, updated_at = ?
              WHERE id = ?
              RETURNING id, fields",
        )
        .bind(fields)
        .bind(Utc::now())
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        Self::into_book(record)
    }

    async fn delete(&self, id: BookId) -> Result<(), RepositoryError> {
        let result = query("DELETE FROM books WHERE id = ?")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// SQLite integers are signed; anything larger is as good as unbounded.
fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[derive(sqlx::FromRow)]
struct BookRecord {
    id: i64,
    fields: String,
}
