use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::user::User;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Email lookup is case-insensitive, matching the unique index.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Insert a new confirmed user. A duplicate email surfaces as a unique
    /// violation in the returned error; callers map that to a validation
    /// failure.
    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        password_digest: &str,
    ) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_digest, confirmed_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(name)
        .bind(email)
        .bind(password_digest)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}

/// True when the error is a unique-constraint violation (duplicate email).
pub fn is_unique_violation(err: &DatabaseError) -> bool {
    match err {
        DatabaseError::Sqlx(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
        _ => false,
    }
}
