use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::article::{ArticleStatus, ArticleWithOwner};

const SELECT_WITH_OWNER: &str = "SELECT a.id, a.user_id, a.title, a.content, a.status, \
     a.created_at, a.updated_at, u.name AS owner_name \
     FROM articles a JOIN users u ON u.id = a.user_id";

/// Data access for articles. The current-user surface takes the owner id as
/// a mandatory parameter on every function, so an unscoped query cannot be
/// written by accident; the public surface filters on published status
/// instead.
pub struct ArticleRepository {
    pool: PgPool,
}

impl ArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All published articles, newest first, with owner preloaded.
    pub async fn list_published(&self) -> Result<Vec<ArticleWithOwner>, DatabaseError> {
        let sql = format!(
            "{} WHERE a.status = $1 ORDER BY a.created_at DESC, a.id DESC",
            SELECT_WITH_OWNER
        );
        let rows = sqlx::query_as::<_, ArticleWithOwner>(&sql)
            .bind(ArticleStatus::Published)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// One published article by id. Drafts are invisible here regardless of
    /// who asks.
    pub async fn find_published(&self, id: Uuid) -> Result<Option<ArticleWithOwner>, DatabaseError> {
        let sql = format!("{} WHERE a.status = $1 AND a.id = $2", SELECT_WITH_OWNER);
        let row = sqlx::query_as::<_, ArticleWithOwner>(&sql)
            .bind(ArticleStatus::Published)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// All of the owner's articles, any status, newest first.
    pub async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<ArticleWithOwner>, DatabaseError> {
        let sql = format!(
            "{} WHERE a.user_id = $1 ORDER BY a.created_at DESC, a.id DESC",
            SELECT_WITH_OWNER
        );
        let rows = sqlx::query_as::<_, ArticleWithOwner>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// One of the owner's articles by id. Another user's article comes back
    /// as None, indistinguishable from a missing row.
    pub async fn find_owned(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ArticleWithOwner>, DatabaseError> {
        let sql = format!("{} WHERE a.user_id = $1 AND a.id = $2", SELECT_WITH_OWNER);
        let row = sqlx::query_as::<_, ArticleWithOwner>(&sql)
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Return the owner's unsaved draft, creating it if absent. The insert
    /// races against the partial unique index on (user_id) WHERE status =
    /// 'unsaved': concurrent calls all land on the same row, never two
    /// drafts. Retries once for the window where the draft is published
    /// between the conflict and the re-select.
    pub async fn find_or_create_draft(
        &self,
        owner_id: Uuid,
    ) -> Result<ArticleWithOwner, DatabaseError> {
        for _ in 0..2 {
            sqlx::query(
                "INSERT INTO articles (user_id, title, content, status) \
                 VALUES ($1, '', '', $2) \
                 ON CONFLICT (user_id) WHERE status = 'unsaved' DO NOTHING",
            )
            .bind(owner_id)
            .bind(ArticleStatus::Unsaved)
            .execute(&self.pool)
            .await?;

            let sql = format!(
                "{} WHERE a.user_id = $1 AND a.status = $2 LIMIT 1",
                SELECT_WITH_OWNER
            );
            let draft = sqlx::query_as::<_, ArticleWithOwner>(&sql)
                .bind(owner_id)
                .bind(ArticleStatus::Unsaved)
                .fetch_optional(&self.pool)
                .await?;

            if let Some(draft) = draft {
                return Ok(draft);
            }
        }

        Err(DatabaseError::Sqlx(sqlx::Error::RowNotFound))
    }

    /// Persist the full resulting field set of an owner's article. Returns
    /// None when the row is absent or owned by someone else. Callers
    /// validate the resulting fields before calling; nothing partial is
    /// ever written.
    pub async fn update_owned(
        &self,
        owner_id: Uuid,
        id: Uuid,
        title: &str,
        content: &str,
        status: ArticleStatus,
    ) -> Result<Option<ArticleWithOwner>, DatabaseError> {
        let row = sqlx::query_as::<_, ArticleWithOwner>(
            "UPDATE articles a \
             SET title = $3, content = $4, status = $5, updated_at = now() \
             FROM users u \
             WHERE a.id = $2 AND a.user_id = $1 AND u.id = a.user_id \
             RETURNING a.id, a.user_id, a.title, a.content, a.status, \
                       a.created_at, a.updated_at, u.name AS owner_name",
        )
        .bind(owner_id)
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
