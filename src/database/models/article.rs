use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of an article. A row starts as an `unsaved` placeholder draft
/// and is promoted to `published` by an explicit update; there is no way
/// back and no other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "article_status", rename_all = "lowercase")]
pub enum ArticleStatus {
    Unsaved,
    Published,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Article row joined with its owner's name, as selected by every read
/// query (one joined query, no per-row owner lookups).
#[derive(Debug, Clone, FromRow)]
pub struct ArticleWithOwner {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_name: String,
}

/// Wire shape of an article, owner identity nested under `user`.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: ArticleOwner,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleOwner {
    pub id: Uuid,
    pub name: String,
}

impl From<ArticleWithOwner> for ArticleResponse {
    fn from(row: ArticleWithOwner) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: ArticleOwner {
                id: row.user_id,
                name: row.owner_name,
            },
        }
    }
}

/// Publication is one-way. Allowing a published article back into the
/// unsaved state would also collide with the one-draft-per-user index
/// whenever the owner already holds a fresh draft.
pub fn status_transition_errors(current: ArticleStatus, next: ArticleStatus) -> Vec<String> {
    if current == ArticleStatus::Published && next == ArticleStatus::Unsaved {
        vec!["Status cannot be changed back to unsaved".to_string()]
    } else {
        Vec::new()
    }
}

/// Presence validation applied to every user-supplied write. The placeholder
/// draft insert is the only path allowed to persist empty fields.
pub fn validation_errors(title: &str, content: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push("Title can't be blank".to_string());
    }
    if content.trim().is_empty() {
        errors.push("Content can't be blank".to_string());
    }
    errors
}
