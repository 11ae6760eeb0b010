use axum::{extract::Path, response::Json};
use uuid::Uuid;

use crate::database::articles::ArticleRepository;
use crate::database::manager::DatabaseManager;
use crate::database::models::article::ArticleResponse;
use crate::error::ApiError;

/// GET /api/v1/articles - list published articles, newest first
///
/// No authentication. Owner identity is preloaded in the same query. The
/// result set is unbounded; pagination is a known omission.
pub async fn index() -> Result<Json<Vec<ArticleResponse>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let articles = ArticleRepository::new(pool).list_published().await?;

    Ok(Json(articles.into_iter().map(ArticleResponse::from).collect()))
}

/// GET /api/v1/articles/:id - show one published article
///
/// 404 when the id does not name a published article. Drafts are invisible
/// to everyone here, including their owner; a malformed id names nothing
/// and also 404s.
pub async fn show(Path(id): Path<String>) -> Result<Json<ArticleResponse>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::not_found("Record not found."))?;

    let pool = DatabaseManager::pool().await?;
    let article = ArticleRepository::new(pool)
        .find_published(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Record not found."))?;

    Ok(Json(article.into()))
}
