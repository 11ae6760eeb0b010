use axum::{extract::Path, response::Json, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::articles::ArticleRepository;
use crate::database::manager::DatabaseManager;
use crate::database::models::article::{
    status_transition_errors, validation_errors, ArticleResponse, ArticleStatus,
};
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Whitelisted updatable fields. Anything else in the body is ignored;
/// absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleParams {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<ArticleStatus>,
}

/// Update body, with or without the `article` wrapper the original client
/// sends (`{"article": {...}}` and bare `{...}` both work).
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub article: Option<ArticleParams>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<ArticleStatus>,
}

impl UpdateRequest {
    fn into_params(self) -> ArticleParams {
        match self.article {
            Some(params) => params,
            None => ArticleParams {
                title: self.title,
                content: self.content,
                status: self.status,
            },
        }
    }
}

/// GET /api/v1/current/articles - the caller's articles, any status
pub async fn index(
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<ArticleResponse>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let articles = ArticleRepository::new(pool).list_owned(auth_user.id).await?;

    Ok(Json(articles.into_iter().map(ArticleResponse::from).collect()))
}

/// GET /api/v1/current/articles/:id - one of the caller's articles
pub async fn show(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let id = parse_article_id(&id)?;

    let pool = DatabaseManager::pool().await?;
    let article = ArticleRepository::new(pool)
        .find_owned(auth_user.id, id)
        .await?
        .ok_or_else(record_not_found)?;

    Ok(Json(article.into()))
}

/// POST /api/v1/current/articles - get-or-create the caller's draft
///
/// Returns the caller's existing unsaved draft if one exists, otherwise
/// creates one with empty title and content. Repeated calls before the
/// draft is published return the same article.
pub async fn create(
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let draft = ArticleRepository::new(pool)
        .find_or_create_draft(auth_user.id)
        .await?;

    Ok(Json(draft.into()))
}

/// PATCH/PUT /api/v1/current/articles/:id - partial update
///
/// Applies only the whitelisted fields present in the request. 404 when the
/// article is absent or owned by someone else; 422 when the resulting title
/// or content would be blank, or when the update would move a published
/// article back to unsaved - nothing is committed in either case.
pub async fn update(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRequest>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let id = parse_article_id(&id)?;
    let params = payload.into_params();

    let pool = DatabaseManager::pool().await?;
    let repo = ArticleRepository::new(pool);

    let article = repo
        .find_owned(auth_user.id, id)
        .await?
        .ok_or_else(record_not_found)?;

    let title = params.title.unwrap_or(article.title);
    let content = params.content.unwrap_or(article.content);
    let status = params.status.unwrap_or(article.status);

    let mut errors = validation_errors(&title, &content);
    errors.extend(status_transition_errors(article.status, status));
    if !errors.is_empty() {
        return Err(ApiError::unprocessable_entity(errors));
    }

    let updated = repo
        .update_owned(auth_user.id, id, &title, &content, status)
        .await?
        .ok_or_else(record_not_found)?;

    Ok(Json(updated.into()))
}

fn parse_article_id(raw: &str) -> Result<Uuid, ApiError> {
    // A malformed id names no article, so it reads as missing
    Uuid::parse_str(raw).map_err(|_| record_not_found())
}

fn record_not_found() -> ApiError {
    ApiError::not_found("Record not found.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_and_bare_update_bodies_agree() {
        let wrapped: UpdateRequest =
            serde_json::from_value(serde_json::json!({ "article": { "title": "T" } })).unwrap();
        let bare: UpdateRequest =
            serde_json::from_value(serde_json::json!({ "title": "T" })).unwrap();

        assert_eq!(wrapped.into_params().title.as_deref(), Some("T"));
        assert_eq!(bare.into_params().title.as_deref(), Some("T"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let req: UpdateRequest = serde_json::from_value(serde_json::json!({
            "article": { "title": "T", "user_id": "someone-else" }
        }))
        .unwrap();

        let params = req.into_params();
        assert_eq!(params.title.as_deref(), Some("T"));
        assert!(params.content.is_none());
    }

    #[test]
    fn status_parses_from_wire_strings() {
        let req: UpdateRequest =
            serde_json::from_value(serde_json::json!({ "status": "published" })).unwrap();
        assert_eq!(req.into_params().status, Some(ArticleStatus::Published));
    }
}
