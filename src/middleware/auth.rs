use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{self, decode_token};
use crate::database::manager::DatabaseManager;
use crate::database::models::user::User;
use crate::database::users::UserRepository;
use crate::error::ApiError;

/// Message returned with every 401 from this middleware.
pub const SIGN_IN_REQUIRED: &str = "You need to sign in or sign up before continuing.";

/// Authenticated user context extracted from a validated token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Token authentication middleware.
///
/// Validates the request's token, loads the user it names, and injects an
/// [`AuthUser`] into request extensions. On success a rotated token with a
/// fresh expiry is written into the response headers (access-token,
/// token-type, uid, expiry), so each authenticated call reissues the
/// client's credential. Any failure is a 401 with an `errors` message array.
pub async fn token_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token =
        extract_token_from_headers(&headers).ok_or_else(|| ApiError::unauthorized(SIGN_IN_REQUIRED))?;

    let claims = decode_token(&token).map_err(|_| ApiError::unauthorized(SIGN_IN_REQUIRED))?;

    // The token is only half the credential: the user row must still exist
    let pool = DatabaseManager::pool().await?;
    let user = UserRepository::new(pool)
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized(SIGN_IN_REQUIRED))?;

    let auth_user = AuthUser::from(&user);
    request.extensions_mut().insert(auth_user);

    let mut response = next.run(request).await;

    // Rotate the credential on every authenticated response
    match auth::issue_token(user.id, &user.email) {
        Ok(issued) => issued.apply(response.headers_mut()),
        Err(e) => tracing::error!("failed to rotate auth token for {}: {}", user.id, e),
    }

    Ok(response)
}

/// Extract the auth token from headers. Accepts `Authorization: Bearer`
/// or the bare `access-token` header the rotation writes.
fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("authorization") {
        let auth_str = auth_header.to_str().ok()?;
        let token = auth_str.strip_prefix("Bearer ")?.trim();
        if token.is_empty() {
            return None;
        }
        return Some(token.to_string());
    }

    let token = headers.get("access-token")?.to_str().ok()?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
