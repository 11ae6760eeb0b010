use axum::{http::HeaderMap, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{self, password};
use crate::database::manager::DatabaseManager;
use crate::database::models::user::UserProfile;
use crate::database::users::{is_unique_violation, UserRepository};
use crate::error::ApiError;

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/v1/auth - register a new account
///
/// Expected input:
/// ```json
/// { "name": "string", "email": "string", "password": "string" }
/// ```
///
/// On success the response carries the user's profile under `data` and the
/// initial token in the access-token/token-type/uid/expiry headers. Invalid
/// input or a taken email is a 422 with an `errors` message array.
pub async fn sign_up(
    Json(payload): Json<SignUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let errors = validate_sign_up(&payload);
    if !errors.is_empty() {
        return Err(ApiError::unprocessable_entity(errors));
    }

    let digest = password::hash_password(&payload.password)?;

    let pool = DatabaseManager::pool().await?;
    let user = UserRepository::new(pool)
        .insert(payload.name.trim(), payload.email.trim(), &digest)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::unprocessable_entity(vec!["Email has already been taken".to_string()])
            } else {
                e.into()
            }
        })?;

    tracing::info!("registered user {}", user.id);

    let issued = auth::issue_token(user.id, &user.email)?;
    let mut headers = HeaderMap::new();
    issued.apply(&mut headers);

    let body = json!({ "status": "success", "data": UserProfile::from(&user) });
    Ok((headers, Json(body)))
}

/// POST /api/v1/auth/sign_in - authenticate and receive a token
///
/// Expected input:
/// ```json
/// { "email": "string", "password": "string" }
/// ```
///
/// Bad credentials are a 401 with an `errors` message array; the message
/// never says whether the email or the password was wrong.
pub async fn sign_in(
    Json(payload): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let invalid =
        || ApiError::unauthorized("Invalid login credentials. Please try again.");

    let pool = DatabaseManager::pool().await?;
    let user = UserRepository::new(pool)
        .find_by_email(payload.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&payload.password, &user.password_digest) {
        return Err(invalid());
    }

    let issued = auth::issue_token(user.id, &user.email)?;
    let mut headers = HeaderMap::new();
    issued.apply(&mut headers);

    let body = json!({ "data": UserProfile::from(&user) });
    Ok((headers, Json(body)))
}

fn validate_sign_up(payload: &SignUpRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push("Name can't be blank".to_string());
    }
    let email = payload.email.trim();
    if email.is_empty() {
        errors.push("Email can't be blank".to_string());
    } else if !email.contains('@') {
        errors.push("Email is invalid".to_string());
    }
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "Password is too short (minimum is {} characters)",
            MIN_PASSWORD_LENGTH
        ));
    }
    errors
}
