use axum::{response::Json, Extension};
use serde_json::{json, Value};

use crate::database::models::user::UserProfile;
use crate::middleware::AuthUser;

/// GET /api/v1/auth/validate_token - confirm the credential still works
///
/// Reaching this handler means the middleware already validated the token
/// and rotated it into the response headers; the body just confirms and
/// echoes the user.
pub async fn validate_token(Extension(auth_user): Extension<AuthUser>) -> Json<Value> {
    let profile = UserProfile {
        id: auth_user.id,
        name: auth_user.name,
        email: auth_user.email,
    };

    Json(json!({ "success": true, "data": profile }))
}

/// DELETE /api/v1/auth/sign_out - end the session
///
/// Tokens are self-contained, so there is nothing to revoke server-side;
/// the client discards its copy. The rotated token in this response's
/// headers is the last one issued for the session.
pub async fn sign_out(Extension(auth_user): Extension<AuthUser>) -> Json<Value> {
    tracing::info!("user {} signed out", auth_user.id);

    Json(json!({ "success": true }))
}
