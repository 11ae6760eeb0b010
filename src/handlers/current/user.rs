use axum::{response::Json, Extension};

use crate::database::models::user::UserProfile;
use crate::middleware::AuthUser;

/// GET /api/v1/current/user - the authenticated user's profile
///
/// Returns exactly `{id, name, email}`.
pub async fn show(Extension(auth_user): Extension<AuthUser>) -> Json<UserProfile> {
    Json(UserProfile {
        id: auth_user.id,
        name: auth_user.name,
        email: auth_user.email,
    })
}
