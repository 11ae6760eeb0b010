// Public handlers - no authentication required.
//
// Route prefix: /api/v1 (health check, published-article reads, token
// acquisition via sign-up and sign-in).
pub mod articles;
pub mod auth;
pub mod health;
