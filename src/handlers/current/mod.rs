// Current-user handlers - token authentication required.
//
// Route prefix: /api/v1/current plus the authenticated half of /api/v1/auth.
// Every database query on this tier is owner-scoped to the authenticated
// caller; a row owned by someone else is indistinguishable from a missing
// one (404, never 403).
pub mod articles;
pub mod auth;
pub mod user;
