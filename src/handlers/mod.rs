// Two handler tiers: public (no authentication) and current (token
// authentication required, everything owner-scoped to the caller).
pub mod current;
pub mod public;
