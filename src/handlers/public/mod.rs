// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition lives here; nothing in this tier sees an AuthUser.
pub mod auth;
