// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Routes in this tier sit behind jwt_auth_middleware and receive the
// caller as an `Extension<AuthUser>`.
pub mod products;
