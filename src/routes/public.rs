use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client
/// (anonymous or logged-in). This is the portal's entry surface: the liveness
/// probe and the credential exchange.
///
/// Security Mandate:
/// Nothing in this module may reveal directory contents. The login handler
/// responds identically for unknown usernames and wrong passwords, and a
/// failed login is a form error; the redirect-to-login outcome belongs to
/// the gates guarding the protected modules, never to this one.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // POST /login
        // Credential exchange: verifies the username/password pair against the
        // identity directory and issues the signed session token together with
        // the role-appropriate landing route.
        .route("/login", post(handlers::login))
}
