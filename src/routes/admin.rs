use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Defines the routes exclusively accessible to users with the 'admin' role.
/// These endpoints provide oversight of the identity directory and the access
/// policy itself.
///
/// Access Control:
/// This entire router is nested under '/admin' and wrapped in the admin gate
/// at assembly time. The gate is `require_role` with an **empty** allowed set:
/// only the unconditional admin bypass admits, which makes the precedence rule
/// (admin before membership) the sole admission path and keeps it exercised in
/// production, not just in tests.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/users
        // Lists every directory profile (credentials are structurally absent
        // from the returned records). Used for oversight of the seeded demo
        // population.
        .route("/users", get(handlers::list_users))
        // GET /admin/policy
        // The role → route-prefix table as configured at startup. Read-only;
        // policy changes require a restart so concurrent readers always see a
        // consistent snapshot.
        .route("/policy", get(handlers::view_policy))
}
