use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Defines the routes accessible to any user who has successfully passed the
/// authentication layer, regardless of role. These are the session
/// introspection endpoints the frontend shell needs on every page load:
/// profile, navigation menu, reachability checks, and the landing route.
///
/// Access Control Strategy:
/// The authenticated-access gate is applied as a route layer above this module
/// at assembly time, so every handler here can rely on the `CurrentUser`
/// extractor resolving. Role-specific enforcement does NOT happen here;
/// that is the job of the restricted and admin modules.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        // Retrieves the currently authenticated user's profile.
        .route("/me", get(handlers::get_me))
        // GET /me/nav
        // The portal menu, with each entry annotated by the route-reachability
        // predicate so the frontend can hide unreachable areas.
        .route("/me/nav", get(handlers::get_nav))
        // GET /me/access?route=...
        // Single-route reachability check for the current role.
        .route("/me/access", get(handlers::check_access))
        // GET /me/landing
        // The role-dependent entry route, for clients restoring a session
        // from a stored token.
        .route("/me/landing", get(handlers::get_landing))
}
