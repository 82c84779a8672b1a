use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Restricted Router Module
///
/// One router per role-gated feature area, mirroring the portal's access
/// policy: organizers get the dashboard, check-in staff get the scanner
/// station, reviewers get the abstract queue. Each router is wrapped in its
/// role gate at assembly time in `create_router`; the admin role passes every
/// gate via the unconditional bypass.
///
/// The handlers behind these gates serve static page descriptors; the real
/// CRUD screens live in the frontend. What matters here is that each area has
/// a concrete, testable surface sitting behind the correct gate.

/// Organizer area: the dashboard. `/` is the portal home, which for
/// organizers (and admins) is the dashboard itself.
pub fn organizer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route("/dashboard", get(handlers::get_dashboard))
}

/// Staff area: the check-in scanner station.
pub fn staff_routes() -> Router<AppState> {
    Router::new().route("/checkin-scanner", get(handlers::get_checkin_station))
}

/// Reviewer area: the abstract review queue.
pub fn reviewer_routes() -> Router<AppState> {
    Router::new().route("/abstracts", get(handlers::get_abstract_queue))
}
