use crate::{
    AppState,
    auth::{self, CurrentUser},
    models::{
        AbstractQueue, CheckinStation, DashboardSummary, Landing, LoginRequest, LoginResponse,
        NavItem, RouteAccess, User, UserProfile,
    },
    policy::{AccessPolicy, landing_page_for},
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{Duration, Utc};
use serde::Deserialize;

/// The portal's fixed navigation menu: (route, label) pairs. The `/me/nav`
/// handler annotates each entry with the current role's reachability.
const PORTAL_MENU: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/dashboard", "Dashboard"),
    ("/checkin-scanner", "Check-in Scanner"),
    ("/abstracts", "Abstracts"),
];

// --- Filter Structs ---

/// AccessQuery
///
/// Defines the accepted query parameters for the reachability check endpoint
/// (GET /me/access). Used by Axum's Query extractor to safely bind the route
/// string being asked about.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct AccessQuery {
    /// The route path to evaluate against the current user's role.
    pub route: String,
}

// --- Handlers ---

/// login
///
/// [Public Route] Authenticates a username/password pair against the identity
/// directory and, on success, issues a signed session token plus the
/// role-appropriate landing route.
///
/// *Failure semantics*: a failed lookup is a **login-form error** (401 with a
/// JSON body), never a redirect; the redirect-to-login outcome belongs to the
/// gates, not to the login endpoint itself. Empty fields are rejected here as
/// input glue before the directory is consulted.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Missing Fields"),
        (status = 401, description = "Invalid Credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<serde_json::Value>)> {
    // Input glue: non-emptiness only. Format rules beyond this do not exist.
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "username and password are required" })),
        ));
    }

    let user = state
        .directory
        .verify_credentials(&payload.username, &payload.password)
        .await
        .map_err(|_| {
            // Unknown username and wrong secret are deliberately indistinguishable.
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "invalid credentials" })),
            )
        })?;

    let token = auth::issue_token(&user, &state.config).map_err(|e| {
        tracing::error!("failed to sign session token: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "token signing failed" })),
        )
    })?;

    let landing = landing_page_for(&user.role).to_string();

    tracing::info!(username = %user.username, role = %user.role, "login succeeded");

    Ok(Json(LoginResponse {
        token,
        user,
        landing,
    }))
}

/// get_me
///
/// [Authenticated Route] Provides the authenticated user's profile information.
///
/// *Note*: The avatar URL is fabricated dynamically from the username,
/// simulating data that would typically come from a profile service.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Profile", body = UserProfile))
)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(UserProfile {
        id: user.id,
        // Using a DiceBear API for stable, unique avatar generation based on username.
        avatar_url: Some(format!(
            "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
            user.username
        )),
        username: user.username,
        name: user.name,
        role: user.role,
    })
}

/// get_nav
///
/// [Authenticated Route] Returns the portal menu with each entry annotated by
/// the route-reachability predicate for the current user's role. Strictly a
/// UI affordance: hiding a menu item is cosmetic, and the enforcing gates on
/// the route groups remain the security boundary.
#[utoipa::path(
    get,
    path = "/me/nav",
    responses((status = 200, description = "Navigation menu", body = [NavItem]))
)]
pub async fn get_nav(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Json<Vec<NavItem>> {
    let items = PORTAL_MENU
        .iter()
        .map(|(route, label)| NavItem {
            route: route.to_string(),
            label: label.to_string(),
            allowed: state.policy.can_access(&user.role, route),
        })
        .collect();
    Json(items)
}

/// check_access
///
/// [Authenticated Route] Single-route reachability check for the current
/// user's role, e.g. before the frontend renders a deep link.
#[utoipa::path(
    get,
    path = "/me/access",
    params(AccessQuery),
    responses((status = 200, description = "Reachability verdict", body = RouteAccess))
)]
pub async fn check_access(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<AccessQuery>,
) -> Json<RouteAccess> {
    let allowed = state.policy.can_access(&user.role, &query.route);
    Json(RouteAccess {
        route: query.route,
        allowed,
    })
}

/// get_landing
///
/// [Authenticated Route] The entry route for the current user's role, for
/// clients that restore a session from a stored token without re-logging-in.
#[utoipa::path(
    get,
    path = "/me/landing",
    responses((status = 200, description = "Landing route", body = Landing))
)]
pub async fn get_landing(CurrentUser(user): CurrentUser) -> Json<Landing> {
    Json(Landing {
        route: landing_page_for(&user.role).to_string(),
    })
}

/// get_dashboard
///
/// [Organizer Area] Dashboard summary figures. Static demo data standing in
/// for the portal's widget feeds; the interesting part is the gate in front
/// of this handler, not the payload.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn get_dashboard() -> Json<DashboardSummary> {
    Json(DashboardSummary {
        upcoming_events: 4,
        total_registrations: 1286,
        tickets_sold: 975,
        pending_abstracts: 42,
    })
}

/// get_checkin_station
///
/// [Staff Area] Check-in scanner station descriptor.
#[utoipa::path(
    get,
    path = "/checkin-scanner",
    responses(
        (status = 200, description = "Check-in station", body = CheckinStation),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn get_checkin_station() -> Json<CheckinStation> {
    Json(CheckinStation {
        station: "Main Hall Entrance".to_string(),
        scanner_ready: true,
        checked_in_today: 312,
    })
}

/// get_abstract_queue
///
/// [Reviewer Area] Abstract review queue descriptor.
#[utoipa::path(
    get,
    path = "/abstracts",
    responses(
        (status = 200, description = "Abstract queue", body = AbstractQueue),
        (status = 403, description = "Role not permitted")
    )
)]
pub async fn get_abstract_queue() -> Json<AbstractQueue> {
    Json(AbstractQueue {
        assigned: 18,
        reviewed: 7,
        review_deadline: Utc::now() + Duration::days(14),
    })
}

/// list_users
///
/// [Admin Route] Directory listing for oversight. The `Directory` contract
/// guarantees the returned profiles carry no credential material.
#[utoipa::path(
    get,
    path = "/admin/users",
    responses((status = 200, description = "All users", body = [User]))
)]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.directory.list_users().await)
}

/// view_policy
///
/// [Admin Route] The access-policy table as configured at startup. Read-only:
/// there is deliberately no endpoint that mutates the policy at runtime.
#[utoipa::path(
    get,
    path = "/admin/policy",
    responses((status = 200, description = "Access policy", body = AccessPolicy))
)]
pub async fn view_policy(State(state): State<AppState>) -> Json<AccessPolicy> {
    Json(state.policy.as_ref().clone())
}
