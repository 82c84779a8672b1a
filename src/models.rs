use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Identity Schemas ---

/// User
///
/// Represents the authenticated identity resolved by the directory lookup.
/// This structure is what the gates and handlers see; the credential stored
/// alongside it in the directory is stripped before a `User` is ever returned,
/// so no secret material can leak into responses or logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct User {
    // Stable identifier assigned by the directory.
    pub id: Uuid,
    // The login name, also the subject of issued session tokens.
    pub username: String,
    // Human-readable display name (e.g., "Check-in Staff").
    pub name: String,
    // The RBAC field: 'admin', 'organizer', 'staff' or 'reviewer'.
    // Kept as a plain string so unknown roles are representable and fail closed.
    pub role: String,
}

/// UserProfile
///
/// Output schema for the authenticated user's profile (GET /me).
/// Provides a slightly richer set of data than the internal `User` struct.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub role: String,
    // Dynamic URL for a profile image/avatar.
    pub avatar_url: Option<String>,
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for the public login endpoint (POST /login).
/// Note: The password is compared inside the directory and never persisted,
/// echoed, or logged by this application.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// --- Response Schemas (Output) ---

/// LoginResponse
///
/// Output schema for a successful login. Carries the signed session token,
/// the resolved user (without credential), and the role-appropriate landing
/// route so the frontend knows where to navigate next.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    /// The signed bearer token the client must present on subsequent requests.
    pub token: String,
    pub user: User,
    /// Role-dependent entry route (e.g., staff land on the check-in scanner).
    pub landing: String,
}

/// NavItem
///
/// One entry of the portal's navigation menu, annotated with whether the
/// current user's role can reach it. The frontend hides entries where
/// `allowed` is false; the enforcing gates remain the actual security boundary.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct NavItem {
    pub route: String,
    pub label: String,
    pub allowed: bool,
}

/// RouteAccess
///
/// Output schema for the single-route reachability check (GET /me/access).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RouteAccess {
    pub route: String,
    pub allowed: bool,
}

/// Landing
///
/// Output schema for GET /me/landing: the entry route for the current role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Landing {
    pub route: String,
}

// --- Role-Area Page Descriptors ---
//
// The portal's CRUD screens (events, sessions, tickets, speakers,
// registrations) live in the frontend and are out of scope here. Each gated
// area exposes one descriptor endpoint with static payloads so the route
// groups have a real, testable surface behind the gates.

/// DashboardSummary
///
/// Output schema for the organizer dashboard (GET /dashboard). The figures
/// are static demo data, standing in for the widget feeds of the full portal.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DashboardSummary {
    pub upcoming_events: i64,
    pub total_registrations: i64,
    pub tickets_sold: i64,
    pub pending_abstracts: i64,
}

/// CheckinStation
///
/// Output schema for the staff check-in area (GET /checkin-scanner).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CheckinStation {
    pub station: String,
    pub scanner_ready: bool,
    pub checked_in_today: i64,
}

/// AbstractQueue
///
/// Output schema for the reviewer area (GET /abstracts).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AbstractQueue {
    pub assigned: i64,
    pub reviewed: i64,
    #[ts(type = "string")]
    pub review_deadline: DateTime<Utc>,
}
