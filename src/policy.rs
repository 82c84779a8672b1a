use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

/// Role name with unconditional access. Checked before any table lookup.
pub const ADMIN_ROLE: &str = "admin";

/// Route-prefix wildcard meaning "all routes".
pub const WILDCARD: &str = "*";

/// AccessPolicy
///
/// The static role → allowed-route-prefix mapping that drives the
/// route-reachability predicate. Built once at startup, shared read-only as an
/// `Arc` snapshot across all request tasks, and never mutated afterwards: a
/// future runtime-reload feature must swap in a fresh snapshot rather than
/// edit this one in place.
///
/// A role with no entry has zero accessible routes: absence fails closed.
#[derive(Debug, Clone, Serialize, ToSchema, Default)]
pub struct AccessPolicy {
    grants: HashMap<String, Vec<String>>,
}

/// PolicyState
///
/// The concrete type used to share the policy snapshot across the application state.
pub type PolicyState = Arc<AccessPolicy>;

impl AccessPolicy {
    /// Creates an empty policy (every non-admin role denied everywhere).
    pub fn new() -> Self {
        Self::default()
    }

    /// seeded
    ///
    /// Builds the portal's canonical policy table. The admin wildcard entry is
    /// listed for completeness and for the `/admin/policy` view, though
    /// `can_access` never reaches it: the admin bypass is evaluated first.
    pub fn seeded() -> Self {
        Self::new()
            .grant(ADMIN_ROLE, &[WILDCARD])
            .grant("organizer", &["/", "/index", "/dashboard"])
            .grant("staff", &["/checkin-scanner"])
            .grant("reviewer", &["/abstracts"])
    }

    /// grant
    ///
    /// Builder-style registration of one role's allowed prefixes. Later calls
    /// for the same role replace the earlier entry.
    pub fn grant(mut self, role: &str, prefixes: &[&str]) -> Self {
        self.grants.insert(
            role.to_string(),
            prefixes.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    /// can_access
    ///
    /// The route-reachability predicate. Used for UI-level conditional
    /// rendering (hiding unreachable menu entries); the enforcing gates in
    /// `auth` remain the actual security boundary.
    ///
    /// Matching is literal-string based, not path-segment-normalized. A route
    /// reaches an allowed prefix only if it equals the prefix exactly, or
    /// extends it with `/` (sub-route) or `?` (query string). Bare substring
    /// extensions do not count: with `/dashboard` granted, `/dashboard/1` and
    /// `/dashboard?x=1` pass while `/dashboard2` must not.
    pub fn can_access(&self, role: &str, route: &str) -> bool {
        // Admin bypass is absolute and precedes the table lookup.
        if role == ADMIN_ROLE {
            return true;
        }

        // Unknown role: empty allowed set, fails closed.
        let Some(prefixes) = self.grants.get(role) else {
            return false;
        };

        prefixes.iter().any(|allowed| {
            if allowed == WILDCARD {
                return true;
            }
            route == allowed
                || route
                    .strip_prefix(allowed.as_str())
                    .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('?'))
        })
    }

    /// Read-only view of one role's prefix list. Empty for unknown roles.
    pub fn allowed_prefixes(&self, role: &str) -> &[String] {
        self.grants.get(role).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// landing_page_for
///
/// Pure role → entry-route mapping, consulted once after a successful login to
/// decide where to send the user. Never participates in authorization
/// decisions: a staff member *lands* on the scanner but is *kept out* of the
/// dashboard by the gates, not by this function.
pub fn landing_page_for(role: &str) -> &'static str {
    match role {
        "admin" => "/",
        "organizer" => "/",
        "staff" => "/checkin-scanner",
        "reviewer" => "/abstracts",
        // Unrecognized roles fall back to the home page.
        _ => "/",
    }
}
