/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules,
/// enforcing a Defense-in-Depth strategy. This structure ensures that
/// access control is applied explicitly at the module level (via Axum layers),
/// preventing accidental exposure of protected endpoints.
///
/// The modules map directly to the portal's access tiers.

/// Routes accessible to all users (anonymous): health probe and login.
pub mod public;

/// Routes protected by the authenticated-access gate.
/// Requires a validated user session, any role.
pub mod authenticated;

/// Role-restricted feature areas (organizer dashboard, staff check-in,
/// reviewer abstracts). Each router is wrapped in its role gate at assembly.
pub mod restricted;

/// Routes restricted exclusively to users with the 'admin' role.
/// Implements mandatory authorization checks.
pub mod admin;
