use event_portal::{
    auth::{GateDenial, Session, require_auth, require_role},
    models::User,
};
use uuid::Uuid;

// --- Helpers ---

fn user_with_role(role: &str) -> User {
    User {
        id: Uuid::new_v4(),
        username: format!("{role}-user"),
        name: "Test User".to_string(),
        role: role.to_string(),
    }
}

// --- Authenticated-Access Gate ---

#[test]
fn test_require_auth_allows_authenticated_session() {
    let session = Session::authenticated(user_with_role("organizer"));

    let actor = require_auth(&session).expect("authenticated session must pass");
    assert_eq!(actor.role, "organizer");
}

#[test]
fn test_require_auth_redirects_anonymous_session() {
    let session = Session::anonymous();

    assert_eq!(
        require_auth(&session).unwrap_err(),
        GateDenial::NotAuthenticated
    );
}

// --- Role-Based Authorization Gate ---

#[test]
fn test_require_role_allows_member() {
    let session = Session::authenticated(user_with_role("staff"));

    assert!(require_role(&["staff"], &session).is_ok());
    assert!(require_role(&["organizer", "staff"], &session).is_ok());
}

#[test]
fn test_require_role_forbids_non_member() {
    let session = Session::authenticated(user_with_role("staff"));

    assert_eq!(
        require_role(&["organizer"], &session).unwrap_err(),
        GateDenial::NotAuthorized
    );
}

#[test]
fn test_admin_precedence_over_allowed_roles() {
    // Admin passes a gate whose allowed set does not mention admin at all.
    let session = Session::authenticated(user_with_role("admin"));

    assert!(require_role(&["staff"], &session).is_ok());
    assert!(require_role(&["organizer"], &session).is_ok());
    // Even the empty set admits the admin: the bypass precedes membership.
    assert!(require_role(&[], &session).is_ok());
}

#[test]
fn test_empty_allowed_set_forbids_everyone_but_admin() {
    let session = Session::authenticated(user_with_role("organizer"));

    assert_eq!(
        require_role(&[], &session).unwrap_err(),
        GateDenial::NotAuthorized
    );
}

#[test]
fn test_gate_ordering_authentication_first() {
    // No session: always the redirect outcome, never Forbidden, regardless
    // of what the allowed set contains.
    let session = Session::anonymous();

    assert_eq!(
        require_role(&["organizer"], &session).unwrap_err(),
        GateDenial::NotAuthenticated
    );
    assert_eq!(
        require_role(&[], &session).unwrap_err(),
        GateDenial::NotAuthenticated
    );
    assert_eq!(
        require_role(&["admin"], &session).unwrap_err(),
        GateDenial::NotAuthenticated
    );
}

#[test]
fn test_unknown_role_is_forbidden_not_fatal() {
    // A role string outside the fixed set is representable and fails closed.
    let session = Session::authenticated(user_with_role("speaker"));

    assert_eq!(
        require_role(&["organizer", "staff", "reviewer"], &session).unwrap_err(),
        GateDenial::NotAuthorized
    );
}

#[test]
fn test_gate_outcomes_are_idempotent() {
    let staff = Session::authenticated(user_with_role("staff"));
    let anonymous = Session::anonymous();

    // Evaluating the same (session, allowed_roles) pair repeatedly yields
    // identical outcomes: the gates are pure functions of their inputs.
    for _ in 0..3 {
        assert!(require_role(&["staff"], &staff).is_ok());
        assert_eq!(
            require_role(&["organizer"], &staff).unwrap_err(),
            GateDenial::NotAuthorized
        );
        assert_eq!(
            require_role(&["organizer"], &anonymous).unwrap_err(),
            GateDenial::NotAuthenticated
        );
    }
}
