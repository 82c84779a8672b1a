use event_portal::models::{LoginResponse, NavItem, User};
use uuid::Uuid;

// --- Tests ---

#[test]
fn test_user_serialization_has_no_credential_field() {
    // The User struct is structurally incapable of carrying a secret; this
    // guards against a future field addition re-introducing one on the wire.
    let user = User {
        id: Uuid::new_v4(),
        username: "staff".to_string(),
        name: "Check-in Staff".to_string(),
        role: "staff".to_string(),
    };

    let json_output = serde_json::to_string(&user).unwrap();

    assert!(json_output.contains(r#""username":"staff""#));
    assert!(!json_output.contains("password"));
    assert!(!json_output.contains("secret"));
}

#[test]
fn test_login_response_wire_shape() {
    let response = LoginResponse {
        token: "header.payload.signature".to_string(),
        user: User {
            id: Uuid::new_v4(),
            username: "reviewer".to_string(),
            name: "Abstract Reviewer".to_string(),
            role: "reviewer".to_string(),
        },
        landing: "/abstracts".to_string(),
    };

    let json_output = serde_json::to_string(&response).unwrap();

    // The frontend contract: token, nested user, and landing route.
    assert!(json_output.contains(r#""token":"header.payload.signature""#));
    assert!(json_output.contains(r#""landing":"/abstracts""#));
    assert!(json_output.contains(r#""role":"reviewer""#));
}

#[test]
fn test_nav_item_deserializes_from_frontend_shape() {
    let item: NavItem =
        serde_json::from_str(r#"{"route":"/dashboard","label":"Dashboard","allowed":false}"#)
            .unwrap();

    assert_eq!(item.route, "/dashboard");
    assert!(!item.allowed);
}
