use crate::models::User;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// DirectoryError
///
/// Failure taxonomy of the identity directory. Deliberately small and total:
/// a credential lookup either resolves a user or it does not, and the caller
/// surfaces that as a login-form error rather than a redirect or crash.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// The username was unknown or the supplied secret did not match.
    /// The two cases are intentionally indistinguishable to the caller.
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Directory Trait
///
/// Defines the abstract contract for identity lookups. This is the core of the
/// directory abstraction: the gates and handlers interact with identities
/// without knowing the concrete backing store (static demo table, LDAP,
/// external IdP, etc.), so the in-memory stand-in can be swapped for a real
/// credential store without touching any authorization logic.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Directory>`) safely shareable and usable across Axum's
/// asynchronous task boundaries.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Verifies a username/secret pair. On success returns the user's profile
    /// with the credential stripped; the returned `User` must never carry
    /// secret material.
    async fn verify_credentials(
        &self,
        username: &str,
        secret: &str,
    ) -> Result<User, DirectoryError>;

    /// Resolves a username to its profile, if present. Used when re-validating
    /// the subject of a session token on each request, so users removed from
    /// the directory immediately lose access even with an unexpired token.
    async fn find_user(&self, username: &str) -> Option<User>;

    /// Lists all profiles (without credentials). Admin oversight only.
    async fn list_users(&self) -> Vec<User>;
}

/// DirectoryState
///
/// The concrete type used to share directory access across the application state.
pub type DirectoryState = Arc<dyn Directory>;

/// DirectoryRecord
///
/// Internal storage shape: the public profile plus the secret it is verified
/// against. The secret never leaves this module.
struct DirectoryRecord {
    profile: User,
    secret: String,
}

/// StaticDirectory
///
/// The in-memory implementation of `Directory`, seeded at startup and
/// read-only afterwards. Stands in for a real identity provider in this demo
/// deployment; the comparison is plain string equality, which is acceptable
/// only because the seeded credentials are demo fixtures (see DESIGN.md).
#[derive(Default)]
pub struct StaticDirectory {
    records: HashMap<String, DirectoryRecord>,
}

impl StaticDirectory {
    /// Creates an empty directory. Useful for tests that want full control
    /// over the population.
    pub fn new() -> Self {
        Self::default()
    }

    /// seeded
    ///
    /// Builds the canonical demo population: one user per portal role.
    pub fn seeded() -> Self {
        Self::new()
            .with_user("admin", "Administrator", "admin", "admin123")
            .with_user("organizer", "Event Organizer", "organizer", "org123")
            .with_user("staff", "Check-in Staff", "staff", "staff123")
            .with_user("reviewer", "Abstract Reviewer", "reviewer", "rev123")
    }

    /// with_user
    ///
    /// Builder-style insertion of one record. Assigns a fresh UUID; the id is
    /// stable for the process lifetime, which is all the session model needs.
    pub fn with_user(mut self, username: &str, name: &str, role: &str, secret: &str) -> Self {
        self.records.insert(
            username.to_string(),
            DirectoryRecord {
                profile: User {
                    id: Uuid::new_v4(),
                    username: username.to_string(),
                    name: name.to_string(),
                    role: role.to_string(),
                },
                secret: secret.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl Directory for StaticDirectory {
    /// verify_credentials
    ///
    /// Read-only lookup followed by an exact secret comparison. The profile
    /// clone handed back carries no credential field at all, so stripping is
    /// structural rather than a convention callers must remember.
    async fn verify_credentials(
        &self,
        username: &str,
        secret: &str,
    ) -> Result<User, DirectoryError> {
        match self.records.get(username) {
            Some(record) if record.secret == secret => Ok(record.profile.clone()),
            _ => Err(DirectoryError::InvalidCredentials),
        }
    }

    async fn find_user(&self, username: &str) -> Option<User> {
        self.records.get(username).map(|r| r.profile.clone())
    }

    /// list_users
    ///
    /// Sorted by username so the admin listing is deterministic.
    async fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.records.values().map(|r| r.profile.clone()).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }
}
