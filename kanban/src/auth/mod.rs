//! Authentication boundary for the board.
//!
//! The board only ever needs one thing from authentication: the id of the
//! acting user, read through an [`AuthContext`]. Everything else (sign-up,
//! sign-in, profile changes) is delegated to an external
//! [`IdentityProvider`] and driven by [`service::AuthService`].
//!
//! Implementations of the provider include:
//! - [`memory::InMemoryIdentityProvider`]: in-process accounts for testing
//!   and offline use
//!
//! The `kanban` binary does not run a provider; it builds a fixed context
//! from `--user` or the config file. An embedder that wants live sessions
//! hands the service's context to the store, and tasks are then attributed
//! to whoever is signed in at the time of each add:
//!
//! ```no_run
//! use kanban::auth::{AuthService, InMemoryIdentityProvider};
//! use kanban::board::BoardStore;
//! use kanban::storage::{DEFAULT_STORAGE_KEY, MemoryStorage};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), kanban::auth::AuthError> {
//! let service = AuthService::new(InMemoryIdentityProvider::new());
//! let _listener = service.spawn_session_listener();
//! let store = BoardStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY, service.context());
//!
//! service.sign_up("ada@example.com", "secret1").await?;
//! let _id = store.add_task("todo", "attributed to ada", None);
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod service;

pub use memory::InMemoryIdentityProvider;
pub use service::AuthService;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Errors surfaced by authentication operations.
///
/// Every variant renders as a message suitable for showing to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The current password did not verify during a password change.
    #[error("current password incorrect")]
    CurrentPasswordIncorrect,

    /// The operation requires a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// The identity provider rejected the request.
    #[error("{0}")]
    Provider(String),
}

/// Third-party sign-in providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    /// Google accounts.
    Google,
    /// GitHub accounts.
    GitHub,
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::GitHub => write!(f, "github"),
        }
    }
}

/// Free-form profile metadata attached to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    /// Display name.
    pub full_name: Option<String>,
}

/// Partial profile metadata; only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New display name.
    pub full_name: Option<String>,
}

impl UserMetadata {
    /// Merges `update` into this metadata, keeping fields it leaves unset.
    pub fn merge(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.full_name {
            self.full_name = Some(name.clone());
        }
    }
}

/// A signed-in account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable account identifier; this is what tasks are attributed to.
    pub id: String,
    /// Account email, if the provider exposes one.
    pub email: Option<String>,
    /// Profile metadata.
    #[serde(default)]
    pub metadata: UserMetadata,
}

impl User {
    /// Creates a user with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            metadata: UserMetadata::default(),
        }
    }

    /// Name to show for this user: full name, then email, then id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.metadata
            .full_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Attributes to change on the signed-in account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAttributes {
    /// New email address.
    pub email: Option<String>,
    /// New password.
    pub password: Option<String>,
    /// Profile metadata to merge.
    pub data: Option<ProfileUpdate>,
}

/// Session state published by [`AuthService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    /// The signed-in user, if any.
    pub user: Option<User>,
    /// True until the first session resolution arrives.
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

/// Read-only view of the current session.
///
/// Cheap to clone. Reads always return the latest published state and never
/// call out to the identity provider.
#[derive(Debug, Clone)]
pub struct AuthContext {
    rx: watch::Receiver<AuthState>,
}

impl AuthContext {
    /// Wraps a receiver of published auth state.
    #[must_use]
    pub const fn new(rx: watch::Receiver<AuthState>) -> Self {
        Self { rx }
    }

    /// A fixed, already-resolved session for `user_id`.
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self::fixed(Some(User::new(user_id)))
    }

    /// A fixed, already-resolved session with nobody signed in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::fixed(None)
    }

    fn fixed(user: Option<User>) -> Self {
        // The receiver keeps the last value after the sender is dropped.
        let (_tx, rx) = watch::channel(AuthState {
            user,
            loading: false,
        });
        Self { rx }
    }

    /// Id of the signed-in user, if any.
    #[must_use]
    pub fn current_user_id(&self) -> Option<String> {
        self.rx.borrow().user.as_ref().map(|u| u.id.clone())
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.rx.borrow().user.clone()
    }

    /// Whether the session is still being resolved.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.rx.borrow().loading
    }

    /// Snapshot of the full auth state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.rx.borrow().clone()
    }

    /// Waits for the next state change.
    ///
    /// Returns `false` once the publisher is gone and no further changes
    /// can arrive.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// External identity provider.
///
/// Every call either succeeds or fails with an [`AuthError`] carrying a
/// human-readable message. Session changes are delivered through
/// [`subscribe`](Self::subscribe), never as return values.
pub trait IdentityProvider: Send + Sync {
    /// Register a new account with email and password.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// Sign in with email and password, returning the signed-in user.
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, AuthError>> + Send;

    /// Sign in through a third-party provider.
    fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
    ) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// End the current session.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// Change attributes of the signed-in account, returning the updated user.
    fn update_user(
        &self,
        attributes: UserAttributes,
    ) -> impl Future<Output = Result<User, AuthError>> + Send;

    /// Subscribe to session changes. The current value is the live session.
    fn subscribe(&self) -> watch::Receiver<Option<User>>;
}
