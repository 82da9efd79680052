//! The auth store: cached session state plus the auth operations.
//!
//! [`AuthService`] wraps an [`IdentityProvider`] and publishes an
//! [`AuthState`] that the rest of the application reads through an
//! [`AuthContext`]. Provider failures are returned to the caller unchanged;
//! nothing is retried.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{
    AuthContext, AuthError, AuthState, IdentityProvider, OAuthProvider, ProfileUpdate, User,
    UserAttributes,
};

/// Auth operations over an identity provider, with a cached session.
pub struct AuthService<P: IdentityProvider> {
    /// The external identity provider.
    provider: Arc<P>,
    /// Published session state. Starts out loading.
    state: Arc<watch::Sender<AuthState>>,
}

impl<P: IdentityProvider> AuthService<P> {
    /// Creates a service over `provider`. The state is loading until the first
    /// [`set_user`](Self::set_user) or session event.
    pub fn new(provider: P) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            provider: Arc::new(provider),
            state: Arc::new(state),
        }
    }

    /// A read handle on the session state.
    #[must_use]
    pub fn context(&self) -> AuthContext {
        AuthContext::new(self.state.subscribe())
    }

    /// The wrapped provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Replaces the cached user and marks the session as resolved.
    pub fn set_user(&self, user: Option<User>) {
        publish(&self.state, user);
    }

    /// Mirrors the provider's session stream into the cached state.
    ///
    /// The provider's current session is applied immediately, then every
    /// later change. The task ends when the provider drops its stream.
    pub fn spawn_session_listener(&self) -> JoinHandle<()> {
        let mut rx = self.provider.subscribe();
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let user = rx.borrow_and_update().clone();
            publish(&state, user);
            while rx.changed().await.is_ok() {
                let user = rx.borrow_and_update().clone();
                publish(&state, user);
            }
            tracing::debug!("identity provider session stream closed");
        })
    }

    /// Registers a new account and caches whatever session the provider
    /// started for it.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`].
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.provider.sign_up(email, password).await.inspect_err(|e| {
            tracing::warn!(error = %e, "sign-up failed");
        })?;
        let session = self.provider.subscribe().borrow().clone();
        tracing::info!(session = session.is_some(), "signed up");
        self.set_user(session);
        Ok(())
    }

    /// Signs in with email and password and caches the user.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`].
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .provider
            .sign_in_with_password(email, password)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "sign-in failed"))?;
        tracing::info!(user_id = %user.id, "signed in");
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// Starts a third-party sign-in. The session arrives through the
    /// provider's session stream.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`].
    pub async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> Result<(), AuthError> {
        self.provider
            .sign_in_with_oauth(provider)
            .await
            .inspect_err(|e| tracing::warn!(%provider, error = %e, "oauth sign-in failed"))?;
        tracing::info!(%provider, "oauth sign-in started");
        Ok(())
    }

    /// Ends the session and clears the cached user.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`]; the cached user is kept in that case.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider
            .sign_out()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "sign-out failed"))?;
        self.set_user(None);
        tracing::info!("signed out");
        Ok(())
    }

    /// Updates profile metadata and merges it into the cached user.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`].
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User, AuthError> {
        let user = self
            .provider
            .update_user(UserAttributes {
                data: Some(update.clone()),
                ..Default::default()
            })
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "profile update failed"))?;
        self.state.send_modify(|state| {
            if let Some(cached) = &mut state.user {
                cached.metadata.merge(&update);
            }
        });
        Ok(user)
    }

    /// Changes the account email and caches the updated user.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`].
    pub async fn update_email(&self, email: &str) -> Result<User, AuthError> {
        let user = self
            .provider
            .update_user(UserAttributes {
                email: Some(email.to_string()),
                ..Default::default()
            })
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "email update failed"))?;
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// Changes the password after re-checking the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] without a cached user,
    /// [`AuthError::CurrentPasswordIncorrect`] if `current` does not verify,
    /// or the provider's error from the update itself.
    pub async fn update_password(&self, current: &str, new: &str) -> Result<(), AuthError> {
        let user = self.context().current_user().ok_or(AuthError::NotSignedIn)?;
        let email = user.email.ok_or(AuthError::NotSignedIn)?;

        if let Err(e) = self.provider.sign_in_with_password(&email, current).await {
            tracing::warn!(error = %e, "current password did not verify");
            return Err(AuthError::CurrentPasswordIncorrect);
        }

        self.provider
            .update_user(UserAttributes {
                password: Some(new.to_string()),
                ..Default::default()
            })
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "password update failed"))?;
        tracing::info!("password updated");
        Ok(())
    }
}

fn publish(state: &watch::Sender<AuthState>, user: Option<User>) {
    state.send_replace(AuthState {
        user,
        loading: false,
    });
}
