//! In-process identity provider for testing and offline use.
//!
//! Accounts live in a `HashMap` keyed by email. The provider enforces the
//! same basic rules a hosted provider would (email shape, minimum password
//! length, unique registration) and reports failures with the same kind of
//! human-readable messages.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::watch;
use uuid::Uuid;

use super::{AuthError, IdentityProvider, OAuthProvider, User, UserAttributes};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

/// [`IdentityProvider`] that keeps accounts in memory.
#[derive(Debug)]
pub struct InMemoryIdentityProvider {
    /// Email -> account.
    accounts: Mutex<HashMap<String, Account>>,
    /// OAuth provider -> email of the linked account.
    oauth_links: Mutex<HashMap<OAuthProvider, String>>,
    /// The live session.
    session: watch::Sender<Option<User>>,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityProvider {
    /// Creates a provider with no accounts and no session.
    #[must_use]
    pub fn new() -> Self {
        let (session, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            oauth_links: Mutex::new(HashMap::new()),
            session,
        }
    }

    /// Links an OAuth identity to an existing account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`] if no account is registered under `email`.
    pub fn link_oauth_identity(&self, provider: OAuthProvider, email: &str) -> Result<(), AuthError> {
        if !self.accounts.lock().contains_key(email) {
            return Err(AuthError::Provider(format!("no account registered for {email}")));
        }
        self.oauth_links.lock().insert(provider, email.to_string());
        Ok(())
    }

    /// The user currently signed in, if any.
    #[must_use]
    pub fn session_user(&self) -> Option<User> {
        self.session.borrow().clone()
    }

    /// Number of registered accounts.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.lock().len()
    }

    fn start_session(&self, user: User) {
        tracing::debug!(user_id = %user.id, "session started");
        self.session.send_replace(Some(user));
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(AuthError::Provider(
            "Unable to validate email address: invalid format".to_string(),
        ))
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Provider(format!(
            "Password should be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        validate_email(email)?;
        validate_password(password)?;

        let user = {
            let mut accounts = self.accounts.lock();
            if accounts.contains_key(email) {
                return Err(AuthError::Provider("User already registered".to_string()));
            }
            let user = User {
                id: Uuid::now_v7().to_string(),
                email: Some(email.to_string()),
                metadata: super::UserMetadata::default(),
            };
            accounts.insert(
                email.to_string(),
                Account {
                    user: user.clone(),
                    password: password.to_string(),
                },
            );
            user
        };

        self.start_session(user);
        Ok(())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .accounts
            .lock()
            .get(email)
            .filter(|account| account.password == password)
            .map(|account| account.user.clone())
            .ok_or_else(|| AuthError::Provider("Invalid login credentials".to_string()))?;

        self.start_session(user.clone());
        Ok(user)
    }

    async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> Result<(), AuthError> {
        let email = self
            .oauth_links
            .lock()
            .get(&provider)
            .cloned()
            .ok_or_else(|| AuthError::Provider(format!("no {provider} identity linked")))?;
        let user = self
            .accounts
            .lock()
            .get(&email)
            .map(|account| account.user.clone())
            .ok_or_else(|| AuthError::Provider(format!("no {provider} identity linked")))?;

        self.start_session(user);
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.session.send_replace(None);
        Ok(())
    }

    async fn update_user(&self, attributes: UserAttributes) -> Result<User, AuthError> {
        let current_email = self
            .session
            .borrow()
            .as_ref()
            .and_then(|user| user.email.clone())
            .ok_or_else(|| AuthError::Provider("Auth session missing!".to_string()))?;

        if let Some(email) = &attributes.email {
            validate_email(email)?;
        }
        if let Some(password) = &attributes.password {
            validate_password(password)?;
        }

        let user = {
            let mut accounts = self.accounts.lock();
            let taken = attributes
                .email
                .as_ref()
                .is_some_and(|email| *email != current_email && accounts.contains_key(email));
            if taken {
                return Err(AuthError::Provider(
                    "A user with this email address has already been registered".to_string(),
                ));
            }

            let mut account = accounts
                .remove(&current_email)
                .ok_or_else(|| AuthError::Provider("User not found".to_string()))?;
            if let Some(password) = attributes.password {
                account.password = password;
            }
            if let Some(data) = &attributes.data {
                account.user.metadata.merge(data);
            }
            if let Some(email) = attributes.email {
                let mut links = self.oauth_links.lock();
                for linked in links.values_mut() {
                    if *linked == current_email {
                        linked.clone_from(&email);
                    }
                }
                account.user.email = Some(email);
            }

            let user = account.user.clone();
            let key = user.email.clone().unwrap_or(current_email);
            accounts.insert(key, account);
            user
        };

        self.session.send_replace(Some(user.clone()));
        Ok(user)
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.session.subscribe()
    }
}
