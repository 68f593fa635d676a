use anyhow::{Context, Result};
use log::{info, warn};

use crate::api::{LoginSession, UserProfile};

use super::store::SessionStore;

/// Storage key for the backend session token.
pub const SESSION_NAME_KEY: &str = "sessionName";
/// Storage key for the cached user profile (JSON-encoded).
pub const USER_DATA_KEY: &str = "userData";
/// Storage key for the backend host URL. Survives logout so the next login
/// doesn't have to repeat it.
pub const HOST_KEY: &str = "host";

/// Typed view over a [`SessionStore`]: login persists the token and profile,
/// logout removes both, startup restores whatever is there.
pub struct Session<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Restores a persisted login, if any. A stored profile that no longer
    /// parses is dropped with a warning rather than blocking the session.
    pub fn load(&self) -> Option<LoginSession> {
        let session_name = self.store.get(SESSION_NAME_KEY)?;
        let user = self.store.get(USER_DATA_KEY).and_then(|raw| {
            match serde_json::from_str::<UserProfile>(&raw) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!("Ignoring unreadable stored user profile: {}", e);
                    None
                }
            }
        });
        Some(LoginSession { session_name, user })
    }

    pub fn persist(&mut self, login: &LoginSession) -> Result<()> {
        self.store.set(SESSION_NAME_KEY, &login.session_name)?;
        match &login.user {
            Some(profile) => {
                let encoded = serde_json::to_string(profile)
                    .context("Failed to serialize user profile")?;
                self.store.set(USER_DATA_KEY, &encoded)?;
            }
            // A re-login without profile data must not leave a stale one
            None => self.store.remove(USER_DATA_KEY)?,
        }
        info!("Session persisted");
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(SESSION_NAME_KEY)?;
        self.store.remove(USER_DATA_KEY)?;
        info!("Session cleared");
        Ok(())
    }

    pub fn session_name(&self) -> Option<String> {
        self.store.get(SESSION_NAME_KEY)
    }

    pub fn host(&self) -> Option<String> {
        self.store.get(HOST_KEY)
    }

    pub fn set_host(&mut self, host: &str) -> Result<()> {
        self.store.set(HOST_KEY, host)
    }
}
