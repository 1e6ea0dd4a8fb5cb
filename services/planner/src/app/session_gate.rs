//! services/planner/src/app/session_gate.rs
//!
//! Owns the current user identity and its persisted copy. Whether the entity
//! cache may be populated at all is decided here.

use std::sync::Arc;
use studytime_core::domain::{NewUser, User};
use studytime_core::ports::{RemoteStore, SessionStore};
use studytime_core::session::{SessionEvent, SessionState};
use tracing::{error, info, warn};

use crate::error::ClientError;

pub struct SessionGate {
    state: SessionState,
    store: Arc<dyn SessionStore>,
}

impl SessionGate {
    /// Restores a persisted user without touching the network. A missing or
    /// unreadable session file leaves the gate unauthenticated.
    pub fn restore(store: Arc<dyn SessionStore>) -> Self {
        let state = match store.load() {
            Ok(Some(user)) => {
                info!("Restored session for {}", user.email);
                SessionState::Unauthenticated
                    .transition(SessionEvent::Restored(user))
                    .unwrap_or_default()
            }
            Ok(None) => SessionState::Unauthenticated,
            Err(e) => {
                warn!("Ignoring unreadable persisted session: {}", e);
                SessionState::Unauthenticated
            }
        };
        Self { state, store }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user()
    }

    /// Creates the account derived from `email` on the remote store and
    /// authenticates as it. Any password is accepted.
    pub async fn login(
        &mut self,
        remote: &dyn RemoteStore,
        email: &str,
        _password: &str,
    ) -> Result<User, ClientError> {
        self.state = self.state.transition(SessionEvent::LoginStarted)?;

        let new_user = NewUser::from_email(email);
        match remote.create_user(&new_user).await {
            Ok(user) => {
                self.state = self.state.transition(SessionEvent::LoginSucceeded(user.clone()))?;
                if let Err(e) = self.store.save(&user) {
                    warn!("Logged in but could not persist the session: {}", e);
                }
                info!("Logged in as {} ({})", user.name, user.id);
                Ok(user)
            }
            Err(e) => {
                error!("Login error: {:?}", e);
                self.state = self.state.transition(SessionEvent::LoginFailed)?;
                Err(e.into())
            }
        }
    }

    /// Forgets the user in memory and on disk.
    pub fn logout(&mut self) {
        if let Some(user) = self.state.user() {
            info!("Logging out {}", user.email);
        }
        self.state = self.state.transition(SessionEvent::LoggedOut).unwrap_or_default();
        if let Err(e) = self.store.clear() {
            warn!("Could not remove the persisted session: {}", e);
        }
    }
}
