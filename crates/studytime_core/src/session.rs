//! crates/studytime_core/src/session.rs
//!
//! The session lifecycle as a plain state machine. Side effects (persistence,
//! cache loading) belong to whoever owns the value.

use crate::domain::User;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    /// A login round trip is in flight.
    Loading,
    Authenticated(User),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LoginStarted,
    LoginSucceeded(User),
    LoginFailed,
    /// A persisted user was found at startup.
    Restored(User),
    LoggedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot apply {event} while {state}")]
pub struct InvalidTransition {
    pub state: &'static str,
    pub event: &'static str,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    /// Computes the state that follows `event`. Logging out is accepted from any
    /// state so it can never fail.
    pub fn transition(&self, event: SessionEvent) -> Result<SessionState, InvalidTransition> {
        use SessionEvent::*;
        use SessionState::*;

        match (self, event) {
            (_, LoggedOut) => Ok(Unauthenticated),
            (Unauthenticated, LoginStarted) => Ok(Loading),
            (Unauthenticated, Restored(user)) => Ok(Authenticated(user)),
            (Loading, LoginSucceeded(user)) => Ok(Authenticated(user)),
            (Loading, LoginFailed) => Ok(Unauthenticated),
            (state, event) => Err(InvalidTransition {
                state: state.name(),
                event: event.name(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Loading => "loading",
            SessionState::Authenticated(_) => "authenticated",
        }
    }
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            SessionEvent::LoginStarted => "login-started",
            SessionEvent::LoginSucceeded(_) => "login-succeeded",
            SessionEvent::LoginFailed => "login-failed",
            SessionEvent::Restored(_) => "restored",
            SessionEvent::LoggedOut => "logged-out",
        }
    }
}
