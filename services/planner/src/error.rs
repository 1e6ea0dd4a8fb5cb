//! services/planner/src/error.rs
//!
//! Defines the primary error type for the planner client.

use crate::config::ConfigError;
use studytime_core::ports::PortError;
use studytime_core::session::InvalidTransition;

/// The primary error type for the `planner` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// An operation was attempted in a session state that does not allow it.
    #[error("Session error: {0}")]
    Session(#[from] InvalidTransition),

    /// An operation needs a logged-in user.
    #[error("Not logged in")]
    NotAuthenticated,

    /// Represents an error building the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Command-line input that could not be turned into a request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
