//! crates/studytime_core/src/ports.rs
//!
//! Defines the service contracts (traits) the planner core depends on.
//! The remote store and the persisted session are both reached only through
//! these ports, so the state layer stays independent of HTTP and the filesystem.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Activity, NewActivity, NewTask, NewUser, Stats, Task, User};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// Errors surfaced by any port implementation.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The request could not be completed at all.
    #[error("Network failure: {0}")]
    Network(String),
    /// The remote store answered with an error status.
    #[error("Remote store returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
    /// Local persistence failed.
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The remote persistence service, consumed through its fixed request/response contract.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    // --- Users ---
    async fn create_user(&self, user: &NewUser) -> PortResult<User>;

    // --- Bulk reads ---
    async fn list_tasks(&self, user_id: Uuid) -> PortResult<Vec<Task>>;

    async fn list_activities(&self, user_id: Uuid) -> PortResult<Vec<Activity>>;

    async fn get_stats(&self, user_id: Uuid) -> PortResult<Stats>;

    // --- Mutations ---
    async fn create_task(&self, user_id: Uuid, task: &NewTask) -> PortResult<Task>;

    async fn create_activity(&self, user_id: Uuid, activity: &NewActivity) -> PortResult<Activity>;

    async fn set_task_completed(&self, task_id: Uuid, completed: bool) -> PortResult<Task>;

    async fn delete_task(&self, task_id: Uuid) -> PortResult<()>;

    async fn delete_activity(&self, activity_id: Uuid) -> PortResult<()>;
}

/// Persisted client state: the current user under a single well-known key.
pub trait SessionStore: Send + Sync {
    /// Returns the persisted user, or `None` when nothing was saved.
    fn load(&self) -> PortResult<Option<User>>;

    fn save(&self, user: &User) -> PortResult<()>;

    /// Removes the persisted user. Clearing an empty store is not an error.
    fn clear(&self) -> PortResult<()>;
}
