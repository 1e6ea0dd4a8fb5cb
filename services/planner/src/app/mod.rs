pub mod cache;
pub mod notifications;
pub mod pipeline;
pub mod session_gate;
pub mod state;
pub mod views;

// Re-export the owner and its parts so the binary and tests can reach them
// without spelling out the module layout.
pub use cache::EntityCache;
pub use notifications::{Notification, NotificationKind, NotificationQueue};
pub use pipeline::{Forms, MutationPipeline};
pub use session_gate::SessionGate;
pub use state::{AppState, Planner};
