pub mod calendar;
pub mod domain;
pub mod filters;
pub mod ports;
pub mod session;
pub mod timestamp;

pub use domain::{
    Activity, ActivityType, CalendarItem, ItemKind, NewActivity, NewTask, NewUser, Priority, Stats,
    Task, TaskType, User,
};
pub use ports::{PortError, PortResult, RemoteStore, SessionStore};
pub use session::{SessionEvent, SessionState};
pub use timestamp::TimestampError;
