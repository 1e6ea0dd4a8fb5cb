//! services/planner/src/app/pipeline.rs
//!
//! Create, update and delete orchestration.
//!
//! Every mutation runs in two phases: the accepted result is merged into the
//! cache as soon as the remote store acknowledges it, then the whole cache is
//! reloaded so the server-side stats catch up. A failed reload never undoes the
//! merge. Remote failures leave the cache untouched and only surface as a
//! failure notification.

use studytime_core::domain::{Activity, NewActivity, NewTask, Task, User};
use studytime_core::ports::RemoteStore;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::app::cache::EntityCache;
use crate::app::notifications::NotificationQueue;

pub const TASK_CREATED: &str = "Task created and added to calendar!";
pub const TASK_CREATE_FAILED: &str = "Failed to create task. Please try again.";
pub const ACTIVITY_CREATED: &str = "Activity created and added to calendar!";
pub const ACTIVITY_CREATE_FAILED: &str = "Failed to create activity. Please try again.";
pub const TASK_COMPLETED: &str = "Task completed!";
pub const TASK_REOPENED: &str = "Task marked as incomplete";
pub const TASK_UPDATE_FAILED: &str = "Failed to update task status";
pub const TASK_DELETED: &str = "Task deleted";
pub const TASK_DELETE_FAILED: &str = "Failed to delete task";
pub const ACTIVITY_DELETED: &str = "Activity deleted";
pub const ACTIVITY_DELETE_FAILED: &str = "Failed to delete activity";

/// Which creation forms are open. A form closes when its submission succeeds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Forms {
    pub task_form_open: bool,
    pub activity_form_open: bool,
}

/// Borrowed view over everything a mutation touches. Holding the cache by
/// `&mut` serializes mutations: the next one cannot start until this one,
/// refresh included, has finished.
pub struct MutationPipeline<'a> {
    pub(crate) user: &'a User,
    pub(crate) remote: &'a dyn RemoteStore,
    pub(crate) cache: &'a mut EntityCache,
    pub(crate) notifications: &'a mut NotificationQueue,
    pub(crate) forms: &'a mut Forms,
}

impl<'a> MutationPipeline<'a> {
    pub fn new(
        user: &'a User,
        remote: &'a dyn RemoteStore,
        cache: &'a mut EntityCache,
        notifications: &'a mut NotificationQueue,
        forms: &'a mut Forms,
    ) -> Self {
        Self {
            user,
            remote,
            cache,
            notifications,
            forms,
        }
    }

    pub async fn create_task(&mut self, data: NewTask) -> Option<Task> {
        match self.remote.create_task(self.user.id, &data).await {
            Ok(task) => {
                info!("Created task {} '{}'", task.id, task.title);
                self.cache.insert_task(task.clone());
                self.forms.task_form_open = false;
                self.refresh().await;
                self.notifications.success(TASK_CREATED);
                Some(task)
            }
            Err(e) => {
                error!("Error creating task: {:?}", e);
                self.notifications.failure(TASK_CREATE_FAILED);
                None
            }
        }
    }

    /// End-after-start is the remote store's rule to enforce, not checked here.
    pub async fn create_activity(&mut self, data: NewActivity) -> Option<Activity> {
        match self.remote.create_activity(self.user.id, &data).await {
            Ok(activity) => {
                info!("Created activity {} '{}'", activity.id, activity.title);
                self.cache.insert_activity(activity.clone());
                self.forms.activity_form_open = false;
                self.refresh().await;
                self.notifications.success(ACTIVITY_CREATED);
                Some(activity)
            }
            Err(e) => {
                error!("Error creating activity: {:?}", e);
                self.notifications.failure(ACTIVITY_CREATE_FAILED);
                None
            }
        }
    }

    pub async fn toggle_task_completion(&mut self, task_id: Uuid, completed: bool) -> Option<Task> {
        match self.remote.set_task_completed(task_id, completed).await {
            Ok(updated) => {
                info!("Task {} completed={}", task_id, completed);
                self.cache.update_task(task_id, |task| {
                    if updated.id == task.id && updated.user_id == task.user_id {
                        *task = updated.clone();
                    }
                    task.completed = completed;
                });
                self.refresh().await;
                if completed {
                    self.notifications.success(TASK_COMPLETED);
                } else {
                    self.notifications.info(TASK_REOPENED);
                }
                Some(updated)
            }
            Err(e) => {
                error!("Error updating task: {:?}", e);
                self.notifications.failure(TASK_UPDATE_FAILED);
                None
            }
        }
    }

    pub async fn delete_task(&mut self, task_id: Uuid) -> bool {
        match self.remote.delete_task(task_id).await {
            Ok(()) => {
                info!("Deleted task {}", task_id);
                self.cache.remove_task(task_id);
                self.refresh().await;
                self.notifications.success(TASK_DELETED);
                true
            }
            Err(e) => {
                error!("Error deleting task: {:?}", e);
                self.notifications.failure(TASK_DELETE_FAILED);
                false
            }
        }
    }

    pub async fn delete_activity(&mut self, activity_id: Uuid) -> bool {
        match self.remote.delete_activity(activity_id).await {
            Ok(()) => {
                info!("Deleted activity {}", activity_id);
                self.cache.remove_activity(activity_id);
                self.refresh().await;
                self.notifications.success(ACTIVITY_DELETED);
                true
            }
            Err(e) => {
                error!("Error deleting activity: {:?}", e);
                self.notifications.failure(ACTIVITY_DELETE_FAILED);
                false
            }
        }
    }

    // Phase two. The cache keeps the phase-one merge when this fails.
    async fn refresh(&mut self) {
        if let Err(e) = self.cache.bulk_load(self.remote, self.user.id).await {
            warn!("Refresh after mutation failed, keeping local changes: {}", e);
        }
    }
}
