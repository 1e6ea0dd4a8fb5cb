//! services/planner/src/app/cache.rs
//!
//! The in-memory copy of the current user's tasks, activities and stats.
//!
//! Readers get shared slices. Writes are crate-private and happen only through
//! the bulk loader and the mutation pipeline.

use studytime_core::domain::{Activity, Stats, Task};
use studytime_core::ports::{PortResult, RemoteStore};
use tracing::{debug, error, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct EntityCache {
    owner: Option<Uuid>,
    tasks: Vec<Task>,
    activities: Vec<Activity>,
    stats: Stats,
    loading: bool,
    last_error: Option<String>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    //=====================================================================================
    // Read accessors
    //=====================================================================================

    pub fn owner(&self) -> Option<Uuid> {
        self.owner
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Latest fetched snapshot; all zeros until a load succeeds.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the most recent failed load, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn task(&self, task_id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    //=====================================================================================
    // Bulk loading
    //=====================================================================================

    /// Fetches tasks, activities and stats for `user_id` concurrently and swaps
    /// them in together. On failure nothing is replaced and the error is returned.
    pub async fn bulk_load(&mut self, store: &dyn RemoteStore, user_id: Uuid) -> PortResult<()> {
        if self.owner.is_some_and(|owner| owner != user_id) {
            self.clear();
        }

        self.loading = true;
        debug!("Loading schedule for user {}", user_id);
        let result = futures::try_join!(
            store.list_tasks(user_id),
            store.list_activities(user_id),
            store.get_stats(user_id)
        );
        self.loading = false;

        match result {
            Ok((tasks, activities, stats)) => {
                self.owner = Some(user_id);
                self.tasks = owned_only(tasks, user_id, |t: &Task| t.user_id, "task");
                self.activities =
                    owned_only(activities, user_id, |a: &Activity| a.user_id, "activity");
                self.stats = stats;
                self.last_error = None;
                debug!(
                    "Schedule loaded: {} tasks, {} activities",
                    self.tasks.len(),
                    self.activities.len()
                );
                Ok(())
            }
            Err(e) => {
                error!("Error loading user data: {:?}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    //=====================================================================================
    // Crate-private mutation surface
    //=====================================================================================

    pub(crate) fn set_owner(&mut self, user_id: Uuid) {
        if self.owner != Some(user_id) {
            self.clear();
            self.owner = Some(user_id);
        }
    }

    /// Appends `task` unless a task with the same id is already cached.
    pub(crate) fn insert_task(&mut self, task: Task) -> bool {
        if !self.accepts(task.user_id, "task") || self.task(task.id).is_some() {
            return false;
        }
        self.tasks.push(task);
        true
    }

    pub(crate) fn insert_activity(&mut self, activity: Activity) -> bool {
        let duplicate = self.activities.iter().any(|a| a.id == activity.id);
        if !self.accepts(activity.user_id, "activity") || duplicate {
            return false;
        }
        self.activities.push(activity);
        true
    }

    /// Applies `update` to the task with `task_id`, leaving every other task untouched.
    pub(crate) fn update_task<F>(&mut self, task_id: Uuid, update: F) -> bool
    where
        F: FnOnce(&mut Task),
    {
        match self.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                update(task);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_task(&mut self, task_id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        self.tasks.len() != before
    }

    pub(crate) fn remove_activity(&mut self, activity_id: Uuid) -> bool {
        let before = self.activities.len();
        self.activities.retain(|a| a.id != activity_id);
        self.activities.len() != before
    }

    /// Forgets everything, including the owner.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    fn accepts(&self, user_id: Uuid, kind: &str) -> bool {
        match self.owner {
            Some(owner) if owner != user_id => {
                warn!("Refusing to cache {} owned by another user ({})", kind, user_id);
                false
            }
            _ => true,
        }
    }
}

fn owned_only<T>(
    items: Vec<T>,
    user_id: Uuid,
    owner_of: impl Fn(&T) -> Uuid,
    kind: &str,
) -> Vec<T> {
    let total = items.len();
    let kept: Vec<T> = items.into_iter().filter(|item| owner_of(item) == user_id).collect();
    if kept.len() != total {
        warn!("Dropped {} {} record(s) owned by another user", total - kept.len(), kind);
    }
    kept
}
