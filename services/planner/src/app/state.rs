//! services/planner/src/app/state.rs
//!
//! Defines the shared service handles and the process-wide `Planner` that owns
//! the session, the entity cache and the notification queue.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, Utc};
use studytime_core::domain::{Activity, NewActivity, NewTask, Task, User};
use studytime_core::filters::{ActivityFilter, TaskFilter, TaskSort};
use studytime_core::ports::{PortResult, RemoteStore, SessionStore};
use studytime_core::session::SessionState;
use studytime_core::CalendarItem;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::cache::EntityCache;
use crate::app::notifications::NotificationQueue;
use crate::app::pipeline::{Forms, MutationPipeline};
use crate::app::session_gate::SessionGate;
use crate::app::views::{self, Dashboard, MonthView, WeekView};
use crate::error::ClientError;

//=========================================================================================
// AppState (Service Handles)
//=========================================================================================

/// The ports the planner talks to, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub remote: Arc<dyn RemoteStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub notification_ttl: Duration,
}

//=========================================================================================
// Planner (Single Owner of Client State)
//=========================================================================================

/// Entering the authenticated state triggers exactly one bulk load; leaving it
/// discards the cache.
pub struct Planner {
    remote: Arc<dyn RemoteStore>,
    session: SessionGate,
    cache: EntityCache,
    notifications: NotificationQueue,
    forms: Forms,
}

impl Planner {
    /// Restores any persisted session and, if one was found, loads its data.
    pub async fn start(state: AppState) -> Self {
        let mut planner = Self {
            remote: state.remote,
            session: SessionGate::restore(state.sessions),
            cache: EntityCache::new(),
            notifications: NotificationQueue::new(state.notification_ttl),
            forms: Forms::default(),
        };

        if planner.session.user().is_some() {
            if let Err(e) = planner.load_current_user().await {
                warn!("Initial load after session restore failed: {}", e);
            }
        }
        planner
    }

    //=====================================================================================
    // Session
    //=====================================================================================

    pub fn session(&self) -> &SessionState {
        self.session.state()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    /// Logs in and loads the new user's data. A failed load does not undo the
    /// login; it is recorded on the cache (`last_error`) and logged.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ClientError> {
        let user = self.session.login(self.remote.as_ref(), email, password).await?;
        if let Err(e) = self.load_current_user().await {
            warn!("Initial load after login failed: {}", e);
        }
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.cache.clear();
        self.notifications.clear();
        self.forms = Forms::default();
        info!("Session closed, cache discarded");
    }

    /// Reloads everything for the current user.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.load_current_user().await.map_err(ClientError::from)
    }

    async fn load_current_user(&mut self) -> PortResult<()> {
        let Some(user_id) = self.session.user().map(|u| u.id) else {
            return Ok(());
        };
        self.cache.set_owner(user_id);
        self.cache.bulk_load(self.remote.as_ref(), user_id).await
    }

    //=====================================================================================
    // State accessors
    //=====================================================================================

    pub fn cache(&self) -> &EntityCache {
        &self.cache
    }

    pub fn notifications(&mut self) -> &mut NotificationQueue {
        &mut self.notifications
    }

    pub fn forms(&self) -> Forms {
        self.forms
    }

    pub fn open_task_form(&mut self) {
        self.forms.task_form_open = true;
    }

    pub fn open_activity_form(&mut self) {
        self.forms.activity_form_open = true;
    }

    //=====================================================================================
    // Mutations
    //=====================================================================================

    fn pipeline(&mut self) -> Result<MutationPipeline<'_>, ClientError> {
        let user = self.session.user().ok_or(ClientError::NotAuthenticated)?;
        Ok(MutationPipeline::new(
            user,
            self.remote.as_ref(),
            &mut self.cache,
            &mut self.notifications,
            &mut self.forms,
        ))
    }

    pub async fn create_task(&mut self, data: NewTask) -> Result<Option<Task>, ClientError> {
        Ok(self.pipeline()?.create_task(data).await)
    }

    pub async fn create_activity(
        &mut self,
        data: NewActivity,
    ) -> Result<Option<Activity>, ClientError> {
        Ok(self.pipeline()?.create_activity(data).await)
    }

    pub async fn toggle_task_completion(
        &mut self,
        task_id: Uuid,
        completed: bool,
    ) -> Result<Option<Task>, ClientError> {
        Ok(self.pipeline()?.toggle_task_completion(task_id, completed).await)
    }

    pub async fn delete_task(&mut self, task_id: Uuid) -> Result<bool, ClientError> {
        Ok(self.pipeline()?.delete_task(task_id).await)
    }

    pub async fn delete_activity(&mut self, activity_id: Uuid) -> Result<bool, ClientError> {
        Ok(self.pipeline()?.delete_activity(activity_id).await)
    }

    //=====================================================================================
    // Views (local time zone)
    //=====================================================================================

    pub fn dashboard(&self, now: DateTime<Utc>) -> Dashboard {
        views::dashboard(&self.cache, now)
    }

    pub fn tasks(&self, filter: TaskFilter, sort: TaskSort, now: DateTime<Utc>) -> Vec<Task> {
        views::task_list(&self.cache, filter, sort, now)
    }

    pub fn activities(&self, filter: ActivityFilter, now: DateTime<Utc>) -> Vec<Activity> {
        views::activity_list(&self.cache, filter, now)
    }

    pub fn month(&self, reference: NaiveDate) -> MonthView {
        views::month_view(&self.cache, reference, &Local)
    }

    pub fn week(&self, reference: NaiveDate) -> WeekView {
        views::week_view(&self.cache, reference, &Local)
    }

    pub fn day(&self, date: NaiveDate) -> Vec<CalendarItem> {
        views::day_items(&self.cache, date, &Local)
    }
}
