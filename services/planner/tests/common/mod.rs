//! Shared fakes for the planner integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use studytime_core::domain::{
    Activity, NewActivity, NewTask, NewUser, Stats, Task, Theme, User, ViewType,
};
use studytime_core::ports::{PortError, PortResult, RemoteStore, SessionStore};
use uuid::Uuid;

use planner_lib::app::{AppState, Planner};

//=========================================================================================
// In-memory remote store
//=========================================================================================

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    tasks: Vec<Task>,
    activities: Vec<Activity>,
    failing: HashSet<&'static str>,
    calls: HashMap<&'static str, usize>,
}

/// Behaves like the remote service: assigns ids, computes stats on read, and
/// fails any operation named through `fail_on`.
#[derive(Default, Clone)]
pub struct FakeStore {
    inner: Arc<Mutex<Inner>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, op: &'static str) {
        self.inner.lock().unwrap().failing.insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.inner.lock().unwrap().failing.remove(op);
    }

    pub fn calls(&self, op: &'static str) -> usize {
        self.inner.lock().unwrap().calls.get(op).copied().unwrap_or(0)
    }

    pub fn task_count(&self) -> usize {
        self.inner.lock().unwrap().tasks.len()
    }

    /// Inserts a task directly, bypassing the client.
    pub fn seed_task(&self, user_id: Uuid, data: &NewTask) -> Task {
        let task = build_task(user_id, data);
        self.inner.lock().unwrap().tasks.push(task.clone());
        task
    }

    pub fn seed_activity(&self, user_id: Uuid, data: &NewActivity) -> Activity {
        let activity = build_activity(user_id, data);
        self.inner.lock().unwrap().activities.push(activity.clone());
        activity
    }

    fn enter(&self, op: &'static str) -> PortResult<std::sync::MutexGuard<'_, Inner>> {
        let mut inner = self.inner.lock().unwrap();
        *inner.calls.entry(op).or_default() += 1;
        if inner.failing.contains(op) {
            return Err(PortError::Network(format!("{op} unavailable")));
        }
        Ok(inner)
    }
}

fn build_task(user_id: Uuid, data: &NewTask) -> Task {
    Task {
        id: Uuid::new_v4(),
        user_id,
        title: data.title.clone(),
        description: data.description.clone(),
        subject: data.subject.clone(),
        task_type: data.task_type,
        priority: data.priority,
        due_date: data.due_date.clone(),
        estimated_duration: data.estimated_duration,
        completed: false,
        completed_at: None,
        color: data.color.clone(),
        created_at: None,
        updated_at: None,
    }
}

fn build_activity(user_id: Uuid, data: &NewActivity) -> Activity {
    Activity {
        id: Uuid::new_v4(),
        user_id,
        title: data.title.clone(),
        description: data.description.clone(),
        activity_type: data.activity_type,
        start_datetime: data.start_datetime.clone(),
        end_datetime: data.end_datetime.clone(),
        location: data.location.clone(),
        recurrence: data.recurrence.clone(),
        color: data.color.clone(),
        created_at: None,
        updated_at: None,
    }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn create_user(&self, user: &NewUser) -> PortResult<User> {
        let mut inner = self.enter("create_user")?;
        let created = User {
            id: Uuid::new_v4(),
            name: user.name.clone(),
            email: user.email.clone(),
            year_level: user.year_level,
            subjects: user.subjects.clone(),
            theme: Theme::Light,
            default_view: ViewType::Month,
            created_at: Some(Utc::now().naive_utc().to_string()),
        };
        inner.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_tasks(&self, user_id: Uuid) -> PortResult<Vec<Task>> {
        let inner = self.enter("list_tasks")?;
        Ok(inner.tasks.iter().filter(|t| t.user_id == user_id).cloned().collect())
    }

    async fn list_activities(&self, user_id: Uuid) -> PortResult<Vec<Activity>> {
        let inner = self.enter("list_activities")?;
        Ok(inner.activities.iter().filter(|a| a.user_id == user_id).cloned().collect())
    }

    async fn get_stats(&self, user_id: Uuid) -> PortResult<Stats> {
        let inner = self.enter("get_stats")?;
        let now = Utc::now();
        let week = now + Duration::days(7);
        let mine: Vec<&Task> = inner.tasks.iter().filter(|t| t.user_id == user_id).collect();
        let completed = mine.iter().filter(|t| t.completed).count() as u32;
        let pending: Vec<&&Task> = mine.iter().filter(|t| !t.completed).collect();
        Ok(Stats {
            total_tasks: mine.len() as u32,
            completed_tasks: completed,
            pending_tasks: pending.len() as u32,
            overdue_tasks: pending
                .iter()
                .filter(|t| t.due().map(|d| d < now).unwrap_or(false))
                .count() as u32,
            upcoming_tasks: pending
                .iter()
                .filter(|t| t.due().map(|d| d >= now && d <= week).unwrap_or(false))
                .count() as u32,
            total_activities: inner.activities.iter().filter(|a| a.user_id == user_id).count()
                as u32,
        })
    }

    async fn create_task(&self, user_id: Uuid, task: &NewTask) -> PortResult<Task> {
        let mut inner = self.enter("create_task")?;
        if !inner.users.contains_key(&user_id) {
            return Err(PortError::NotFound("User not found".to_string()));
        }
        let created = build_task(user_id, task);
        inner.tasks.push(created.clone());
        Ok(created)
    }

    async fn create_activity(&self, user_id: Uuid, activity: &NewActivity) -> PortResult<Activity> {
        let mut inner = self.enter("create_activity")?;
        if !inner.users.contains_key(&user_id) {
            return Err(PortError::NotFound("User not found".to_string()));
        }
        let created = build_activity(user_id, activity);
        inner.activities.push(created.clone());
        Ok(created)
    }

    async fn set_task_completed(&self, task_id: Uuid, completed: bool) -> PortResult<Task> {
        let mut inner = self.enter("set_task_completed")?;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| PortError::NotFound("Task not found".to_string()))?;
        task.completed = completed;
        task.completed_at = completed.then(|| Utc::now().naive_utc().to_string());
        Ok(task.clone())
    }

    async fn delete_task(&self, task_id: Uuid) -> PortResult<()> {
        let mut inner = self.enter("delete_task")?;
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != task_id);
        if inner.tasks.len() == before {
            return Err(PortError::NotFound("Task not found".to_string()));
        }
        Ok(())
    }

    async fn delete_activity(&self, activity_id: Uuid) -> PortResult<()> {
        let mut inner = self.enter("delete_activity")?;
        let before = inner.activities.len();
        inner.activities.retain(|a| a.id != activity_id);
        if inner.activities.len() == before {
            return Err(PortError::NotFound("Activity not found".to_string()));
        }
        Ok(())
    }
}

//=========================================================================================
// In-memory session store
//=========================================================================================

#[derive(Default, Clone)]
pub struct MemorySessions {
    saved: Arc<Mutex<Option<User>>>,
}

impl MemorySessions {
    pub fn saved(&self) -> Option<User> {
        self.saved.lock().unwrap().clone()
    }
}

impl SessionStore for MemorySessions {
    fn load(&self) -> PortResult<Option<User>> {
        Ok(self.saved.lock().unwrap().clone())
    }

    fn save(&self, user: &User) -> PortResult<()> {
        *self.saved.lock().unwrap() = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        *self.saved.lock().unwrap() = None;
        Ok(())
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

pub async fn start_planner(store: &FakeStore, sessions: &MemorySessions) -> Planner {
    Planner::start(AppState {
        remote: Arc::new(store.clone()),
        sessions: Arc::new(sessions.clone()),
        notification_ttl: std::time::Duration::from_secs(3),
    })
    .await
}

/// A planner already logged in as alice@example.com.
pub async fn logged_in(store: &FakeStore) -> Planner {
    let mut planner = start_planner(store, &MemorySessions::default()).await;
    planner.login("alice@example.com", "secret").await.unwrap();
    planner
}
