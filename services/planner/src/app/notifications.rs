//! services/planner/src/app/notifications.rs
//!
//! Short-lived user-facing messages raised by mutations.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }
}

/// Notifications in creation order; each one expires `ttl` after it was pushed.
#[derive(Debug)]
pub struct NotificationQueue {
    ttl: Duration,
    items: VecDeque<Notification>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: VecDeque::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.push_at(kind, message, Instant::now());
    }

    pub fn push_at(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) {
        self.prune_at(now);
        self.items.push_back(Notification {
            message: message.into(),
            kind,
            created_at: now,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Success, message);
    }

    pub fn failure(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Failure, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Info, message);
    }

    /// Drops every notification whose lifetime has elapsed at `now`.
    pub fn prune_at(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items.retain(|n| !n.is_expired(now, ttl));
    }

    /// Live notifications, oldest first.
    pub fn active(&mut self) -> impl Iterator<Item = &Notification> {
        self.active_at(Instant::now())
    }

    pub fn active_at(&mut self, now: Instant) -> impl Iterator<Item = &Notification> {
        self.prune_at(now);
        self.items.iter()
    }

    /// The most recent live notification, the one a toast area would show.
    pub fn latest_at(&mut self, now: Instant) -> Option<&Notification> {
        self.prune_at(now);
        self.items.back()
    }

    pub fn latest(&mut self) -> Option<&Notification> {
        self.latest_at(Instant::now())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Every queued message, expired or not, without pruning.
    pub fn messages(&self) -> Vec<&str> {
        self.items.iter().map(|n| n.message.as_str()).collect()
    }
}
