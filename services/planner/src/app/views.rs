//! services/planner/src/app/views.rs
//!
//! Read-only projections over the entity cache. Nothing here is stored; every
//! call recomputes from the cache's current contents.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use studytime_core::calendar::{self, MonthCell};
use studytime_core::domain::{Activity, CalendarItem, Stats, Task};
use studytime_core::filters::{self, ActivityFilter, TaskFilter, TaskSort};

use crate::app::cache::EntityCache;

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub stats: Stats,
    pub upcoming_tasks: Vec<Task>,
    pub upcoming_activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthView {
    pub title: String,
    pub cells: Vec<(MonthCell, Vec<CalendarItem>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekView {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<(NaiveDate, Vec<CalendarItem>)>,
}

pub fn dashboard(cache: &EntityCache, now: DateTime<Utc>) -> Dashboard {
    Dashboard {
        stats: cache.stats(),
        upcoming_tasks: filters::upcoming_tasks(cache.tasks(), now),
        upcoming_activities: filters::upcoming_activities(cache.activities(), now),
    }
}

pub fn task_list(
    cache: &EntityCache,
    filter: TaskFilter,
    sort: TaskSort,
    now: DateTime<Utc>,
) -> Vec<Task> {
    filters::query_tasks(cache.tasks(), filter, sort, now)
}

pub fn activity_list(
    cache: &EntityCache,
    filter: ActivityFilter,
    now: DateTime<Utc>,
) -> Vec<Activity> {
    filters::query_activities(cache.activities(), filter, now)
}

pub fn day_items<Tz: TimeZone>(cache: &EntityCache, date: NaiveDate, tz: &Tz) -> Vec<CalendarItem> {
    let mut items = calendar::items_for_date(date, cache.tasks(), cache.activities(), tz);
    calendar::sort_day_items(&mut items);
    items
}

pub fn month_view<Tz: TimeZone>(cache: &EntityCache, reference: NaiveDate, tz: &Tz) -> MonthView {
    let cells = calendar::month_grid(reference)
        .map(|cell| {
            let items = match cell {
                MonthCell::Blank => Vec::new(),
                MonthCell::Day(date) => {
                    calendar::items_for_date(date, cache.tasks(), cache.activities(), tz)
                }
            };
            (cell, items)
        })
        .collect();

    MonthView {
        title: calendar::month_title(reference),
        cells,
    }
}

pub fn week_view<Tz: TimeZone>(cache: &EntityCache, reference: NaiveDate, tz: &Tz) -> WeekView {
    let days = calendar::week_grid(reference);
    WeekView {
        start: days[0],
        end: days[6],
        days: days.iter().map(|date| (*date, day_items(cache, *date, tz))).collect(),
    }
}
