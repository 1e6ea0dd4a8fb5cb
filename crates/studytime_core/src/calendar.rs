//! crates/studytime_core/src/calendar.rs
//!
//! The temporal index: month and week grids, per-day bucketing of tasks and
//! activities, and pure reference-date navigation. Weeks start on Sunday.

use chrono::{Datelike, Days, Months, NaiveDate, TimeZone};
use std::cmp::Ordering;
use tracing::warn;

use crate::domain::{Activity, CalendarItem, Task};
use crate::timestamp::{calendar_day, parse_timestamp};

//=========================================================================================
// Month grid
//=========================================================================================

/// One cell of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthCell {
    /// Padding before the first day of the month.
    Blank,
    Day(NaiveDate),
}

impl MonthCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            MonthCell::Blank => None,
            MonthCell::Day(date) => Some(*date),
        }
    }

    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.date() == Some(today)
    }
}

/// Lazy sequence of the cells for one month. Clone it to iterate again.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    first: NaiveDate,
    leading: u32,
    days: u32,
    position: u32,
}

impl MonthGrid {
    pub fn leading_blanks(&self) -> u32 {
        self.leading
    }

    pub fn days_in_month(&self) -> u32 {
        self.days
    }
}

impl Iterator for MonthGrid {
    type Item = MonthCell;

    fn next(&mut self) -> Option<MonthCell> {
        let position = self.position;
        if position >= self.leading + self.days {
            return None;
        }
        self.position += 1;

        if position < self.leading {
            return Some(MonthCell::Blank);
        }
        let offset = u64::from(position - self.leading);
        self.first.checked_add_days(Days::new(offset)).map(MonthCell::Day)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.leading + self.days).saturating_sub(self.position) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthGrid {}

/// The cells of the month containing `reference`, left-padded so day 1 lands in
/// its weekday column.
pub fn month_grid(reference: NaiveDate) -> MonthGrid {
    let first = first_of_month(reference);
    MonthGrid {
        first,
        leading: first.weekday().num_days_from_sunday(),
        days: days_in_month(first),
        position: 0,
    }
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => (next - first).num_days() as u32,
        // December of the last representable year.
        None => 31,
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Header label for a month view, e.g. "March 2024".
pub fn month_title(reference: NaiveDate) -> String {
    reference.format("%B %Y").to_string()
}

//=========================================================================================
// Week grid
//=========================================================================================

/// The seven days, Sunday through Saturday, of the week containing `reference`.
pub fn week_grid(reference: NaiveDate) -> [NaiveDate; 7] {
    let back = u64::from(reference.weekday().num_days_from_sunday());
    let sunday = reference.checked_sub_days(Days::new(back)).unwrap_or(reference);
    std::array::from_fn(|i| sunday.checked_add_days(Days::new(i as u64)).unwrap_or(sunday))
}

/// First and last day of the week containing `reference`.
pub fn week_range(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days = week_grid(reference);
    (days[0], days[6])
}

//=========================================================================================
// Navigation
//=========================================================================================

/// Moves the reference back one calendar month, clamping the day to the
/// target month's length (March 31 becomes February 29 or 28).
pub fn previous_month(reference: NaiveDate) -> NaiveDate {
    reference.checked_sub_months(Months::new(1)).unwrap_or(reference)
}

pub fn next_month(reference: NaiveDate) -> NaiveDate {
    reference.checked_add_months(Months::new(1)).unwrap_or(reference)
}

pub fn previous_week(reference: NaiveDate) -> NaiveDate {
    reference.checked_sub_days(Days::new(7)).unwrap_or(reference)
}

pub fn next_week(reference: NaiveDate) -> NaiveDate {
    reference.checked_add_days(Days::new(7)).unwrap_or(reference)
}

//=========================================================================================
// Day bucketing
//=========================================================================================

/// Every task due on `date` followed by every activity starting on `date`, where
/// "on" means the calendar day of the timestamp viewed from `tz`.
///
/// Records with unparseable timestamps are skipped and logged.
pub fn items_for_date<Tz: TimeZone>(
    date: NaiveDate,
    tasks: &[Task],
    activities: &[Activity],
    tz: &Tz,
) -> Vec<CalendarItem> {
    let mut items = Vec::new();

    for task in tasks {
        match calendar_day(&task.due_date, tz) {
            Ok(day) if day == date => items.push(CalendarItem::Task(task.clone())),
            Ok(_) => {}
            Err(e) => warn!(task_id = %task.id, "Skipping task with invalid due date: {}", e),
        }
    }

    for activity in activities {
        match calendar_day(&activity.start_datetime, tz) {
            Ok(day) if day == date => items.push(CalendarItem::Activity(activity.clone())),
            Ok(_) => {}
            Err(e) => {
                warn!(activity_id = %activity.id, "Skipping activity with invalid start: {}", e)
            }
        }
    }

    items
}

/// Orders one day's items for a timetable: tasks keep their relative order and
/// come first, activities follow by ascending start time.
pub fn sort_day_items(items: &mut [CalendarItem]) {
    items.sort_by(|a, b| match (a, b) {
        (CalendarItem::Task(_), CalendarItem::Task(_)) => Ordering::Equal,
        (CalendarItem::Task(_), CalendarItem::Activity(_)) => Ordering::Less,
        (CalendarItem::Activity(_), CalendarItem::Task(_)) => Ordering::Greater,
        (CalendarItem::Activity(x), CalendarItem::Activity(y)) => {
            match (parse_timestamp(&x.start_datetime), parse_timestamp(&y.start_datetime)) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => Ordering::Equal,
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityType, ItemKind, Priority, TaskType};
    use chrono::{Utc, Weekday};
    use uuid::Uuid;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(title: &str, due: &str) -> Task {
        Task {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            title: title.to_string(),
            description: None,
            subject: "Mathematics".to_string(),
            task_type: TaskType::Homework,
            priority: Priority::Medium,
            due_date: due.to_string(),
            estimated_duration: None,
            completed: false,
            completed_at: None,
            color: "#6366f1".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    fn activity(title: &str, start: &str, end: &str) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            title: title.to_string(),
            description: None,
            activity_type: ActivityType::Sports,
            start_datetime: start.to_string(),
            end_datetime: end.to_string(),
            location: None,
            recurrence: None,
            color: "#10b981".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn month_grid_length_is_leading_blanks_plus_days() {
        for year in [2023, 2024, 2025] {
            for month in 1..=12 {
                let reference = ymd(year, month, 15);
                let grid = month_grid(reference);
                let leading = ymd(year, month, 1).weekday().num_days_from_sunday() as usize;
                let cells: Vec<MonthCell> = grid.clone().collect();

                assert_eq!(cells.len(), leading + days_in_month(reference) as usize);
                assert_eq!(grid.len(), cells.len());
                assert!(cells[..leading].iter().all(|c| *c == MonthCell::Blank));

                let days: Vec<u32> =
                    cells.iter().filter_map(|c| c.date()).map(|d| d.day()).collect();
                assert_eq!(days[0], 1);
                assert!(days.windows(2).all(|w| w[1] == w[0] + 1));
            }
        }
    }

    #[test]
    fn month_grid_is_restartable() {
        let grid = month_grid(ymd(2024, 2, 10));
        let first: Vec<MonthCell> = grid.clone().collect();
        let second: Vec<MonthCell> = grid.collect();
        assert_eq!(first, second);
        // February 2024 starts on a Thursday and has 29 days.
        assert_eq!(first.len(), 4 + 29);
    }

    #[test]
    fn week_grid_is_sunday_through_saturday() {
        let mut reference = ymd(2024, 12, 20);
        for _ in 0..40 {
            let week = week_grid(reference);
            assert_eq!(week[0].weekday(), Weekday::Sun);
            assert_eq!(week[6].weekday(), Weekday::Sat);
            assert!(week.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
            assert!(week.contains(&reference));
            reference = reference.succ_opt().unwrap();
        }
    }

    #[test]
    fn navigation_is_pure_and_clamps() {
        let reference = ymd(2024, 3, 31);
        assert_eq!(previous_month(reference), ymd(2024, 2, 29));
        assert_eq!(next_month(reference), ymd(2024, 4, 30));
        assert_eq!(next_week(reference), ymd(2024, 4, 7));
        assert_eq!(previous_week(reference), ymd(2024, 3, 24));
        assert_eq!(reference, ymd(2024, 3, 31));
        assert_eq!(next_month(previous_month(ymd(2024, 1, 15))), ymd(2024, 1, 15));
    }

    #[test]
    fn headers_describe_the_period() {
        assert_eq!(month_title(ymd(2024, 3, 10)), "March 2024");
        assert_eq!(week_range(ymd(2024, 3, 13)), (ymd(2024, 3, 10), ymd(2024, 3, 16)));
    }

    #[test]
    fn activity_lands_in_month_and_week_cells_as_activity() {
        let practice = activity("Practice", "2024-03-10T10:00", "2024-03-10T11:00");
        let activities = vec![practice.clone()];
        let march_10 = ymd(2024, 3, 10);

        let cell = month_grid(march_10).find(|c| c.date() == Some(march_10)).unwrap();
        let items = items_for_date(cell.date().unwrap(), &[], &activities, &Utc);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind(), ItemKind::Activity);
        assert_eq!(items[0].id(), practice.id);

        let week = week_grid(march_10);
        assert_eq!(week[0], march_10);
        let per_day: Vec<usize> = week
            .iter()
            .map(|d| items_for_date(*d, &[], &activities, &Utc).len())
            .collect();
        assert_eq!(per_day, vec![1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn items_for_date_is_idempotent_and_skips_malformed() {
        let tasks = vec![task("Essay", "2024-03-05T09:00:00"), task("Broken", "not a date")];
        let activities = vec![activity("Club", "2024-03-05T15:00:00Z", "2024-03-05T16:00:00Z")];
        let day = ymd(2024, 3, 5);

        let first = items_for_date(day, &tasks, &activities, &Utc);
        let second = items_for_date(day, &tasks, &activities, &Utc);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].kind(), ItemKind::Task);
        assert_eq!(first[1].kind(), ItemKind::Activity);
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn day_items_order_activities_by_start() {
        let late = activity("Late", "2024-03-05T18:00:00Z", "2024-03-05T19:00:00Z");
        let early = activity("Early", "2024-03-05T07:00:00Z", "2024-03-05T08:00:00Z");
        let mut items = vec![
            CalendarItem::Task(task("First", "2024-03-05T09:00:00")),
            CalendarItem::Task(task("Second", "2024-03-05T08:00:00")),
            CalendarItem::Activity(late),
            CalendarItem::Activity(early),
        ];
        sort_day_items(&mut items);
        let titles: Vec<&str> = items.iter().map(|i| i.title()).collect();
        assert_eq!(titles, vec!["First", "Second", "Early", "Late"]);
    }
}
