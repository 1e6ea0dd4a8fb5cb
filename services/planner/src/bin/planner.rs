//! services/planner/src/bin/planner.rs

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use planner_lib::{
    adapters::{FileSessionStore, HttpRemoteStore},
    app::{AppState, NotificationKind, Planner},
    config::Config,
    error::ClientError,
};
use std::sync::Arc;
use studytime_core::calendar::MonthCell;
use studytime_core::domain::{
    ActivityType, CalendarItem, NewActivity, NewTask, Priority, TaskType, User,
};
use studytime_core::filters::{is_overdue, ActivityFilter, TaskFilter, TaskSort};
use studytime_core::timestamp::{parse_timestamp, to_wire};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "planner", about = "Student schedule planner: tasks, activities and calendars")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in (any password is accepted) and load the schedule
    Login {
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    Logout,
    /// Stats plus the next tasks and activities
    Dashboard,
    Tasks {
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
        #[arg(long, default_value = "due_date")]
        sort: TaskSort,
    },
    Activities {
        #[arg(long, default_value = "all")]
        filter: ActivityFilter,
    },
    Month {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Week {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Day {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    AddTask {
        #[arg(long)]
        title: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long = "type", default_value = "assignment")]
        task_type: TaskType,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Local due date, YYYY-MM-DD
        #[arg(long)]
        due: NaiveDate,
        /// Local due time, HH:MM
        #[arg(long, default_value = "23:59")]
        time: String,
        #[arg(long)]
        description: Option<String>,
        /// Estimated duration in minutes
        #[arg(long)]
        minutes: Option<u32>,
    },
    AddActivity {
        #[arg(long)]
        title: String,
        #[arg(long = "type", default_value = "sports")]
        activity_type: ActivityType,
        /// Local start, YYYY-MM-DDTHH:MM
        #[arg(long)]
        start: String,
        /// Local end, YYYY-MM-DDTHH:MM
        #[arg(long)]
        end: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Mark a task completed (or reopen it with --reopen)
    Toggle {
        id: Uuid,
        #[arg(long)]
        reopen: bool,
    },
    DeleteTask {
        id: Uuid,
    },
    DeleteActivity {
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Remote store at {}", config.api_base_url);

    // --- 2. Initialize Adapters & Restore the Session ---
    let remote = Arc::new(HttpRemoteStore::new(config.api_base_url.clone(), config.http_timeout)?);
    let sessions = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let mut planner = Planner::start(AppState {
        remote,
        sessions,
        notification_ttl: config.notification_ttl,
    })
    .await;

    let today = Local::now().date_naive();
    let now = Utc::now();

    // --- 3. Run the Command ---
    match cli.command {
        Command::Login { email, password } => {
            if planner.user().is_some() {
                planner.logout();
            }
            let user = planner.login(&email, &password).await?;
            println!("Logged in as {} <{}> (year {})", user.name, user.email, user.year_level);
            if let Some(e) = planner.cache().last_error() {
                println!("Could not load your schedule: {}", e);
            }
        }
        Command::Logout => {
            planner.logout();
            println!("Logged out.");
        }
        Command::Dashboard => {
            require_user(&planner)?;
            let dashboard = planner.dashboard(now);
            let s = dashboard.stats;
            println!(
                "Tasks: {} total, {} completed, {} pending, {} overdue",
                s.total_tasks, s.completed_tasks, s.pending_tasks, s.overdue_tasks
            );
            println!("\nUpcoming tasks:");
            for task in &dashboard.upcoming_tasks {
                println!("  {} [{}] due {}", task.title, task.subject, local_time(&task.due_date));
            }
            println!("\nUpcoming activities:");
            for activity in &dashboard.upcoming_activities {
                println!(
                    "  {} ({}) {}",
                    activity.title,
                    activity.activity_type,
                    local_time(&activity.start_datetime)
                );
            }
        }
        Command::Tasks { filter, sort } => {
            require_user(&planner)?;
            for task in planner.tasks(filter, sort, now) {
                let mark = if task.completed { "x" } else { " " };
                let overdue = if is_overdue(&task, now) { " OVERDUE" } else { "" };
                println!(
                    "[{}] {} {} ({}, {}, {}) due {}{}",
                    mark,
                    task.id,
                    task.title,
                    task.subject,
                    task.task_type,
                    task.priority,
                    local_time(&task.due_date),
                    overdue
                );
            }
        }
        Command::Activities { filter } => {
            require_user(&planner)?;
            for activity in planner.activities(filter, now) {
                println!(
                    "{} {} ({}) {} - {}{}",
                    activity.id,
                    activity.title,
                    activity.activity_type,
                    local_time(&activity.start_datetime),
                    local_time(&activity.end_datetime),
                    activity.location.as_deref().map(|l| format!(" @ {l}")).unwrap_or_default()
                );
            }
        }
        Command::Month { date } => {
            require_user(&planner)?;
            let view = planner.month(date.unwrap_or(today));
            println!("{}", view.title);
            println!("Sun Mon Tue Wed Thu Fri Sat");
            let mut line = String::new();
            for (i, (cell, items)) in view.cells.iter().enumerate() {
                let text = match cell {
                    MonthCell::Blank => "    ".to_string(),
                    MonthCell::Day(d) => {
                        let marker = if cell.is_today(today) {
                            '*'
                        } else if items.is_empty() {
                            ' '
                        } else {
                            '+'
                        };
                        format!("{:>3}{}", chrono::Datelike::day(d), marker)
                    }
                };
                line.push_str(&text);
                if i % 7 == 6 {
                    println!("{}", line.trim_end());
                    line.clear();
                }
            }
            if !line.is_empty() {
                println!("{}", line.trim_end());
            }
        }
        Command::Week { date } => {
            require_user(&planner)?;
            let view = planner.week(date.unwrap_or(today));
            println!("Week of {} - {}", view.start.format("%b %-d"), view.end.format("%b %-d, %Y"));
            for (day, items) in &view.days {
                println!("{}", day.format("%A %-d"));
                print_items(items);
            }
        }
        Command::Day { date } => {
            require_user(&planner)?;
            let date = date.unwrap_or(today);
            println!("{}", date.format("%A, %B %-d %Y"));
            print_items(&planner.day(date));
        }
        Command::AddTask {
            title,
            subject,
            task_type,
            priority,
            due,
            time,
            description,
            minutes,
        } => {
            let subject = resolve_subject(require_user(&planner)?, subject)?;
            let time = parse_time(&time)?;
            let due = local_to_wire(due.and_time(time))?;
            let mut data = NewTask::new(title, subject, task_type, due).with_priority(priority);
            data.description = description;
            data.estimated_duration = minutes;

            planner.open_task_form();
            planner.create_task(data).await?;
        }
        Command::AddActivity { title, activity_type, start, end, location, description } => {
            require_user(&planner)?;
            let (start, end) = (parse_local(&start)?, parse_local(&end)?);
            let mut data = NewActivity::new(title, activity_type, start, end);
            data.location = location;
            data.description = description;

            planner.open_activity_form();
            planner.create_activity(data).await?;
        }
        Command::Toggle { id, reopen } => {
            require_user(&planner)?;
            planner.toggle_task_completion(id, !reopen).await?;
        }
        Command::DeleteTask { id } => {
            require_user(&planner)?;
            planner.delete_task(id).await?;
        }
        Command::DeleteActivity { id } => {
            require_user(&planner)?;
            planner.delete_activity(id).await?;
        }
    }

    // --- 4. Show Pending Notifications ---
    for notification in planner.notifications().active() {
        let prefix = match notification.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Failure => "error",
            NotificationKind::Info => "info",
        };
        println!("[{}] {}", prefix, notification.message);
    }

    Ok(())
}

fn require_user(planner: &Planner) -> Result<&User, ClientError> {
    planner.user().ok_or(ClientError::NotAuthenticated)
}

fn resolve_subject(user: &User, subject: Option<String>) -> Result<String, ClientError> {
    match subject {
        Some(s) if user.subjects.contains(&s) => Ok(s),
        Some(s) => Err(ClientError::InvalidInput(format!(
            "'{}' is not one of your subjects: {}",
            s,
            user.subjects.join(", ")
        ))),
        None => Ok(user.subjects.first().cloned().unwrap_or_default()),
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime, ClientError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|e| ClientError::InvalidInput(format!("invalid --time '{}': {}", raw, e)))
}

fn print_items(items: &[CalendarItem]) {
    if items.is_empty() {
        println!("  -");
    }
    for item in items {
        match item {
            CalendarItem::Task(task) => {
                println!("  task: {} ({})", task.title, local_time(&task.due_date))
            }
            CalendarItem::Activity(a) => {
                let (start, end) = (local_time(&a.start_datetime), local_time(&a.end_datetime));
                println!("  activity: {} ({} - {})", a.title, start, end)
            }
        }
    }
}

fn local_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn parse_local(raw: &str) -> Result<String, ClientError> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .map_err(|e| {
        ClientError::InvalidInput(format!("invalid date-time '{}': {}", raw, e))
    })?;
    local_to_wire(naive)
}

fn local_to_wire(naive: NaiveDateTime) -> Result<String, ClientError> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| to_wire(local.with_timezone(&Utc)))
        .ok_or_else(|| {
            ClientError::InvalidInput(format!("{} does not exist in the local time zone", naive))
        })
}
