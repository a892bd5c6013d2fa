//! Maintenance scheduler: month calendar and task list.

use anyhow::{bail, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const CALENDAR_CELLS: usize = 42;
pub const WEEKDAY_HEADERS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const TITLE_LIMIT: usize = 16;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Scheduled => "Scheduled",
            TaskStatus::InProgress => "In Progress",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub due: NaiveDate,
    pub status: TaskStatus,
    pub detail: String,
}

fn task(id: &str, title: &str, (y, m, d): (i32, u32, u32), status: TaskStatus) -> Option<Task> {
    Some(Task {
        id: id.to_string(),
        title: title.to_string(),
        due: NaiveDate::from_ymd_opt(y, m, d)?,
        status,
        detail: "Stabilization work required on the northern slope following recent seismic activity."
            .to_string(),
    })
}

/// Starting task list.
pub fn seed_tasks() -> Vec<Task> {
    [
        task("1", "Slope stabilization in Sector 4", (2024, 8, 15), TaskStatus::InProgress),
        task("2", "Equipment safety checks", (2024, 8, 20), TaskStatus::Scheduled),
        task("3", "Update emergency response plan", (2024, 8, 25), TaskStatus::Pending),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn tasks_on(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| t.due == date).collect()
}

/// Short title for a calendar cell.
pub fn calendar_title(title: &str) -> String {
    if title.chars().count() > TITLE_LIMIT {
        let head: String = title.chars().take(TITLE_LIMIT).collect();
        format!("{}…", head)
    } else {
        title.to_string()
    }
}

/// Displayed month; `month` is 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            bail!("invalid month {}-{}", year, month);
        }
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }

    fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_month: bool,
}

/// Six Monday-first weeks covering the cursor's month.
pub fn build_calendar(cursor: MonthCursor) -> Vec<CalendarCell> {
    let Some(first) = cursor.first_day() else {
        return Vec::new();
    };
    let lead = first.weekday().num_days_from_monday() as i64;
    let start = first - Duration::days(lead);
    (0..CALENDAR_CELLS as i64)
        .map(|i| {
            let date = start + Duration::days(i);
            CalendarCell {
                date,
                in_month: date.month() == cursor.month && date.year() == cursor.year,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_calendar_shape() {
        for (y, m, days) in [(2024, 8, 31), (2024, 2, 29), (2025, 9, 30), (2026, 10, 31)] {
            let cells = build_calendar(MonthCursor::new(y, m).unwrap());
            assert_eq!(cells.len(), CALENDAR_CELLS);
            assert_eq!(cells[0].date.weekday(), Weekday::Mon);
            let in_month = cells.iter().filter(|c| c.in_month).count();
            assert_eq!(in_month, days, "{}-{}", y, m);
        }
    }

    #[test]
    fn test_august_2024_starts_on_july_29() {
        let cells = build_calendar(MonthCursor::new(2024, 8).unwrap());
        assert_eq!(cells[0].date, d(2024, 7, 29));
        assert!(!cells[0].in_month);
        assert_eq!(cells[3].date, d(2024, 8, 1));
        assert!(cells[3].in_month);
    }

    #[test]
    fn test_month_starting_monday_has_no_lead() {
        // 2024-07-01 is a Monday
        let cells = build_calendar(MonthCursor::new(2024, 7).unwrap());
        assert_eq!(cells[0].date, d(2024, 7, 1));
    }

    #[test]
    fn test_cursor_wraps_years() {
        let jan = MonthCursor::new(2025, 1).unwrap();
        assert_eq!(jan.prev(), MonthCursor::new(2024, 12).unwrap());
        assert_eq!(jan.prev().next(), jan);
        let dec = MonthCursor::new(2025, 12).unwrap();
        assert_eq!(dec.next(), MonthCursor::new(2026, 1).unwrap());
        assert_eq!(dec.title(), "December 2025");
    }

    #[test]
    fn test_cursor_rejects_bad_month() {
        assert!(MonthCursor::new(2025, 0).is_err());
        assert!(MonthCursor::new(2025, 13).is_err());
    }

    #[test]
    fn test_tasks_on_due_dates() {
        let tasks = seed_tasks();
        assert_eq!(tasks.len(), 3);
        let due = tasks_on(&tasks, d(2024, 8, 20));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].status, TaskStatus::Scheduled);
        assert!(tasks_on(&tasks, d(2024, 8, 21)).is_empty());
    }

    #[test]
    fn test_calendar_title_truncation() {
        assert_eq!(calendar_title("Equipment safety checks"), "Equipment safety…");
        assert_eq!(calendar_title("Short task"), "Short task");
        assert_eq!(calendar_title("exactly sixteen!"), "exactly sixteen!");
    }
}
