/*
Schedule statistics.
Module was independently written from HTTP / Axum for testing
*/

use std::collections::HashSet;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::dates::{now_fixed_offset, parse_task_date};
use crate::models::{Task, TaskStatus};

// Forward range of the upcoming list, in whole days
pub const UPCOMING_WINDOW_DAYS: i64 = 7;
// Length of the completion histogram (today included)
pub const HISTORY_DAYS: i64 = 7;

// Completed-task count for a single calendar day
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DayCount {
    pub date: NaiveDate,
    pub label: String, // "Mon", "Tue", ...
    pub count: usize,
}

// Derived, read-only view of a task list at one instant
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsSnapshot {
    pub total: usize,
    pub done_count: usize,
    pub completion_percentage: f64,
    pub upcoming: Vec<Task>,
    pub streak_days: usize,
    pub done_per_day: Vec<DayCount>,
}

/// Compute statistics against the current wall clock.
pub fn compute_stats(tasks: &[Task]) -> StatsSnapshot {
    compute_stats_at(tasks, now_fixed_offset())
}

/// Compute statistics for `tasks` as seen at `now`.
///
/// Tasks whose date cannot be interpreted still count toward `total` and
/// `done_count` but are left out of every date-based figure.
pub fn compute_stats_at(tasks: &[Task], now: DateTime<FixedOffset>) -> StatsSnapshot {
    let total = tasks.len();
    let done_count = tasks.iter().filter(|t| t.status.is_done()).count();
    let completion_percentage = if total == 0 {
        0.0
    } else {
        done_count as f64 / total as f64 * 100.0
    };

    StatsSnapshot {
        total,
        done_count,
        completion_percentage,
        upcoming: upcoming_tasks(tasks, now),
        streak_days: streak_days(tasks, now),
        done_per_day: done_per_day(tasks, now),
    }
}

// Select tasks due within the upcoming window.
//
// Rules:
// - Date must parse
// - Whole-day difference from now (truncated) must be in 0..=7
// - Sorted by date ascending, insertion order on ties
pub fn upcoming_tasks(tasks: &[Task], now: DateTime<FixedOffset>) -> Vec<Task> {
    let mut dated: Vec<(DateTime<FixedOffset>, &Task)> = tasks
        .iter()
        .filter_map(|t| parse_task_date(&t.date, now).map(|dt| (dt, t)))
        .filter(|(dt, _)| (0..=UPCOMING_WINDOW_DAYS).contains(&(*dt - now).num_days()))
        .collect();

    dated.sort_by_key(|(dt, _)| *dt);
    dated.into_iter().map(|(_, t)| t.clone()).collect()
}

fn done_day(task: &Task, now: DateTime<FixedOffset>) -> Option<NaiveDate> {
    if !task.status.is_done() {
        return None;
    }
    parse_task_date(&task.date, now).map(|dt| dt.date_naive())
}

// Count consecutive days, ending today, with at least one completed task.
pub fn streak_days(tasks: &[Task], now: DateTime<FixedOffset>) -> usize {
    let days: HashSet<NaiveDate> = tasks.iter().filter_map(|t| done_day(t, now)).collect();

    let mut cursor = now.date_naive();
    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

// Completed tasks per day for the last 7 days, oldest first.
pub fn done_per_day(tasks: &[Task], now: DateTime<FixedOffset>) -> Vec<DayCount> {
    let today = now.date_naive();

    (0..HISTORY_DAYS)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let count = tasks
                .iter()
                .filter(|t| done_day(t, now) == Some(date))
                .count();
            DayCount {
                date,
                label: date.format("%a").to_string(),
                count,
            }
        })
        .collect()
}

/// Produce a new task list with the status at `index` replaced.
///
/// Returns `None` when `index` is out of range. The input is left as is.
pub fn replace_status_at(tasks: &[Task], index: usize, status: TaskStatus) -> Option<Vec<Task>> {
    if index >= tasks.len() {
        return None;
    }
    let mut next = tasks.to_vec();
    next[index].status = status;
    Some(next)
}
