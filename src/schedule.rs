// Spaced-repetition review plan created for each processed video.

use chrono::{DateTime, Duration, FixedOffset};

use crate::dates::to_iso;
use crate::models::{Task, TaskStatus};

// (days after first study, review label)
pub const REVIEW_STEPS: &[(i64, &str)] = &[
    (0, "Initial Review"),
    (3, "First Review"),
    (7, "Second Review"),
];

/// Build the review tasks for `topic`, starting at `now`.
pub fn review_plan(topic: &str, now: DateTime<FixedOffset>) -> Vec<Task> {
    let topic = topic.trim();

    REVIEW_STEPS
        .iter()
        .map(|(offset, label)| {
            let title = if topic.is_empty() {
                label.to_string()
            } else {
                format!("{topic} - {label}")
            };
            Task::new(title, to_iso(now + Duration::days(*offset)), TaskStatus::Scheduled)
        })
        .collect()
}
