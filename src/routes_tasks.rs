// --------------------------------------------------
// Handles API endpoints related to the study schedule.
//
// Responsibilities:
// - Create / read / delete tasks
// - Replace or toggle a task's status
// - Append the spaced-repetition reviews for a topic
// -------------------------------------------------

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::dates::{normalize_task_date, now_fixed_offset};
use crate::error::{AppError, Result};
use crate::logic;
use crate::models::{Task, TaskStatus};
use crate::schedule;
use crate::state::AppState;

const NO_DATE: &str = "No Date";

fn no_date() -> String {
    NO_DATE.to_string()
}

// Index of the task with `id`, for replace-at-index updates
fn position_of(tasks: &[Task], id: &str) -> Result<usize> {
    let uuid = Uuid::parse_str(id).map_err(|_| AppError::Validation("invalid id".to_string()))?;
    tasks
        .iter()
        .position(|t| t.id == uuid)
        .ok_or_else(|| AppError::TaskNotFound(id.to_string()))
}

// -----------------------------
// GET /api/tasks
// Returns all tasks in insertion order
// -----------------------------
pub async fn get_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>> {
    let db = state.store.load()?;
    Ok(Json(db.tasks))
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    #[serde(default = "no_date")]
    pub date: String, // ISO, "today", "tomorrow", or free text
    pub status: Option<TaskStatus>,
}

// -----------------------------
// POST /api/tasks
// Normalizes the date once and appends the task
// -----------------------------
pub async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<CreateTaskInput>,
) -> Result<Json<Task>> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title required".to_string()));
    }

    let date = if input.date.trim().is_empty() {
        no_date()
    } else {
        normalize_task_date(&input.date, now_fixed_offset())
    };
    let task = Task::new(title, date, input.status.unwrap_or(TaskStatus::Scheduled));

    let created = task.clone();
    state
        .modify_db(move |db| {
            db.tasks.push(task);
            Ok(())
        })
        .await?;

    tracing::info!(id = %created.id, title = %created.title, date = %created.date, "task created");
    Ok(Json(created))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: TaskStatus,
}

fn set_status(db_tasks: &mut Vec<Task>, id: &str, status: TaskStatus) -> Result<Task> {
    let index = position_of(db_tasks, id)?;
    let next = logic::replace_status_at(db_tasks, index, status)
        .ok_or_else(|| AppError::TaskNotFound(id.to_string()))?;
    *db_tasks = next;
    Ok(db_tasks[index].clone())
}

// -----------------------------
// PUT /api/tasks/:id/status
// Replaces the status of one task
// -----------------------------
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateStatusInput>,
) -> Result<Json<Task>> {
    let updated = state
        .modify_db(|db| set_status(&mut db.tasks, &id, input.status))
        .await?;

    tracing::info!(id = %updated.id, status = updated.status.as_str(), "task status replaced");
    Ok(Json(updated))
}

// -----------------------------
// POST /api/tasks/:id/toggle
// Toggles task status between Done and Scheduled
// -----------------------------
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>> {
    let updated = state
        .modify_db(|db| {
            let index = position_of(&db.tasks, &id)?;
            let next = if db.tasks[index].status.is_done() {
                TaskStatus::Scheduled
            } else {
                TaskStatus::Done
            };
            set_status(&mut db.tasks, &id, next)
        })
        .await?;

    Ok(Json(updated))
}

// -----------------------------
// DELETE /api/tasks/:id
// Removes a task permanently
// -----------------------------
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state
        .modify_db(|db| {
            let index = position_of(&db.tasks, &id)?;
            db.tasks.remove(index);
            Ok(())
        })
        .await?;

    tracing::info!(%id, "task deleted");
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct ReviewInput {
    pub topic: String,
}

// -----------------------------
// POST /api/schedule/reviews
// Appends today / +3 days / +1 week reviews for a topic
// -----------------------------
pub async fn append_reviews(
    State(state): State<AppState>,
    Json(input): Json<ReviewInput>,
) -> Result<Json<Vec<Task>>> {
    let plan = schedule::review_plan(&input.topic, now_fixed_offset());

    let created = plan.clone();
    state
        .modify_db(move |db| {
            db.tasks.extend(plan);
            Ok(())
        })
        .await?;

    tracing::info!(topic = %input.topic, count = created.len(), "review plan appended");
    Ok(Json(created))
}
