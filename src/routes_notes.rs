// --------------------------------------------------
// Handles API endpoints that talk to the notes backend.
//
// Responsibilities:
// - Turn a pasted video link into study notes
// - Export notes as Markdown
// - Forward questions about a transcript
// -------------------------------------------------

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::dates::now_fixed_offset;
use crate::error::{AppError, Result};
use crate::notes::StudyNotes;
use crate::schedule;
use crate::state::AppState;
use crate::video::extract_video_id;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct NotesInput {
    pub video_url: String,
    #[serde(default = "default_true")]
    pub schedule_reviews: bool,
}

// -----------------------------
// POST /api/notes
// Requires a signed-in session; optionally schedules reviews
// -----------------------------
pub async fn create_notes(
    State(state): State<AppState>,
    Json(input): Json<NotesInput>,
) -> Result<Json<StudyNotes>> {
    let token = state.session.access_token().ok_or(AppError::Unauthorized)?;
    let video_id = extract_video_id(&input.video_url)
        .ok_or_else(|| AppError::InvalidVideoUrl(input.video_url.clone()))?;

    tracing::info!(%video_id, "generating study notes");
    let notes = match state.backend.fetch_notes(&video_id, &token).await {
        Ok(notes) => notes,
        Err(AppError::Unauthorized) => {
            // token rejected upstream; the UI has to sign in again
            state.session.sign_out();
            return Err(AppError::Unauthorized);
        }
        Err(e) => return Err(e),
    };

    if input.schedule_reviews {
        let plan = schedule::review_plan(&format!("Video {video_id}"), now_fixed_offset());
        state
            .modify_db(move |db| {
                db.tasks.extend(plan);
                Ok(())
            })
            .await?;
    }

    Ok(Json(notes))
}

// -----------------------------
// POST /api/notes/markdown
// -----------------------------
pub async fn export_markdown(Json(notes): Json<StudyNotes>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        notes.to_markdown(),
    )
}

#[derive(Debug, Deserialize)]
pub struct AskInput {
    #[serde(default)]
    pub transcript: String,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

// -----------------------------
// POST /api/rag
// -----------------------------
pub async fn ask(
    State(state): State<AppState>,
    Json(input): Json<AskInput>,
) -> Result<Json<AskResponse>> {
    let query = input.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query required".to_string()));
    }

    let answer = state.backend.ask(&input.transcript, query).await?;
    Ok(Json(AskResponse { answer }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reviews_are_scheduled_unless_disabled() {
        let input: NotesInput = serde_json::from_str(r#"{"video_url": "https://youtu.be/dQw4w9WgXcQ"}"#).unwrap();
        assert!(input.schedule_reviews);

        let input: NotesInput =
            serde_json::from_str(r#"{"video_url": "x", "schedule_reviews": false}"#).unwrap();
        assert!(!input.schedule_reviews);
    }
}
