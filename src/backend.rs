/*
Client for the external notes backend.
Produces transcripts, summaries, questions and flashcards for a video id;
this crate only forwards requests and normalizes the answers.
*/

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, Result};
use crate::notes::{normalize_flashcards, normalize_mcqs, Flashcard, Mcq, StudyNotes};

pub const NO_ANSWER: &str = "No answer returned.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptResponse {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub video_duration: f64,
    #[serde(default)]
    pub chunks_created: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StudyMaterial {
    pub video_duration: Option<f64>,
    pub mcqs: Vec<Mcq>,
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

// Map a backend reply to either its JSON body or an error.
//
// - 401 -> Unauthorized
// - 429, or a body tagged "rate_limit_exceeded" -> RateLimited
// - any other non-2xx -> Backend with the body's message
pub fn check_response(status: u16, body: &str) -> Result<Value> {
    let payload: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let tagged_rate_limit = payload.get("error").and_then(Value::as_str) == Some("rate_limit_exceeded");

    if status == 401 {
        return Err(AppError::Unauthorized);
    }
    if status == 429 || tagged_rate_limit {
        return Err(AppError::RateLimited);
    }
    if !(200..300).contains(&status) {
        let message = ["message", "error"]
            .iter()
            .find_map(|k| payload.get(*k).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| body.trim().to_string());
        return Err(AppError::Backend { status, message });
    }
    if payload.is_null() {
        return Err(AppError::Backend {
            status,
            message: "response was not JSON".to_string(),
        });
    }
    Ok(payload)
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    async fn post_json(&self, path: &str, body: &Value, token: Option<&str>) -> Result<Value> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(path, "calling notes backend");
        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let result = check_response(status, &text);
        if let Err(e) = &result {
            tracing::warn!(path, status, error = %e, "notes backend call failed");
        }
        result
    }

    pub async fn transcript(&self, video_id: &str, token: &str) -> Result<TranscriptResponse> {
        let payload = self
            .post_json("transcript", &json!({ "video_id": video_id }), Some(token))
            .await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Fetch questions and flashcards, normalized.
    pub async fn study_material(&self, video_id: &str, token: &str) -> Result<StudyMaterial> {
        let payload = self
            .post_json("mcq-flashcards", &json!({ "video_id": video_id }), Some(token))
            .await?;

        Ok(StudyMaterial {
            video_duration: payload.get("video_duration").and_then(Value::as_f64),
            mcqs: normalize_mcqs(payload.get("mcqs").unwrap_or(&Value::Null)),
            flashcards: normalize_flashcards(payload.get("flashcards").unwrap_or(&Value::Null)),
        })
    }

    /// Transcript, summary, questions and flashcards for one video.
    /// The two backend calls run concurrently.
    pub async fn fetch_notes(&self, video_id: &str, token: &str) -> Result<StudyNotes> {
        let (transcript, material) = tokio::try_join!(
            self.transcript(video_id, token),
            self.study_material(video_id, token)
        )?;

        let notes = StudyNotes {
            video_id: video_id.to_string(),
            summary: transcript.summary,
            transcript: transcript.transcript,
            video_duration: material.video_duration.unwrap_or(transcript.video_duration),
            mcqs: material.mcqs,
            flashcards: material.flashcards,
        };

        tracing::info!(
            video_id,
            chunks = transcript.chunks_created,
            mcqs = notes.mcqs.len(),
            flashcards = notes.flashcards.len(),
            "study notes ready"
        );
        Ok(notes)
    }

    /// Ask a free-form question about a transcript.
    pub async fn ask(&self, transcript: &str, query: &str) -> Result<String> {
        let payload = self
            .post_json("rag", &json!({ "transcript": transcript, "query": query }), None)
            .await?;

        Ok(payload
            .get("answer")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(NO_ANSWER)
            .to_string())
    }
}
