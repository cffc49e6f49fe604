use axum::{extract::State, Json};

use crate::error::Result;
use crate::logic::{self, StatsSnapshot};
use crate::state::AppState;

// -----------------------------
// GET /api/stats
// Recomputed from the stored schedule on every call
// -----------------------------
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsSnapshot>> {
    let db = state.store.load()?;
    let stats = logic::compute_stats(&db.tasks);

    tracing::debug!(
        total = stats.total,
        done = stats.done_count,
        streak = stats.streak_days,
        upcoming = stats.upcoming.len(),
        "stats computed"
    );
    Ok(Json(stats))
}
