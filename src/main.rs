// Define data modules
mod models; // Data structures (Task, TaskStatus, Db)
mod dates;  // Date interpretation and normalization
mod logic;  // Schedule statistics engine
mod schedule; // Spaced-repetition review plan
mod notes;  // Canonical MCQ / flashcard shapes, Markdown export
mod video;  // Video id extraction
mod session; // Signed-in user holder
mod backend; // Notes backend client
mod store;  // Persistent storage (load/save db.json)
mod state;  // Shared handler state
mod config; // Environment configuration
mod logging; // tracing setup
mod error;  // Error type + HTTP mapping
mod routes_tasks;   // HTTP handlers for the study schedule
mod routes_stats;   // HTTP handler for schedule statistics
mod routes_notes;   // HTTP handlers for notes generation / export / questions
mod routes_session; // HTTP handlers for sign-in state

// Import axum routing utilities and Router
use axum::{
    routing::{delete, get, post, put}, // HTTP method helpers
    Router, // Main router type
};
use std::path::Path;
use tower_http::services::ServeDir; // Used to serve static files (HTML/CSS/JS)
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::state::AppState;

fn build_router(state: AppState, static_dir: &Path) -> Router {
    let api = Router::new()
        // stats
        .route("/stats", get(routes_stats::get_stats))
        // tasks
        .route("/tasks", get(routes_tasks::get_tasks).post(routes_tasks::create_task))
        .route("/tasks/:id", delete(routes_tasks::delete_task))
        .route("/tasks/:id/status", put(routes_tasks::update_status))
        .route("/tasks/:id/toggle", post(routes_tasks::toggle_task))
        .route("/schedule/reviews", post(routes_tasks::append_reviews))
        // session
        .route(
            "/session",
            get(routes_session::get_session)
                .post(routes_session::create_session)
                .delete(routes_session::delete_session),
        )
        // notes
        .route("/notes", post(routes_notes::create_notes))
        .route("/notes/markdown", post(routes_notes::export_markdown))
        .route("/rag", post(routes_notes::ask))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let config = AppConfig::from_env();
    logging::init(&config.log_level);

    let state = AppState::new(&config)?;

    tracing::info!(
        addr = %config.addr,
        data = %state.store.path().display(),
        static_dir = %config.static_dir.display(),
        backend = %config.backend_url,
        "server starting"
    );
    let app = build_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("Server running at http://{}", config.addr);
    tracing::info!("API base:     http://{}/api", config.addr);

    axum::serve(listener, app).await?;
    Ok(())
}
