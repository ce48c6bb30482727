pub mod health;
pub mod questions;
pub mod sessions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /questions                                   list catalog (GET)
///
/// /sessions                                    start session (POST)
/// /sessions/{id}                               snapshot (GET), discard (DELETE)
/// /sessions/{id}/image                         profile image bytes (GET)
/// /sessions/{id}/filter                        set question filter (PUT)
/// /sessions/{id}/attributes                    visible attributes (GET), new question (POST)
/// /sessions/{id}/attributes/{name}             set answers (PUT)
/// /sessions/{id}/submit                        expand and persist (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/questions", questions::router())
        .nest("/sessions", sessions::router())
}
