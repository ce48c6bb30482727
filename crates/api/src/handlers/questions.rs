//! Handlers for the question catalog.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /questions
///
/// List every stored question name, sorted.
pub async fn list_questions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let questions = state.store.list_questions().await?;
    Ok(Json(DataResponse { data: questions }))
}
