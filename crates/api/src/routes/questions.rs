use axum::routing::get;
use axum::Router;

use crate::handlers::questions;
use crate::state::AppState;

/// Question catalog routes, nested under `/questions`.
///
/// ```text
/// GET    /                                     list_questions
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(questions::list_questions))
}
