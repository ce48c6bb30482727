//! Route definitions for labeling sessions.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Session routes, nested under `/sessions`.
///
/// ```text
/// POST   /                                     start_session
/// GET    /{id}                                 get_session
/// DELETE /{id}                                 discard_session
/// GET    /{id}/image                           get_image
/// PUT    /{id}/filter                          apply_filter
/// GET    /{id}/attributes                      list_attributes
/// POST   /{id}/attributes                      add_question
/// PUT    /{id}/attributes/{name}               set_answers
/// POST   /{id}/submit                          submit_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sessions::start_session))
        .route(
            "/{id}",
            get(sessions::get_session).delete(sessions::discard_session),
        )
        .route("/{id}/image", get(sessions::get_image))
        .route("/{id}/filter", put(sessions::apply_filter))
        .route(
            "/{id}/attributes",
            get(sessions::list_attributes).post(sessions::add_question),
        )
        .route("/{id}/attributes/{name}", put(sessions::set_answers))
        .route("/{id}/submit", post(sessions::submit_session))
}
