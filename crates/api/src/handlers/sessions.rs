//! Handlers for labeling sessions.
//!
//! A session is started on a random profile or on the lowest-numbered
//! profile nobody has described yet. The annotator answers attributes,
//! optionally adds new questions, and submits; submission expands ambiguous
//! answers into one record per combination and writes them to the
//! `knowledge` collection.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use describer_core::answer::{Answer, AnswerSet};
use describer_core::attribute::{ensure_not_target_field, validate_question_name, Attribute};
use describer_core::collection::Collection;
use describer_core::error::CoreError;
use describer_core::profile::{next_undescribed_profile, parse_profile_number, ProfileRef};
use describer_core::session::LabelingSession;
use describer_core::types::ProfileNumber;
use describer_storage::ProfileImage;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::sessions::{ActiveSession, Timestamp};
use crate::state::AppState;

/* --------------------------------------------------------------------------
   Request / response types
   -------------------------------------------------------------------------- */

/// How the profile for a new session is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileMode {
    /// Any profile, uniformly at random.
    #[default]
    Random,
    /// Lowest-numbered profile without records yet.
    Next,
}

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub mode: ProfileMode,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SetAnswersRequest {
    pub answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewQuestionRequest {
    pub name: String,
}

/// Full view of a session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub profile: ProfileRef,
    pub started_at: Timestamp,
    pub attributes: Vec<Attribute>,
}

impl SessionView {
    fn new(session_id: Uuid, active: &ActiveSession) -> Self {
        Self {
            session_id,
            profile: active.session.profile().clone(),
            started_at: active.started_at,
            attributes: active.session.attributes().cloned().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilterResult {
    pub changed: bool,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResult {
    pub profile: ProfileRef,
    pub records_inserted: usize,
    pub conflicting_attributes: Vec<String>,
}

/* --------------------------------------------------------------------------
   Helpers
   -------------------------------------------------------------------------- */

fn session_not_found(id: Uuid) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Session",
        id: id.to_string(),
    })
}

/// Profile numbers that already have records in the knowledge collection.
async fn described_profiles(state: &AppState) -> AppResult<HashSet<ProfileNumber>> {
    let target_field = state.store.target_field().await?;
    let values = state
        .store
        .distinct_values(Collection::Knowledge, &target_field)
        .await?;

    let described = values
        .iter()
        .filter_map(|raw| match parse_profile_number(raw) {
            Ok(number) => Some(number),
            Err(_) => {
                tracing::warn!(value = %raw, "Skipping knowledge record with non-numeric profile id");
                None
            }
        })
        .collect();
    Ok(described)
}

/// Pick the lowest-numbered stored profile nobody has described, falling
/// back to a random one when every stored profile is described.
async fn fetch_next_profile(state: &AppState) -> AppResult<ProfileImage> {
    let described = described_profiles(state).await?;
    let stored = state.storage.list_profiles().await?;
    let available = stored
        .iter()
        .filter_map(|name| parse_profile_number(name).ok());

    match next_undescribed_profile(available, &described, state.config.profiles_total) {
        Some(number) => match state.storage.fetch_by_id(number).await? {
            Some(image) => return Ok(image),
            None => tracing::warn!(
                profile_number = number,
                "Profile disappeared from storage, falling back to random"
            ),
        },
        None => tracing::info!(
            described = described.len(),
            "Every stored profile is described, falling back to random"
        ),
    }

    Ok(state.storage.fetch_random().await?)
}

/* --------------------------------------------------------------------------
   Handlers
   -------------------------------------------------------------------------- */

/// POST /sessions
///
/// Start a session on a new profile with every stored question unanswered.
/// The optional body selects the profile: `{"mode": "random"}` (default) or
/// `{"mode": "next"}`.
pub async fn start_session(
    State(state): State<AppState>,
    input: Option<Json<StartSessionRequest>>,
) -> AppResult<impl IntoResponse> {
    let mode = input.map(|Json(req)| req.mode).unwrap_or_default();

    let image = match mode {
        ProfileMode::Random => state.storage.fetch_random().await?,
        ProfileMode::Next => fetch_next_profile(&state).await?,
    };
    let questions = state.store.list_questions().await?;

    let session = LabelingSession::new(ProfileRef::from_file_name(&image.file_name), questions);
    let active = ActiveSession::new(session, image);
    let view_source = active.clone();
    let session_id = state.sessions.insert(active).await;

    tracing::info!(
        session_id = %session_id,
        profile = %view_source.image.file_name,
        mode = ?mode,
        "Labeling session started"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SessionView::new(session_id, &view_source),
        }),
    ))
}

/// GET /sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let view = state
        .sessions
        .read(id, |active| SessionView::new(id, active))
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /sessions/{id}
///
/// Discard a session without persisting anything.
pub async fn discard_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    tracing::info!(session_id = %id, "Labeling session discarded");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /sessions/{id}/image
///
/// Raw bytes of the profile image; decoding is up to the client.
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let (content_type, bytes) = state
        .sessions
        .read(id, |active| (active.image.content_type, active.image.bytes.clone()))
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

/// PUT /sessions/{id}/filter
///
/// Show only attributes whose name contains the query; a blank query shows
/// all of them.
pub async fn apply_filter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<FilterRequest>,
) -> AppResult<impl IntoResponse> {
    let result = state
        .sessions
        .update(id, |active| {
            let changed = active.session.apply_filter(&input.query);
            FilterResult {
                changed,
                attributes: active.session.visible_attributes().cloned().collect(),
            }
        })
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /sessions/{id}/attributes
///
/// Attributes visible under the current filter.
pub async fn list_attributes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let attributes: Vec<Attribute> = state
        .sessions
        .read(id, |active| active.session.visible_attributes().cloned().collect())
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(DataResponse { data: attributes }))
}

/// PUT /sessions/{id}/attributes/{name}
///
/// Replace the answers recorded for one attribute. Accepts zero, one, or
/// both of `"Yes"` and `"No"`.
pub async fn set_answers(
    State(state): State<AppState>,
    Path((id, name)): Path<(Uuid, String)>,
    Json(input): Json<SetAnswersRequest>,
) -> AppResult<impl IntoResponse> {
    let answers = input
        .answers
        .iter()
        .map(|a| Answer::parse(a))
        .collect::<Result<AnswerSet, _>>()?;

    let attribute = state
        .sessions
        .update(id, |active| {
            active.session.set_answers(&name, answers).cloned()
        })
        .await
        .ok_or_else(|| session_not_found(id))??;

    Ok(Json(DataResponse { data: attribute }))
}

/// POST /sessions/{id}/attributes
///
/// Store a new question in the catalog and add it to this session.
pub async fn add_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewQuestionRequest>,
) -> AppResult<impl IntoResponse> {
    let name = validate_question_name(&input.name)?;
    let target_field = state.store.target_field().await?;
    ensure_not_target_field(&name, &target_field)?;

    let already_in_session = state
        .sessions
        .read(id, |active| active.session.attribute(&name).is_some())
        .await
        .ok_or_else(|| session_not_found(id))?;
    if already_in_session {
        return Err(CoreError::Conflict(format!("Question '{name}' already exists")).into());
    }

    let stored = state.store.insert_question(&name).await?;
    if !stored {
        // Added to the catalog after this session started.
        tracing::info!(question = %name, "Question already in catalog, adding to session only");
    }

    let attribute = state
        .sessions
        .update(id, |active| active.session.add_attribute(&name).cloned())
        .await
        .ok_or_else(|| session_not_found(id))??;

    tracing::info!(session_id = %id, question = %name, stored, "Question added");

    let status = if stored { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(DataResponse { data: attribute })))
}

/// POST /sessions/{id}/submit
///
/// Expand the session's answers into knowledge records and persist them.
/// The session is discarded on success and kept on failure so the annotator
/// can retry.
pub async fn submit_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    // Removed before persisting: concurrent submits of one session write once.
    let active = state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| session_not_found(id))?;

    match persist(&state, &active.session).await {
        Ok(result) => {
            tracing::info!(
                session_id = %id,
                profile = %result.profile.file_name,
                records = result.records_inserted,
                conflicting = result.conflicting_attributes.len(),
                "Profile description submitted"
            );
            Ok(Json(DataResponse { data: result }))
        }
        Err(err) => {
            state.sessions.restore(id, active).await;
            Err(err)
        }
    }
}

async fn persist(state: &AppState, session: &LabelingSession) -> AppResult<SubmitResult> {
    let target_field = state.store.target_field().await?;
    let submission = session.partition(&target_field);
    let records = submission.expand();
    let records_inserted = records.len();

    let acknowledged = state
        .store
        .insert_many(Collection::Knowledge, records)
        .await?;
    if !acknowledged {
        return Err(AppError::InternalError(
            "Record store did not acknowledge the write".to_string(),
        ));
    }

    Ok(SubmitResult {
        profile: session.profile().clone(),
        records_inserted,
        conflicting_attributes: submission.conflicting,
    })
}
