//! Ownership-scoped note CRUD

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use common::error::DatabaseError;
use serde_json::json;
use tracing::{info, warn};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{NoteRequest, NoteResponse},
    validation::validate_note,
};

/// Trim the title and check the body
fn prepare(mut payload: NoteRequest) -> ApiResult<NoteRequest> {
    validate_note(&payload).map_err(ApiError::Validation)?;
    payload.title = payload.title.trim().to_string();
    Ok(payload)
}

/// Notes of the authenticated user
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let notes: Vec<NoteResponse> = state
        .note_repository
        .list_for_user(user.id)
        .await?
        .into_iter()
        .map(NoteResponse::from)
        .collect();

    Ok(Json(notes))
}

/// Create a note owned by the authenticated user
pub async fn create_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NoteRequest>,
) -> ApiResult<impl IntoResponse> {
    let payload = prepare(payload)?;

    let note = state
        .note_repository
        .create(user.id, &payload)
        .await
        .map_err(|e| match e {
            // Valid token for an account that no longer exists
            DatabaseError::ForeignKeyViolation(_) => {
                warn!("Note creation for missing user {}", user.id);
                ApiError::Unauthorized
            }
            other => ApiError::Database(other),
        })?;

    info!("User {} created note {}", user.id, note.id);

    Ok((StatusCode::CREATED, Json(NoteResponse::from(note))))
}

/// A single note, if the caller owns it
pub async fn get_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;

    let note = state
        .note_repository
        .find_owned(id, user.id)
        .await?
        .ok_or(ApiError::NotFoundOrNotOwner)?;

    Ok(Json(NoteResponse::from(note)))
}

/// Replace title and content of an owned note
pub async fn update_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
    Json(payload): Json<NoteRequest>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let payload = prepare(payload)?;

    let note = state
        .note_repository
        .update_owned(id, user.id, &payload)
        .await?
        .ok_or(ApiError::NotFoundOrNotOwner)?;

    info!("User {} updated note {}", user.id, note.id);

    Ok(Json(NoteResponse::from(note)))
}

/// Delete an owned note
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = path?;
    let deleted = state.note_repository.delete_owned(id, user.id).await?;

    if !deleted {
        return Err(ApiError::NotFoundOrNotOwner);
    }

    info!("User {} deleted note {}", user.id, id);

    Ok(Json(json!({"message": "Note deleted"})))
}
