use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::section::SectionRecord;
use crate::resume::aggregate::{build_snapshot, ResumeSnapshot};
use crate::resume::schema::SectionKind;
use crate::state::AppState;

// Section routes carry their `SectionKind` as a request extension, set by
// the router, so one set of handlers serves every section.

/// Non-numeric ids cannot name a row, so they are reported like missing rows.
fn entry_id(kind: SectionKind, path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::NotFound(format!("{} not found", kind.label())))
}

/// GET /{section}/
pub async fn handle_list_entries(
    State(state): State<AppState>,
    Extension(kind): Extension<SectionKind>,
    user: AuthUser,
) -> Result<Json<Vec<SectionRecord>>, AppError> {
    let entries = state.repository(kind).list(user.user_id).await?;
    Ok(Json(entries))
}

/// POST /{section}/
pub async fn handle_create_entry(
    State(state): State<AppState>,
    Extension(kind): Extension<SectionKind>,
    user: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SectionRecord>), AppError> {
    let Json(body) = payload?;
    let entry = state.repository(kind).create(user.user_id, &body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /{section}/:id/
pub async fn handle_get_entry(
    State(state): State<AppState>,
    Extension(kind): Extension<SectionKind>,
    user: AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<SectionRecord>, AppError> {
    let id = entry_id(kind, path)?;
    let entry = state.repository(kind).get(user.user_id, id).await?;
    Ok(Json(entry))
}

/// PUT | PATCH /{section}/:id/
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Extension(kind): Extension<SectionKind>,
    user: AuthUser,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SectionRecord>, AppError> {
    let id = entry_id(kind, path)?;
    let Json(body) = payload?;
    let entry = state.repository(kind).update(user.user_id, id, &body).await?;
    Ok(Json(entry))
}

/// DELETE /{section}/:id/
pub async fn handle_delete_entry(
    State(state): State<AppState>,
    Extension(kind): Extension<SectionKind>,
    user: AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = entry_id(kind, path)?;
    state.repository(kind).delete(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /personalInfo/, GET /skills/
pub async fn handle_get_singleton(
    State(state): State<AppState>,
    Extension(kind): Extension<SectionKind>,
    user: AuthUser,
) -> Result<Json<SectionRecord>, AppError> {
    let entry = state.repository(kind).get_or_create(user.user_id).await?;
    Ok(Json(entry))
}

/// PUT | PATCH /personalInfo/, /skills/
pub async fn handle_update_singleton(
    State(state): State<AppState>,
    Extension(kind): Extension<SectionKind>,
    user: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SectionRecord>, AppError> {
    let Json(body) = payload?;
    let entry = state
        .repository(kind)
        .update_singleton(user.user_id, &body)
        .await?;
    Ok(Json(entry))
}

/// GET /resume/
pub async fn handle_get_resume(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<ResumeSnapshot> {
    Json(build_snapshot(state.sections.as_ref(), user.user_id).await)
}
