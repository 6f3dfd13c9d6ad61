//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::UserResumeRow;
use crate::resume::storage::{
    check_resume_upload, clear_resume, delete_resume_object, find_resume, object_url, put_resume,
    resume_object_key, set_resume,
};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub key: String,
    pub url: String,
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl ResumeResponse {
    fn from_row(state: &AppState, row: UserResumeRow) -> Option<Self> {
        let key = row.resume_key?;
        Some(Self {
            url: object_url(&state.config.s3_endpoint, &state.config.s3_bucket, &key),
            key,
            uploaded_at: row.resume_uploaded_at,
        })
    }
}

struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

/// POST /api/v1/resume
///
/// Multipart upload with the PDF in the `resume` field. Replaces any previous resume.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ResumeResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        upload = Some(UploadedFile {
            file_name: field.file_name().map(str::to_owned),
            content_type: field.content_type().map(str::to_owned),
            data: field.bytes().await?,
        });
        break;
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    check_resume_upload(upload.content_type.as_deref(), &upload.data)?;

    let previous = find_resume(&state.db, user_id).await?;

    let now = Utc::now();
    let key = resume_object_key(user_id, upload.file_name.as_deref(), now);
    put_resume(&state.s3, &state.config.s3_bucket, &key, upload.data).await?;
    let row = set_resume(&state.db, user_id, &key, now).await?;

    if let Some(old_key) = previous.and_then(|p| p.resume_key) {
        if let Err(e) = delete_resume_object(&state.s3, &state.config.s3_bucket, &old_key).await {
            warn!("Could not remove replaced resume {old_key}: {e}");
        }
    }

    ResumeResponse::from_row(&state, row)
        .map(Json)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("resume key missing after upload")))
}

/// GET /api/v1/resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ResumeResponse>, AppError> {
    find_resume(&state.db, user_id)
        .await?
        .and_then(|row| ResumeResponse::from_row(&state, row))
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No resume found".to_string()))
}

/// DELETE /api/v1/resume
///
/// The pointer is cleared even if the object cannot be removed from storage.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<StatusCode, AppError> {
    let key = find_resume(&state.db, user_id)
        .await?
        .and_then(|row| row.resume_key)
        .ok_or_else(|| AppError::NotFound("No resume found to delete".to_string()))?;

    if let Err(e) = delete_resume_object(&state.s3, &state.config.s3_bucket, &key).await {
        warn!("Could not remove resume {key} from storage: {e}");
    }
    clear_resume(&state.db, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
