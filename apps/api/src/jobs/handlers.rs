//! Axum route handlers for the Jobs API. Every route is scoped to the
//! authenticated user.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::job::{JobApplication, JobFields, JobPatch, NewJobApplication};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub count: usize,
    pub jobs: Vec<JobApplication>,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<NewJobApplication>, JsonRejection>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    let Json(new_job) = payload?;
    let record = state.jobs.create(user_id, new_job).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<JobListResponse>, AppError> {
    let jobs = state.jobs.list(user_id).await?;
    Ok(Json(JobListResponse {
        count: jobs.len(),
        jobs,
    }))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<JobApplication>, AppError> {
    Ok(Json(state.jobs.get(&id, user_id).await?))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_replace_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<JobFields>, JsonRejection>,
) -> Result<Json<JobApplication>, AppError> {
    let Json(fields) = payload?;
    Ok(Json(state.jobs.replace(&id, user_id, fields).await?))
}

/// PATCH /api/v1/jobs/:id
pub async fn handle_patch_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<JobPatch>, JsonRejection>,
) -> Result<Json<JobApplication>, AppError> {
    let Json(patch) = payload?;
    Ok(Json(state.jobs.update(&id, user_id, patch).await?))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.jobs.delete(&id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
