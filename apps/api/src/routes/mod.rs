pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ai::handlers as ai;
use crate::extraction::handlers as extraction;
use crate::jobs::handlers as jobs;
use crate::resume::handlers as resume;
use crate::resume::storage::MAX_RESUME_BYTES;
use crate::state::AppState;

// Room for multipart boundaries and headers on top of the file itself.
const RESUME_BODY_LIMIT: usize = MAX_RESUME_BYTES + 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_replace_job)
                .patch(jobs::handle_patch_job)
                .delete(jobs::handle_delete_job),
        )
        // Extraction API
        .route("/api/v1/extract", post(extraction::handle_extract))
        .route("/api/v1/extract/detect", get(extraction::handle_detect))
        // Resume API
        .route(
            "/api/v1/resume",
            post(resume::handle_upload_resume)
                .get(resume::handle_get_resume)
                .delete(resume::handle_delete_resume)
                .layer(DefaultBodyLimit::max(RESUME_BODY_LIMIT)),
        )
        // AI assistance API
        .route(
            "/api/v1/ai/analyze-resume",
            post(ai::handle_analyze_resume).layer(DefaultBodyLimit::max(RESUME_BODY_LIMIT)),
        )
        .route(
            "/api/v1/ai/interview-questions",
            post(ai::handle_interview_questions),
        )
        .with_state(state)
}
