//! Axum route handlers for the AI assistance API.

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use crate::ai::analysis::{analyze_resume, check_job_description, resume_text, AnalysisType};
use crate::ai::interview::{generate_questions, InterviewPrepRequest, InterviewQuestion};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::resume::storage::{check_resume_upload, find_resume, get_resume_object};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: String,
    pub analysis_type: AnalysisType,
    /// Whether the stored resume was used instead of an attached file.
    pub used_stored_resume: bool,
}

#[derive(Debug, Serialize)]
pub struct InterviewPrepResponse {
    pub questions: Vec<InterviewQuestion>,
    pub metadata: InterviewPrepRequest,
}

#[derive(Default)]
struct AnalysisForm {
    resume: Option<(Option<String>, Bytes)>,
    job_description: Option<String>,
    analysis_type: Option<String>,
}

/// POST /api/v1/ai/analyze-resume
///
/// Multipart form: `job_description` (required), `analysis_type`
/// (general | skills | keywords | percentage) and an optional `resume` PDF.
/// Without an attached file the user's stored resume is analyzed.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut form = AnalysisForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let content_type = field.content_type().map(str::to_owned);
                form.resume = Some((content_type, field.bytes().await?));
            }
            "job_description" => form.job_description = Some(field.text().await?),
            "analysis_type" => form.analysis_type = Some(field.text().await?),
            _ => {}
        }
    }

    let job_description = check_job_description(form.job_description)?;
    let analysis_type = AnalysisType::from_form(form.analysis_type.as_deref());

    let (pdf, used_stored_resume) = match form.resume {
        Some((content_type, data)) => {
            check_resume_upload(content_type.as_deref(), &data)?;
            (data, false)
        }
        None => {
            let key = find_resume(&state.db, user_id)
                .await?
                .and_then(|row| row.resume_key)
                .ok_or_else(|| {
                    AppError::NotFound("No resume found; attach one or upload it first".to_string())
                })?;
            (
                get_resume_object(&state.s3, &state.config.s3_bucket, &key).await?,
                true,
            )
        }
    };

    let text = resume_text(pdf).await?;
    let analysis = analyze_resume(&state.llm, analysis_type, &text, &job_description).await?;

    Ok(Json(AnalysisResponse {
        analysis,
        analysis_type,
        used_stored_resume,
    }))
}

/// POST /api/v1/ai/interview-questions
pub async fn handle_interview_questions(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    payload: Result<Json<InterviewPrepRequest>, JsonRejection>,
) -> Result<Json<InterviewPrepResponse>, AppError> {
    let Json(request) = payload?;
    let request = request.normalized()?;
    let questions = generate_questions(&state.llm, &request).await?;
    Ok(Json(InterviewPrepResponse {
        questions,
        metadata: request,
    }))
}
