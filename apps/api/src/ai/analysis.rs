//! Resume review against a job description, in one of four modes.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ai::prompts::{
    resume_review_prompt, GENERAL_REVIEW_SYSTEM, KEYWORDS_REVIEW_SYSTEM, MATCH_PERCENTAGE_SYSTEM,
    SKILLS_REVIEW_SYSTEM,
};
use crate::errors::AppError;
use crate::llm_client::LlmClient;

/// Upper bound on resume text sent to the model.
pub const MAX_RESUME_TEXT_CHARS: usize = 20_000;
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 20_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    #[default]
    General,
    Skills,
    Keywords,
    Percentage,
}

impl AnalysisType {
    /// Missing or unknown modes fall back to a general review.
    pub fn from_form(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("skills") => AnalysisType::Skills,
            Some("keywords") => AnalysisType::Keywords,
            Some("percentage") => AnalysisType::Percentage,
            _ => AnalysisType::General,
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            AnalysisType::General => GENERAL_REVIEW_SYSTEM,
            AnalysisType::Skills => SKILLS_REVIEW_SYSTEM,
            AnalysisType::Keywords => KEYWORDS_REVIEW_SYSTEM,
            AnalysisType::Percentage => MATCH_PERCENTAGE_SYSTEM,
        }
    }
}

/// Trimmed, non-empty job description within the size limit.
pub fn check_job_description(raw: Option<String>) -> Result<String, AppError> {
    let description = raw.map(|s| s.trim().to_string()).unwrap_or_default();
    if description.is_empty() {
        return Err(AppError::Validation("job_description is required".to_string()));
    }
    if description.chars().count() > MAX_JOB_DESCRIPTION_CHARS {
        return Err(AppError::Validation(format!(
            "job_description cannot be more than {MAX_JOB_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(description)
}

/// Plain text of a PDF resume, whitespace-collapsed and truncated.
pub async fn resume_text(pdf: Bytes) -> Result<String, AppError> {
    // pdf-extract is synchronous and can panic on malformed input.
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await
        .map_err(|e| e.to_string())
        .and_then(|result| result.map_err(|e| e.to_string()));

    let raw = extracted.map_err(|e| {
        warn!("Could not read resume PDF: {e}");
        AppError::UnprocessableEntity("Could not read text from the resume PDF".to_string())
    })?;

    let text = normalize_resume_text(&raw);
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "The resume PDF contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

fn normalize_resume_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_RESUME_TEXT_CHARS)
        .collect()
}

pub async fn analyze_resume(
    llm: &LlmClient,
    analysis_type: AnalysisType,
    resume_text: &str,
    job_description: &str,
) -> Result<String, AppError> {
    let prompt = resume_review_prompt(resume_text, job_description);
    let analysis = llm
        .call_text(&prompt, analysis_type.system_prompt())
        .await
        .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))?;
    info!("Resume analysis ({analysis_type:?}) produced {} chars", analysis.len());
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::llm_client::test_support::{stub_llm, text_reply};

    #[test]
    fn test_analysis_type_falls_back_to_general() {
        assert_eq!(AnalysisType::from_form(None), AnalysisType::General);
        assert_eq!(AnalysisType::from_form(Some("astrology")), AnalysisType::General);
        assert_eq!(AnalysisType::from_form(Some(" Keywords ")), AnalysisType::Keywords);
        assert_eq!(AnalysisType::from_form(Some("percentage")), AnalysisType::Percentage);
    }

    #[test]
    fn test_each_mode_has_its_own_prompt() {
        let prompts = [
            AnalysisType::General,
            AnalysisType::Skills,
            AnalysisType::Keywords,
            AnalysisType::Percentage,
        ]
        .map(AnalysisType::system_prompt);
        for (i, a) in prompts.iter().enumerate() {
            for b in &prompts[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(AnalysisType::Percentage.system_prompt().contains("percentage"));
    }

    #[test]
    fn test_job_description_required() {
        assert!(matches!(
            check_job_description(Some("   ".to_string())),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(check_job_description(None), Err(AppError::Validation(_))));
        assert_eq!(
            check_job_description(Some("  Build APIs in Rust ".to_string())).unwrap(),
            "Build APIs in Rust"
        );
    }

    #[test]
    fn test_normalize_resume_text_collapses_and_truncates() {
        assert_eq!(normalize_resume_text("Jane  Doe\n\nRust\tEngineer"), "Jane Doe Rust Engineer");
        let long = "a ".repeat(MAX_RESUME_TEXT_CHARS);
        assert_eq!(normalize_resume_text(&long).chars().count(), MAX_RESUME_TEXT_CHARS);
    }

    #[tokio::test]
    async fn test_unreadable_pdf_is_unprocessable() {
        let result = resume_text(Bytes::from_static(b"%PDF-1.4 not really a pdf")).await;
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
    }

    #[tokio::test]
    async fn test_analyze_resume_returns_model_text() {
        let llm = stub_llm(StatusCode::OK, text_reply("Match: 72%\nMissing: Kubernetes")).await;
        let analysis = analyze_resume(&llm, AnalysisType::Percentage, "Rust engineer", "Rust, Kubernetes")
            .await
            .unwrap();
        assert!(analysis.starts_with("Match: 72%"));
    }

    #[tokio::test]
    async fn test_analyze_resume_maps_api_failure() {
        let llm = stub_llm(StatusCode::UNAUTHORIZED, serde_json::json!({"error": {"message": "bad key"}})).await;
        let result = analyze_resume(&llm, AnalysisType::General, "resume", "posting").await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
