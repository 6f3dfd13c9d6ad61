//! Axum route handlers for the Extraction API.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extraction::detector::is_job_posting_url;
use crate::extraction::dom::HtmlPage;
use crate::extraction::fetch::fetch_page;
use crate::extraction::{extract_job_data, ExtractedJobData, Extractor};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub url: String,
    /// Page HTML captured by the browser. Fetched server-side when absent.
    pub html: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub data: ExtractedJobData,
    pub is_job_posting: bool,
    pub extractor: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct DetectQuery {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub url: String,
    pub is_job_posting: bool,
}

/// POST /api/v1/extract
///
/// Always answers with a draft; a page that cannot be fetched or parsed
/// produces empty fields for the user to fill in. URLs that point at
/// non-public addresses are refused before any request is made.
pub async fn handle_extract(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, AppError> {
    let Json(request) = payload?;
    if request.url.trim().is_empty() {
        return Err(AppError::Validation("url is required".to_string()));
    }

    let html = match request.html {
        Some(html) => html,
        None => match fetch_page(&state.http, &request.url).await {
            Ok(html) => html,
            Err(e) if e.is_refused() => {
                warn!("Refused to fetch {} for user {user_id}: {e}", request.url);
                return Err(AppError::Validation(
                    "url must be a public http(s) address".to_string(),
                ));
            }
            Err(e) => {
                warn!("Fetching {} failed: {e}", request.url);
                String::new()
            }
        },
    };

    let url = request.url.clone();
    // Parsing is CPU-bound and the parsed document is not Send.
    let data = tokio::task::spawn_blocking(move || {
        let page = HtmlPage::parse(&url, &html);
        extract_job_data(&page)
    })
    .await
    .unwrap_or_else(|e| {
        warn!("Extraction task for {} did not complete: {e}", request.url);
        ExtractedJobData::default()
    });

    Ok(Json(ExtractResponse {
        data,
        is_job_posting: is_job_posting_url(&request.url),
        extractor: Extractor::for_url(&request.url).name(),
    }))
}

/// GET /api/v1/extract/detect?url=
pub async fn handle_detect(Query(query): Query<DetectQuery>) -> Json<DetectResponse> {
    let is_job_posting = is_job_posting_url(&query.url);
    Json(DetectResponse {
        url: query.url,
        is_job_posting,
    })
}
