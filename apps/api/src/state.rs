use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::jobs::lifecycle::JobLifecycle;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Job application lifecycle over the configured `JobStore`.
    pub jobs: JobLifecycle,
    pub s3: S3Client,
    /// Client for server-side fetches of job posting pages. Does not follow redirects.
    pub http: reqwest::Client,
    pub llm: LlmClient,
    pub config: Config,
}
