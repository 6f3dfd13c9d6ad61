use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// The resume half of a user record; identity itself lives with the auth gateway.
#[derive(Debug, Clone, FromRow)]
pub struct UserResumeRow {
    pub id: Uuid,
    pub resume_key: Option<String>,
    pub resume_uploaded_at: Option<DateTime<Utc>>,
}
