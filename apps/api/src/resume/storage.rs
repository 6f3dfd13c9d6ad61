//! Resume objects in S3 and the pointer to them on the user record.

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserResumeRow;

pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;
const PDF_CONTENT_TYPE: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Accepts a declared PDF content type, or a file that starts with the PDF
/// signature when the client sent a generic type.
pub fn is_pdf(content_type: Option<&str>, data: &[u8]) -> bool {
    match content_type.map(|ct| ct.trim().to_ascii_lowercase()) {
        Some(ct) if ct == PDF_CONTENT_TYPE => true,
        Some(ct) if ct != "application/octet-stream" => false,
        _ => data.starts_with(PDF_MAGIC),
    }
}

/// `resumes/{user_id}/{unix_millis}-{uuid}-{file name}`
pub fn resume_object_key(user_id: Uuid, file_name: Option<&str>, now: DateTime<Utc>) -> String {
    format!(
        "resumes/{}/{}-{}-{}",
        user_id,
        now.timestamp_millis(),
        Uuid::new_v4(),
        sanitize_file_name(file_name)
    )
}

fn sanitize_file_name(file_name: Option<&str>) -> String {
    // Browsers may send a full client-side path.
    let base = file_name
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "resume.pdf".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Rejects empty, oversized and non-PDF uploads.
pub fn check_resume_upload(content_type: Option<&str>, data: &[u8]) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if data.len() > MAX_RESUME_BYTES {
        return Err(AppError::Validation(
            "Resume cannot be larger than 10 MB".to_string(),
        ));
    }
    if !is_pdf(content_type, data) {
        return Err(AppError::Validation("Only PDF files are allowed".to_string()));
    }
    Ok(())
}

pub fn object_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
}

pub async fn put_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    data: Bytes,
) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(data))
        .content_type(PDF_CONTENT_TYPE)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;
    info!("Uploaded resume to s3://{bucket}/{key}");
    Ok(())
}

pub async fn get_resume_object(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
) -> Result<Bytes, AppError> {
    let object = s3
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("download of {key} failed: {e}")))?;
    let data = object
        .body
        .collect()
        .await
        .map_err(|e| AppError::S3(format!("reading {key} failed: {e}")))?;
    Ok(data.into_bytes())
}

pub async fn delete_resume_object(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
) -> Result<(), AppError> {
    s3.delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("delete of {key} failed: {e}")))?;
    info!("Deleted resume s3://{bucket}/{key}");
    Ok(())
}

pub async fn find_resume(pool: &PgPool, user_id: Uuid) -> Result<Option<UserResumeRow>, AppError> {
    Ok(sqlx::query_as::<_, UserResumeRow>(
        "SELECT id, resume_key, resume_uploaded_at FROM users WHERE id = $1 AND resume_key IS NOT NULL",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

/// Points the user at a new resume object, creating the user row on first upload.
pub async fn set_resume(
    pool: &PgPool,
    user_id: Uuid,
    key: &str,
    uploaded_at: DateTime<Utc>,
) -> Result<UserResumeRow, AppError> {
    Ok(sqlx::query_as::<_, UserResumeRow>(
        r#"
        INSERT INTO users (id, resume_key, resume_uploaded_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (id) DO UPDATE
            SET resume_key = EXCLUDED.resume_key,
                resume_uploaded_at = EXCLUDED.resume_uploaded_at
        RETURNING id, resume_key, resume_uploaded_at
        "#,
    )
    .bind(user_id)
    .bind(key)
    .bind(uploaded_at)
    .fetch_one(pool)
    .await?)
}

pub async fn clear_resume(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET resume_key = NULL, resume_uploaded_at = NULL WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_by_content_type() {
        assert!(is_pdf(Some("application/pdf"), b"anything"));
        assert!(is_pdf(Some("Application/PDF "), b""));
        assert!(!is_pdf(Some("image/png"), b"%PDF-1.7"));
    }

    #[test]
    fn test_pdf_by_signature_when_type_is_generic() {
        assert!(is_pdf(None, b"%PDF-1.4\n..."));
        assert!(is_pdf(Some("application/octet-stream"), b"%PDF-1.4"));
        assert!(!is_pdf(None, b"PK\x03\x04"));
    }

    #[test]
    fn test_check_resume_upload() {
        assert!(check_resume_upload(Some("application/pdf"), b"%PDF-1.7").is_ok());
        assert!(matches!(
            check_resume_upload(Some("application/pdf"), b""),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            check_resume_upload(Some("text/plain"), b"hello"),
            Err(AppError::Validation(_))
        ));
        let oversized = vec![b'%'; MAX_RESUME_BYTES + 1];
        assert!(matches!(
            check_resume_upload(Some("application/pdf"), &oversized),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_object_key_layout() {
        let user = Uuid::new_v4();
        let now = Utc::now();
        let key = resume_object_key(user, Some("My Resume (2024).pdf"), now);
        let prefix = format!("resumes/{user}/{}-", now.timestamp_millis());
        assert!(key.starts_with(&prefix), "{key}");
        assert!(key.ends_with("-My_Resume__2024_.pdf"), "{key}");
    }

    #[test]
    fn test_object_keys_are_unique() {
        let user = Uuid::new_v4();
        let now = Utc::now();
        assert_ne!(
            resume_object_key(user, Some("cv.pdf"), now),
            resume_object_key(user, Some("cv.pdf"), now)
        );
    }

    #[test]
    fn test_file_name_sanitizing() {
        assert_eq!(sanitize_file_name(Some("C:\\Users\\me\\cv.pdf")), "cv.pdf");
        assert_eq!(sanitize_file_name(Some("../../etc/passwd")), "passwd");
        assert_eq!(sanitize_file_name(Some("..")), "resume.pdf");
        assert_eq!(sanitize_file_name(None), "resume.pdf");
    }

    #[test]
    fn test_object_url() {
        assert_eq!(
            object_url("http://localhost:9000/", "resumes-bucket", "resumes/u/1-cv.pdf"),
            "http://localhost:9000/resumes-bucket/resumes/u/1-cv.pdf"
        );
    }
}
