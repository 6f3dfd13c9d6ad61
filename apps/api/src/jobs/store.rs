//! Persistence for job applications.
//!
//! `JobStore` is the seam the lifecycle manager talks to. Every mutation that
//! can change `status` applies the application-date stamp inside the store, as
//! one conditional write, so concurrent patches cannot both observe an unset
//! date and race on it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{
    JobApplication, JobApplicationRow, JobFields, JobStatus, NewJobApplication,
};

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(
        &self,
        owner: Uuid,
        new_job: &NewJobApplication,
        now: DateTime<Utc>,
    ) -> Result<JobApplication, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobApplication>, AppError>;

    /// Newest-created first.
    async fn find_by_owner(&self, owner: Uuid) -> Result<Vec<JobApplication>, AppError>;

    /// Replaces the client-writable fields of an owned record. Returns `None`
    /// when no record with that id belongs to `owner`.
    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        fields: &JobFields,
        now: DateTime<Utc>,
    ) -> Result<Option<JobApplication>, AppError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError>;
}

/// The application-date rule: an existing date always wins; otherwise entering
/// `applied` stamps `now`.
pub fn stamped_application_date(
    current: Option<DateTime<Utc>>,
    status: JobStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    current.or_else(|| (status == JobStatus::Applied).then_some(now))
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(
        &self,
        owner: Uuid,
        new_job: &NewJobApplication,
        now: DateTime<Utc>,
    ) -> Result<JobApplication, AppError> {
        let fields = &new_job.fields;
        let contact = fields.contact_person.clone().unwrap_or_default();
        let application_date =
            stamped_application_date(new_job.application_date, fields.status, now);

        let row = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            INSERT INTO job_applications
                (id, user_id, company, position, status, application_date, job_url, salary,
                 location, job_description, notes, contact_name, contact_email, contact_phone,
                 follow_up_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $16)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&fields.company)
        .bind(&fields.position)
        .bind(fields.status)
        .bind(application_date)
        .bind(&fields.job_url)
        .bind(fields.salary)
        .bind(&fields.location)
        .bind(&fields.job_description)
        .bind(&fields.notes)
        .bind(contact.name)
        .bind(contact.email)
        .bind(contact.phone)
        .bind(fields.follow_up_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobApplication>, AppError> {
        let row = sqlx::query_as::<_, JobApplicationRow>(
            "SELECT * FROM job_applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(JobApplication::from))
    }

    async fn find_by_owner(&self, owner: Uuid) -> Result<Vec<JobApplication>, AppError> {
        let rows = sqlx::query_as::<_, JobApplicationRow>(
            "SELECT * FROM job_applications WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(JobApplication::from).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        fields: &JobFields,
        now: DateTime<Utc>,
    ) -> Result<Option<JobApplication>, AppError> {
        let contact = fields.contact_person.clone().unwrap_or_default();

        // application_date is only ever filled in, never cleared or moved.
        let row = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            UPDATE job_applications SET
                company = $3,
                position = $4,
                status = $5,
                application_date = CASE
                    WHEN application_date IS NULL AND $5 = 'applied'::job_status THEN $6
                    ELSE application_date
                END,
                job_url = $7,
                salary = $8,
                location = $9,
                job_description = $10,
                notes = $11,
                contact_name = $12,
                contact_email = $13,
                contact_phone = $14,
                follow_up_date = $15,
                updated_at = $6
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&fields.company)
        .bind(&fields.position)
        .bind(fields.status)
        .bind(now)
        .bind(&fields.job_url)
        .bind(fields.salary)
        .bind(&fields.location)
        .bind(&fields.job_description)
        .bind(&fields.notes)
        .bind(contact.name)
        .bind(contact.email)
        .bind(contact.phone)
        .bind(fields.follow_up_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(JobApplication::from))
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM job_applications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (tests)
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub use memory::MemoryJobStore;


#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_stamp_when_entering_applied_without_date() {
        let now = Utc::now();
        assert_eq!(
            stamped_application_date(None, JobStatus::Applied, now),
            Some(now)
        );
    }

    #[test]
    fn test_existing_date_is_never_replaced() {
        let earlier = Utc::now() - Duration::days(30);
        let now = Utc::now();
        for status in JobStatus::ALL {
            assert_eq!(
                stamped_application_date(Some(earlier), status, now),
                Some(earlier),
                "status {status:?} moved the application date"
            );
        }
    }

    #[test]
    fn test_other_statuses_do_not_stamp() {
        let now = Utc::now();
        for status in JobStatus::ALL
            .into_iter()
            .filter(|s| *s != JobStatus::Applied)
        {
            assert_eq!(stamped_application_date(None, status, now), None);
        }
    }

    #[tokio::test]
    async fn test_memory_store_scopes_update_and_delete_to_owner() {
        let store = MemoryJobStore::default();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let new_job = NewJobApplication {
            fields: JobFields {
                company: "Acme".to_string(),
                position: "Engineer".to_string(),
                ..Default::default()
            },
            application_date: None,
        };
        let record = store.insert(owner, &new_job, Utc::now()).await.unwrap();

        let updated = store
            .update(record.id, stranger, &new_job.fields, Utc::now())
            .await
            .unwrap();
        assert!(updated.is_none());
        assert!(!store.delete(record.id, stranger).await.unwrap());
        assert!(store.delete(record.id, owner).await.unwrap());
        assert!(store.find_by_id(record.id).await.unwrap().is_none());
    }

    // These run the SQL against a real database: set DATABASE_URL and pass
    // `--ignored`. Each test gets a fresh database with migrations applied.
    mod postgres {
        use chrono::SubsecRound;

        use super::*;

        fn fields(status: JobStatus) -> JobFields {
            JobFields {
                company: "Acme".to_string(),
                position: "Engineer".to_string(),
                status,
                ..Default::default()
            }
        }

        // Postgres keeps microseconds.
        fn now() -> DateTime<Utc> {
            Utc::now().trunc_subsecs(6)
        }

        #[sqlx::test]
        #[ignore = "needs a PostgreSQL DATABASE_URL"]
        async fn test_update_stamps_once_and_never_overwrites(pool: PgPool) {
            let store = PgJobStore::new(pool);
            let owner = Uuid::new_v4();
            let new_job = NewJobApplication {
                fields: fields(JobStatus::Saved),
                application_date: None,
            };
            let record = store.insert(owner, &new_job, now()).await.unwrap();
            assert_eq!(record.application_date, None);

            let first = now();
            let applied = store
                .update(record.id, owner, &fields(JobStatus::Applied), first)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(applied.application_date, Some(first));

            let later = first + Duration::days(3);
            for status in [JobStatus::Interview, JobStatus::Applied, JobStatus::Saved] {
                let moved = store
                    .update(record.id, owner, &fields(status), later)
                    .await
                    .unwrap()
                    .unwrap();
                assert_eq!(moved.fields.status, status);
                assert_eq!(moved.application_date, Some(first));
            }
        }

        #[sqlx::test]
        #[ignore = "needs a PostgreSQL DATABASE_URL"]
        async fn test_insert_stamps_applied_and_keeps_backfill(pool: PgPool) {
            let store = PgJobStore::new(pool);
            let owner = Uuid::new_v4();
            let at = now();

            let applied = NewJobApplication {
                fields: fields(JobStatus::Applied),
                application_date: None,
            };
            let record = store.insert(owner, &applied, at).await.unwrap();
            assert_eq!(record.application_date, Some(at));

            let earlier = at - Duration::days(10);
            let backfilled = NewJobApplication {
                fields: fields(JobStatus::Applied),
                application_date: Some(earlier),
            };
            let record = store.insert(owner, &backfilled, at).await.unwrap();
            assert_eq!(record.application_date, Some(earlier));
        }

        #[sqlx::test]
        #[ignore = "needs a PostgreSQL DATABASE_URL"]
        async fn test_update_is_scoped_to_owner(pool: PgPool) {
            let store = PgJobStore::new(pool);
            let owner = Uuid::new_v4();
            let new_job = NewJobApplication {
                fields: fields(JobStatus::Saved),
                application_date: None,
            };
            let record = store.insert(owner, &new_job, now()).await.unwrap();

            let stranger = Uuid::new_v4();
            let result = store
                .update(record.id, stranger, &fields(JobStatus::Applied), now())
                .await
                .unwrap();
            assert!(result.is_none());
            assert!(!store.delete(record.id, stranger).await.unwrap());

            let listed = store.find_by_owner(owner).await.unwrap();
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].application_date, None);
        }
    }
}
