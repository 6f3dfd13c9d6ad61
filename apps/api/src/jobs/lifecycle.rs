//! Job record lifecycle: ownership checks, validation and the
//! status → `application_date` coupling on every mutation path.
//!
//! Status transitions are unrestricted; any status may follow any other.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::store::JobStore;
use crate::jobs::validation::{normalize, validate};
use crate::models::job::{JobApplication, JobFields, JobPatch, NewJobApplication};

#[derive(Clone)]
pub struct JobLifecycle {
    store: Arc<dyn JobStore>,
}

impl JobLifecycle {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        owner: Uuid,
        mut new_job: NewJobApplication,
    ) -> Result<JobApplication, AppError> {
        normalize(&mut new_job.fields);
        validate(&new_job.fields)?;

        let record = self.store.insert(owner, &new_job, Utc::now()).await?;
        info!(
            "Created job application {} for user {owner} (status {})",
            record.id,
            record.fields.status.as_str()
        );
        Ok(record)
    }

    pub async fn get(&self, record_id: &str, requester: Uuid) -> Result<JobApplication, AppError> {
        self.owned_record(record_id, requester).await
    }

    pub async fn list(&self, owner: Uuid) -> Result<Vec<JobApplication>, AppError> {
        self.store.find_by_owner(owner).await
    }

    /// Full update: `fields` replaces every client-writable field.
    pub async fn replace(
        &self,
        record_id: &str,
        requester: Uuid,
        mut fields: JobFields,
    ) -> Result<JobApplication, AppError> {
        let current = self.owned_record(record_id, requester).await?;
        normalize(&mut fields);
        validate(&fields)?;
        self.persist(current, fields).await
    }

    /// Partial update: `patch` is merged over the current record and the
    /// merged result is validated as a whole.
    pub async fn update(
        &self,
        record_id: &str,
        requester: Uuid,
        patch: JobPatch,
    ) -> Result<JobApplication, AppError> {
        let current = self.owned_record(record_id, requester).await?;
        let mut fields = current.fields.clone();
        patch.apply_to(&mut fields);
        normalize(&mut fields);
        validate(&fields)?;
        self.persist(current, fields).await
    }

    pub async fn delete(&self, record_id: &str, requester: Uuid) -> Result<(), AppError> {
        let current = self.owned_record(record_id, requester).await?;
        if !self.store.delete(current.id, requester).await? {
            return Err(not_found());
        }
        info!("Deleted job application {} for user {requester}", current.id);
        Ok(())
    }

    async fn persist(
        &self,
        current: JobApplication,
        fields: JobFields,
    ) -> Result<JobApplication, AppError> {
        let updated = self
            .store
            .update(current.id, current.user_id, &fields, Utc::now())
            .await?
            // Deleted between the ownership check and the write.
            .ok_or_else(not_found)?;

        if current.fields.status != updated.fields.status {
            info!(
                "Job application {} moved {} -> {}",
                updated.id,
                current.fields.status.as_str(),
                updated.fields.status.as_str()
            );
        }
        Ok(updated)
    }

    /// Resolves a record the requester owns. Malformed ids are reported
    /// exactly like missing records.
    async fn owned_record(
        &self,
        record_id: &str,
        requester: Uuid,
    ) -> Result<JobApplication, AppError> {
        let id = Uuid::parse_str(record_id.trim()).map_err(|_| not_found())?;
        let record = self.store.find_by_id(id).await?.ok_or_else(not_found)?;
        if record.user_id != requester {
            return Err(AppError::Forbidden);
        }
        Ok(record)
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Job application not found".to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration};

    use super::*;
    use crate::jobs::store::MemoryJobStore;
    use crate::models::job::JobStatus;

    fn lifecycle() -> JobLifecycle {
        JobLifecycle::new(Arc::new(MemoryJobStore::default()))
    }

    fn new_job(status: JobStatus) -> NewJobApplication {
        NewJobApplication {
            fields: JobFields {
                company: "Acme Corp".to_string(),
                position: "Backend Engineer".to_string(),
                status,
                ..Default::default()
            },
            application_date: None,
        }
    }

    fn status_patch(status: JobStatus) -> JobPatch {
        JobPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    fn assert_within(stamp: Option<DateTime<Utc>>, before: DateTime<Utc>, after: DateTime<Utc>) {
        let stamp = stamp.expect("application_date should be set");
        assert!(stamp >= before && stamp <= after, "{stamp} not in [{before}, {after}]");
    }

    #[tokio::test]
    async fn test_create_defaults_to_saved_without_date() {
        let jobs = lifecycle();
        let record = jobs
            .create(Uuid::new_v4(), new_job(JobStatus::default()))
            .await
            .unwrap();
        assert_eq!(record.fields.status, JobStatus::Saved);
        assert!(record.application_date.is_none());
    }

    #[tokio::test]
    async fn test_create_as_applied_stamps_date() {
        let jobs = lifecycle();
        let before = Utc::now();
        let record = jobs
            .create(Uuid::new_v4(), new_job(JobStatus::Applied))
            .await
            .unwrap();
        assert_within(record.application_date, before, Utc::now());
    }

    #[tokio::test]
    async fn test_create_keeps_backfilled_date() {
        let jobs = lifecycle();
        let backfilled = Utc::now() - Duration::days(10);
        let mut job = new_job(JobStatus::Applied);
        job.application_date = Some(backfilled);
        let record = jobs.create(Uuid::new_v4(), job).await.unwrap();
        assert_eq!(record.application_date, Some(backfilled));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let jobs = lifecycle();
        let mut job = new_job(JobStatus::Saved);
        job.fields.company = String::new();
        job.fields.salary = Some(-5.0);
        match jobs.create(Uuid::new_v4(), job).await {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("company is required"));
                assert!(msg.contains("salary cannot be negative"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_patch_to_applied_stamps_date() {
        let jobs = lifecycle();
        let owner = Uuid::new_v4();
        let record = jobs.create(owner, new_job(JobStatus::Saved)).await.unwrap();

        let before = Utc::now();
        let updated = jobs
            .update(&record.id.to_string(), owner, status_patch(JobStatus::Applied))
            .await
            .unwrap();
        assert_eq!(updated.fields.status, JobStatus::Applied);
        assert_within(updated.application_date, before, Utc::now());
    }

    #[tokio::test]
    async fn test_replace_to_applied_stamps_date() {
        let jobs = lifecycle();
        let owner = Uuid::new_v4();
        let record = jobs.create(owner, new_job(JobStatus::Saved)).await.unwrap();

        let mut fields = record.fields.clone();
        fields.status = JobStatus::Applied;
        fields.notes = Some("Referred by Sam".to_string());

        let before = Utc::now();
        let updated = jobs
            .replace(&record.id.to_string(), owner, fields)
            .await
            .unwrap();
        assert_within(updated.application_date, before, Utc::now());
        assert_eq!(updated.fields.notes.as_deref(), Some("Referred by Sam"));
    }

    #[tokio::test]
    async fn test_date_survives_any_later_transition() {
        let jobs = lifecycle();
        let owner = Uuid::new_v4();
        let record = jobs.create(owner, new_job(JobStatus::Applied)).await.unwrap();
        let stamped = record.application_date;
        let id = record.id.to_string();

        // Leave applied, come back, and wander through the rest.
        for status in [
            JobStatus::Interview,
            JobStatus::Saved,
            JobStatus::Applied,
            JobStatus::Rejected,
            JobStatus::Archived,
        ] {
            let updated = jobs.update(&id, owner, status_patch(status)).await.unwrap();
            assert_eq!(updated.fields.status, status);
            assert_eq!(updated.application_date, stamped);
        }

        let mut fields = record.fields.clone();
        fields.status = JobStatus::Applied;
        let replaced = jobs.replace(&id, owner, fields).await.unwrap();
        assert_eq!(replaced.application_date, stamped);
    }

    #[tokio::test]
    async fn test_any_status_can_follow_any_other() {
        let jobs = lifecycle();
        let owner = Uuid::new_v4();
        let record = jobs.create(owner, new_job(JobStatus::Offer)).await.unwrap();
        let id = record.id.to_string();

        for from in JobStatus::ALL {
            for to in JobStatus::ALL {
                jobs.update(&id, owner, status_patch(from)).await.unwrap();
                let updated = jobs.update(&id, owner, status_patch(to)).await.unwrap();
                assert_eq!(updated.fields.status, to);
            }
        }
    }

    #[tokio::test]
    async fn test_other_users_are_forbidden() {
        let jobs = lifecycle();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let record = jobs.create(owner, new_job(JobStatus::Saved)).await.unwrap();
        let id = record.id.to_string();

        assert!(matches!(jobs.get(&id, intruder).await, Err(AppError::Forbidden)));
        assert!(matches!(
            jobs.update(&id, intruder, status_patch(JobStatus::Applied)).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            jobs.replace(&id, intruder, record.fields.clone()).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(jobs.delete(&id, intruder).await, Err(AppError::Forbidden)));

        // Untouched by the failed attempts.
        let still_there = jobs.get(&id, owner).await.unwrap();
        assert_eq!(still_there.fields.status, JobStatus::Saved);
        assert!(still_there.application_date.is_none());
    }

    #[tokio::test]
    async fn test_malformed_and_missing_ids_are_not_found() {
        let jobs = lifecycle();
        let owner = Uuid::new_v4();
        for id in ["not-a-uuid".to_string(), Uuid::new_v4().to_string()] {
            assert!(matches!(jobs.get(&id, owner).await, Err(AppError::NotFound(_))));
            assert!(matches!(
                jobs.update(&id, owner, JobPatch::default()).await,
                Err(AppError::NotFound(_))
            ));
            assert!(matches!(jobs.delete(&id, owner).await, Err(AppError::NotFound(_))));
        }
    }

    #[tokio::test]
    async fn test_second_delete_is_not_found() {
        let jobs = lifecycle();
        let owner = Uuid::new_v4();
        let record = jobs.create(owner, new_job(JobStatus::Saved)).await.unwrap();
        let id = record.id.to_string();

        jobs.delete(&id, owner).await.unwrap();
        assert!(matches!(jobs.delete(&id, owner).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_with_long_company_names_company() {
        let jobs = lifecycle();
        let owner = Uuid::new_v4();
        let record = jobs.create(owner, new_job(JobStatus::Saved)).await.unwrap();

        let patch = JobPatch {
            company: Some("c".repeat(101)),
            ..Default::default()
        };
        match jobs.update(&record.id.to_string(), owner, patch).await {
            Err(AppError::Validation(msg)) => assert!(msg.contains("company")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped_newest_first() {
        let jobs = lifecycle();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        let mut created = Vec::new();
        for position in ["First", "Second", "Third"] {
            let mut job = new_job(JobStatus::Saved);
            job.fields.position = position.to_string();
            created.push(jobs.create(owner, job).await.unwrap().id);
        }
        jobs.create(other, new_job(JobStatus::Saved)).await.unwrap();

        let listed: Vec<_> = jobs.list(owner).await.unwrap().into_iter().map(|j| j.id).collect();
        created.reverse();
        assert_eq!(listed, created);
    }
}
