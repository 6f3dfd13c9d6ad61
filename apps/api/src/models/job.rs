use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Pipeline stage of a job application. Any stage may move to any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Saved,
    Applied,
    Screen,
    Interview,
    Offer,
    Rejected,
    Ghosted,
    Archived,
}

impl JobStatus {
    pub const ALL: [JobStatus; 8] = [
        JobStatus::Saved,
        JobStatus::Applied,
        JobStatus::Screen,
        JobStatus::Interview,
        JobStatus::Offer,
        JobStatus::Rejected,
        JobStatus::Ghosted,
        JobStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Saved => "saved",
            JobStatus::Applied => "applied",
            JobStatus::Screen => "screen",
            JobStatus::Interview => "interview",
            JobStatus::Offer => "offer",
            JobStatus::Rejected => "rejected",
            JobStatus::Ghosted => "ghosted",
            JobStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPerson {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Client-writable fields of a job application.
///
/// Used as-is for a full replace; `company` and `position` default to empty so
/// a missing value surfaces as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFields {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub status: JobStatus,
    pub job_url: Option<String>,
    pub salary: Option<f64>,
    pub location: Option<String>,
    pub job_description: Option<String>,
    pub notes: Option<String>,
    pub contact_person: Option<ContactPerson>,
    pub follow_up_date: Option<DateTime<Utc>>,
}

/// Body of a create request. `application_date` may be backfilled here and
/// nowhere else.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewJobApplication {
    #[serde(flatten)]
    pub fields: JobFields,
    pub application_date: Option<DateTime<Utc>>,
}

/// Partial update. Absent keys leave a field untouched; an explicit `null`
/// clears an optional field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<JobStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub job_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub salary: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub job_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub contact_person: Option<Option<ContactPerson>>,
    #[serde(default, deserialize_with = "nullable")]
    pub follow_up_date: Option<Option<DateTime<Utc>>>,
}

impl JobPatch {
    /// Merges the patch over `fields`.
    pub fn apply_to(self, fields: &mut JobFields) {
        if let Some(company) = self.company {
            fields.company = company;
        }
        if let Some(position) = self.position {
            fields.position = position;
        }
        if let Some(status) = self.status {
            fields.status = status;
        }
        if let Some(job_url) = self.job_url {
            fields.job_url = job_url;
        }
        if let Some(salary) = self.salary {
            fields.salary = salary;
        }
        if let Some(location) = self.location {
            fields.location = location;
        }
        if let Some(job_description) = self.job_description {
            fields.job_description = job_description;
        }
        if let Some(notes) = self.notes {
            fields.notes = notes;
        }
        if let Some(contact_person) = self.contact_person {
            fields.contact_person = contact_person;
        }
        if let Some(follow_up_date) = self.follow_up_date {
            fields.follow_up_date = follow_up_date;
        }
    }
}

// Distinguishes `"key": null` (Some(None)) from a missing key (None, via `default`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A persisted job application as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub fields: JobFields,
    pub application_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct JobApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub application_date: Option<DateTime<Utc>>,
    pub job_url: Option<String>,
    pub salary: Option<f64>,
    pub location: Option<String>,
    pub job_description: Option<String>,
    pub notes: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<JobApplicationRow> for JobApplication {
    fn from(row: JobApplicationRow) -> Self {
        let contact_person =
            if row.contact_name.is_none() && row.contact_email.is_none() && row.contact_phone.is_none() {
                None
            } else {
                Some(ContactPerson {
                    name: row.contact_name,
                    email: row.contact_email,
                    phone: row.contact_phone,
                })
            };

        JobApplication {
            id: row.id,
            user_id: row.user_id,
            fields: JobFields {
                company: row.company,
                position: row.position,
                status: row.status,
                job_url: row.job_url,
                salary: row.salary,
                location: row.location,
                job_description: row.job_description,
                notes: row.notes,
                contact_person,
                follow_up_date: row.follow_up_date,
            },
            application_date: row.application_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
