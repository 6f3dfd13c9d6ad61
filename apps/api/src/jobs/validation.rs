//! Field constraints for job applications.
//!
//! Every violation is collected so the caller sees the full list at once.

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::AppError;
use crate::models::job::{ContactPerson, JobFields};

pub const MAX_COMPANY_CHARS: usize = 100;
pub const MAX_POSITION_CHARS: usize = 100;
pub const MAX_LOCATION_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 5000;
pub const MAX_NOTES_CHARS: usize = 1000;
pub const MAX_CONTACT_NAME_CHARS: usize = 50;
pub const MAX_CONTACT_PHONE_CHARS: usize = 20;

fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"^https?://.+").expect("job url pattern is valid"))
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$")
            .expect("contact email pattern is valid")
    })
}

/// Trims string fields and drops optional values that are blank after trimming.
/// `job_description` and `notes` keep their inner formatting.
pub fn normalize(fields: &mut JobFields) {
    fields.company = fields.company.trim().to_string();
    fields.position = fields.position.trim().to_string();
    fields.job_url = trimmed(fields.job_url.take());
    fields.location = trimmed(fields.location.take());
    fields.job_description = fields.job_description.take().filter(|s| !s.trim().is_empty());
    fields.notes = fields.notes.take().filter(|s| !s.trim().is_empty());

    fields.contact_person = fields.contact_person.take().and_then(|contact| {
        let contact = ContactPerson {
            name: trimmed(contact.name),
            email: trimmed(contact.email),
            phone: trimmed(contact.phone),
        };
        if contact == ContactPerson::default() {
            None
        } else {
            Some(contact)
        }
    });
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Checks every constraint and returns all violations, comma-joined.
pub fn validate(fields: &JobFields) -> Result<(), AppError> {
    let violations = collect_violations(fields);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(violations.join(", ")))
    }
}

fn collect_violations(fields: &JobFields) -> Vec<String> {
    let mut violations = Vec::new();

    required(&mut violations, "company", &fields.company, MAX_COMPANY_CHARS);
    required(&mut violations, "position", &fields.position, MAX_POSITION_CHARS);

    if let Some(url) = &fields.job_url {
        if !url_pattern().is_match(url) {
            violations.push("job_url must be a valid http(s) URL".to_string());
        }
    }

    if let Some(salary) = fields.salary {
        if !salary.is_finite() {
            violations.push("salary must be a finite number".to_string());
        } else if salary < 0.0 {
            violations.push("salary cannot be negative".to_string());
        }
    }

    max_len(&mut violations, "location", fields.location.as_deref(), MAX_LOCATION_CHARS);
    max_len(
        &mut violations,
        "job_description",
        fields.job_description.as_deref(),
        MAX_DESCRIPTION_CHARS,
    );
    max_len(&mut violations, "notes", fields.notes.as_deref(), MAX_NOTES_CHARS);

    if let Some(contact) = &fields.contact_person {
        max_len(
            &mut violations,
            "contact_person.name",
            contact.name.as_deref(),
            MAX_CONTACT_NAME_CHARS,
        );
        if let Some(email) = &contact.email {
            if !email_pattern().is_match(email) {
                violations.push("contact_person.email must be a valid email".to_string());
            }
        }
        max_len(
            &mut violations,
            "contact_person.phone",
            contact.phone.as_deref(),
            MAX_CONTACT_PHONE_CHARS,
        );
    }

    violations
}

fn required(violations: &mut Vec<String>, field: &str, value: &str, max: usize) {
    if value.is_empty() {
        violations.push(format!("{field} is required"));
    } else {
        max_len(violations, field, Some(value), max);
    }
}

fn max_len(violations: &mut Vec<String>, field: &str, value: Option<&str>, max: usize) {
    if let Some(value) = value {
        if value.chars().count() > max {
            violations.push(format!("{field} cannot be more than {max} characters"));
        }
    }
}
