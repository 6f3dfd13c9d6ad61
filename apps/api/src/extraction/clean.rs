//! Sanitizing applied to every extracted field before it reaches a user.

use std::sync::OnceLock;

use regex::Regex;

use crate::extraction::ExtractedJobData;

pub const MAX_FIELD_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

// `\w` and `\s` are Unicode-aware, so accented letters survive.
fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s\-.,()$]").expect("allow-list pattern is valid"))
}

/// Collapses whitespace, strips characters outside the allow-list, trims, then
/// truncates to `max_chars` characters.
pub fn clean_field(value: &str, max_chars: usize) -> String {
    let collapsed = whitespace_runs().replace_all(value, " ");
    let allowed = disallowed_chars().replace_all(&collapsed, "");
    allowed.trim().chars().take(max_chars).collect()
}

pub fn clean_job_data(data: ExtractedJobData) -> ExtractedJobData {
    ExtractedJobData {
        company: clean_field(&data.company, MAX_FIELD_CHARS),
        position: clean_field(&data.position, MAX_FIELD_CHARS),
        location: clean_field(&data.location, MAX_FIELD_CHARS),
        salary: clean_field(&data.salary, MAX_FIELD_CHARS),
        job_description: clean_field(&data.job_description, MAX_DESCRIPTION_CHARS),
    }
}
