//! Fallback heuristics for pages on unrecognized hosts. Low confidence by
//! nature; the user reviews every field before saving.

use std::sync::OnceLock;

use regex::Regex;

use crate::extraction::dom::PageDom;
use crate::extraction::{ExtractedJobData, ExtractionError};

const TITLE_DELIMITER: &str = " - ";
const MAX_LOCATION_LINE_CHARS: usize = 100;
const COMPANY_SCAN_LINES: usize = 10;
const DESCRIPTION_HEADINGS: &[&str] = &["job description", "responsibilities", "requirements"];
const MIN_DESCRIPTION_LINE_CHARS: usize = 50;
const DESCRIPTION_TARGET_CHARS: usize = 1000;

fn salary_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\$[\d,]+(?:\s*-\s*\$[\d,]+)?(?:\s*(?:per\s+)?(?:year|annually|yr|k))?")
            .expect("salary pattern is valid")
    })
}

fn location_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?i:remote|hybrid|on-site)\b|[\w ]+,\s*[A-Z]{2}\b")
            .expect("location pattern is valid")
    })
}

fn company_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)company|employer").expect("company label pattern is valid"))
}

pub(crate) fn extract(page: &dyn PageDom) -> Result<ExtractedJobData, ExtractionError> {
    let title = page.title();
    let text = page.visible_text();

    let position = match position_from_title(title) {
        Some(position) => position,
        None => page.select_text("h1")?.unwrap_or_default(),
    };
    let company = company_from_title(title)
        .or_else(|| company_from_text(text))
        .unwrap_or_default();

    Ok(ExtractedJobData {
        company,
        position,
        location: location_in_text(text).unwrap_or_default(),
        salary: salary_in_text(text).unwrap_or_default(),
        job_description: description_in_text(text).unwrap_or_default(),
    })
}

/// First segment of a `Position - Company` style title.
pub fn position_from_title(title: &str) -> Option<String> {
    if !title.contains(TITLE_DELIMITER) {
        return None;
    }
    title
        .split(TITLE_DELIMITER)
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Last segment of a `Position - Company` style title.
pub fn company_from_title(title: &str) -> Option<String> {
    if !title.contains(TITLE_DELIMITER) {
        return None;
    }
    title
        .split(TITLE_DELIMITER)
        .last()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// A `Company: ...` / `Employer: ...` line near the top of the page, with the
/// label removed.
pub fn company_from_text(text: &str) -> Option<String> {
    text.lines()
        .take(COMPANY_SCAN_LINES)
        .find(|line| line.contains("Company") || line.contains("Employer"))
        .map(|line| {
            company_label()
                .replace_all(line, "")
                .trim_matches(|c: char| c == ':' || c.is_whitespace())
                .to_string()
        })
        .filter(|s| !s.is_empty())
}

/// First short line that looks like a place: Remote/Hybrid/On-site or `City, ST`.
pub fn location_in_text(text: &str) -> Option<String> {
    text.lines()
        .find(|line| {
            line.chars().count() < MAX_LOCATION_LINE_CHARS && location_pattern().is_match(line)
        })
        .map(|line| line.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// First dollar amount, optionally a range, optionally with a period or `k`.
pub fn salary_in_text(text: &str) -> Option<String> {
    salary_pattern().find(text).map(|m| m.as_str().to_string())
}

/// Substantial lines following a description-like heading, until roughly
/// 1000 characters have been gathered.
pub fn description_in_text(text: &str) -> Option<String> {
    let mut description = String::new();
    let mut capturing = false;

    for line in text.lines() {
        let lower = line.to_lowercase();
        if DESCRIPTION_HEADINGS.iter().any(|h| lower.contains(h)) {
            capturing = true;
            continue;
        }
        if capturing && line.trim().chars().count() > MIN_DESCRIPTION_LINE_CHARS {
            description.push_str(line);
            description.push('\n');
            if description.chars().count() > DESCRIPTION_TARGET_CHARS {
                break;
            }
        }
    }

    let description = description.trim();
    (!description.is_empty()).then(|| description.to_string())
}
