//! Job posting extraction: turns a loaded posting page into a best-effort
//! application draft for the user to review.
//!
//! Dispatch is by hostname through the rule table in `sites`; unknown hosts
//! fall back to the heuristics in `generic`. Extraction never fails outward:
//! internal errors are logged and produce an empty draft.

pub mod clean;
pub mod detector;
pub mod dom;
pub mod fetch;
pub mod generic;
pub mod handlers;
pub mod sites;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::extraction::dom::PageDom;
use crate::extraction::sites::{site_for_host, SiteRules};

/// Candidate fields pulled from a posting page. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedJobData {
    pub company: String,
    pub position: String,
    pub location: String,
    pub salary: String,
    pub job_description: String,
}

/// Internal extraction failure. Never returned to callers of `extract_job_data`.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),
}

/// The extractor chosen for a page.
#[derive(Debug, Clone, Copy)]
pub enum Extractor {
    Site(&'static SiteRules),
    Generic,
}

impl Extractor {
    pub fn for_url(url: &str) -> Self {
        reqwest::Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().and_then(site_for_host))
            .map_or(Extractor::Generic, Extractor::Site)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Extractor::Site(site) => site.name,
            Extractor::Generic => "generic",
        }
    }

    fn run(&self, page: &dyn PageDom) -> Result<ExtractedJobData, ExtractionError> {
        match self {
            Extractor::Site(site) => site.extract(page),
            Extractor::Generic => generic::extract(page),
        }
    }
}

/// Extracts and sanitizes job fields from `page`.
pub fn extract_job_data(page: &dyn PageDom) -> ExtractedJobData {
    let extractor = Extractor::for_url(page.url());
    debug!("Extracting job data from {} with {}", page.url(), extractor.name());

    match extractor.run(page) {
        Ok(data) => clean::clean_job_data(data),
        Err(e) => {
            warn!("Job data extraction failed for {}: {e}", page.url());
            ExtractedJobData::default()
        }
    }
}
