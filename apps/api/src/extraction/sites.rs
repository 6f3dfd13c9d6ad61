//! Per-site extraction rules for the supported job boards.
//!
//! Each field lists its sources in priority order; the first non-empty value
//! wins. Selectors track each board's current markup and need updating when
//! the boards change it.

use crate::extraction::dom::PageDom;
use crate::extraction::generic::{location_in_text, salary_in_text};
use crate::extraction::{ExtractedJobData, ExtractionError};

/// Where a field value can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Text of the first element matching a CSS selector.
    Css(&'static str),
    /// A fixed value, for single-employer career sites.
    Constant(&'static str),
    /// The n-th `" - "`-separated segment of the document title.
    TitleSegment(usize),
    /// First salary-looking match in the page text.
    SalaryInText,
    /// First location-looking line in the page text.
    LocationInText,
}

#[derive(Debug)]
pub struct SiteRules {
    pub name: &'static str,
    /// Matched as a substring of the page hostname.
    pub host: &'static str,
    pub company: &'static [Source],
    pub position: &'static [Source],
    pub location: &'static [Source],
    pub salary: &'static [Source],
    pub job_description: &'static [Source],
}

use Source::*;

pub static SITES: &[SiteRules] = &[
    SiteRules {
        name: "linkedin",
        host: "linkedin.com",
        company: &[
            Css(".job-details-jobs-unified-top-card__company-name a"),
            Css(".job-details-jobs-unified-top-card__company-name"),
        ],
        position: &[
            Css(".job-details-jobs-unified-top-card__job-title h1"),
            Css(".job-details-jobs-unified-top-card__job-title"),
        ],
        location: &[
            Css(".job-details-jobs-unified-top-card__bullet"),
            Css(".job-details-jobs-unified-top-card__primary-description-text"),
        ],
        salary: &[SalaryInText],
        job_description: &[
            Css(".job-details-jobs-unified-top-card__job-description"),
            Css(".jobs-description-content__text"),
        ],
    },
    SiteRules {
        name: "indeed",
        host: "indeed.com",
        company: &[
            Css(r#"[data-testid="inlineHeader-companyName"] a"#),
            Css(r#"[data-testid="inlineHeader-companyName"]"#),
        ],
        position: &[
            Css(r#"[data-testid="jobsearch-JobInfoHeader-title"]"#),
            Css(r#"h1[data-testid="jobsearch-JobInfoHeader-title"]"#),
        ],
        location: &[
            Css(r#"[data-testid="job-location"]"#),
            Css(r#"[data-testid="inlineHeader-companyLocation"]"#),
        ],
        salary: &[
            Css(r#"[data-testid="jobsearch-JobMetadataHeader-item"]"#),
            SalaryInText,
        ],
        job_description: &[
            Css("#jobDescriptionText"),
            Css(r#"[data-testid="jobsearch-jobDescriptionText"]"#),
        ],
    },
    SiteRules {
        name: "glassdoor",
        host: "glassdoor.com",
        company: &[Css(r#"[data-test="employer-name"]"#), Css(".employerName")],
        position: &[Css(r#"[data-test="job-title"]"#), Css(".jobTitle")],
        location: &[Css(r#"[data-test="job-location"]"#), Css(".location")],
        salary: &[Css(r#"[data-test="detailSalary"]"#), SalaryInText],
        job_description: &[
            Css(r#"[data-test="jobDescriptionContainer"]"#),
            Css(".jobDescriptionContent"),
        ],
    },
    SiteRules {
        name: "lever",
        host: "lever.co",
        company: &[Css(".company-name"), TitleSegment(1)],
        position: &[Css(".posting-headline h2"), Css("h2")],
        location: &[Css(".location"), Css(".posting-categories .location")],
        salary: &[SalaryInText],
        job_description: &[Css(".posting-requirements"), Css(".posting-description")],
    },
    SiteRules {
        name: "greenhouse",
        host: "greenhouse.io",
        company: &[Css("#header .company-name"), TitleSegment(1)],
        position: &[Css("#header h1"), Css("h1")],
        location: &[Css("#header .location"), Css(".location")],
        salary: &[SalaryInText],
        job_description: &[
            Css("#content .application-description"),
            Css(".job-post-description"),
        ],
    },
    SiteRules {
        name: "google_careers",
        host: "careers.google.com",
        company: &[Constant("Google")],
        position: &[Css("h1"), Css(r#"[data-test-id="job-title"]"#)],
        location: &[Css(r#"[data-test-id="job-location"]"#), LocationInText],
        salary: &[SalaryInText],
        job_description: &[
            Css(r#"[data-test-id="job-description"]"#),
            Css(".job-description"),
        ],
    },
    SiteRules {
        name: "microsoft_careers",
        host: "careers.microsoft.com",
        company: &[Constant("Microsoft")],
        position: &[Css("h1"), Css(".job-title")],
        location: &[Css(".job-location"), LocationInText],
        salary: &[SalaryInText],
        job_description: &[
            Css(".job-description"),
            Css(r#"[data-automation-id="jobPostingDescription"]"#),
        ],
    },
];

/// The rules whose host fragment appears in `host`, in table order.
pub fn site_for_host(host: &str) -> Option<&'static SiteRules> {
    let host = host.to_ascii_lowercase();
    SITES.iter().find(|site| host.contains(site.host))
}

impl SiteRules {
    pub(crate) fn extract(&self, page: &dyn PageDom) -> Result<ExtractedJobData, ExtractionError> {
        Ok(ExtractedJobData {
            company: first_value(self.company, page)?,
            position: first_value(self.position, page)?,
            location: first_value(self.location, page)?,
            salary: first_value(self.salary, page)?,
            job_description: first_value(self.job_description, page)?,
        })
    }
}

fn first_value(sources: &[Source], page: &dyn PageDom) -> Result<String, ExtractionError> {
    for source in sources {
        let value = match source {
            Css(selector) => page.select_text(selector)?,
            Constant(value) => Some(value.to_string()),
            TitleSegment(index) => page
                .title()
                .split(" - ")
                .nth(*index)
                .map(|segment| segment.trim().to_string()),
            SalaryInText => salary_in_text(page.visible_text()),
            LocationInText => location_in_text(page.visible_text()),
        };
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            return Ok(value);
        }
    }
    Ok(String::new())
}
