//! Recognizes job posting URLs on known boards and career sites.

use std::sync::OnceLock;

use regex::RegexSet;

const JOB_POSTING_PATTERNS: &[&str] = &[
    r"linkedin\.com/jobs/view",
    r"indeed\.com/viewjob",
    r"glassdoor\.com/job-listing",
    r"jobs\.lever\.co",
    r"boards\.greenhouse\.io",
    r"jobs\.smartrecruiters\.com",
    r"careers\.google\.com",
    r"careers\.microsoft\.com",
    r"careers\.facebook\.com",
    r"careers\.apple\.com",
    r"jobs\.netflix\.com",
    r"amazon\.jobs",
    r"angel\.co/company",
    r"wellfound\.com/company",
    r"stackoverflow\.com/jobs",
    r"remote\.co/job",
    r"remoteok\.io/remote-jobs",
    r"weworkremotely\.com/remote-jobs",
    r"ziprecruiter\.com/jobs",
    r"monster\.com/job-openings",
];

fn patterns() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| RegexSet::new(JOB_POSTING_PATTERNS).expect("job posting patterns are valid"))
}

/// Whether `url` points at a job posting on a recognized site.
pub fn is_job_posting_url(url: &str) -> bool {
    !url.is_empty() && patterns().is_match(url)
}
