//! Keyword heuristics for fields a source left unresolved.
//!
//! These are best-effort: they scan lower-cased title, location and
//! description text and return `None` when nothing matches.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::JobType;

/// Maximum description length, in characters.
pub const DESCRIPTION_LIMIT: usize = 280;

static REMOTE_POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)remote|удалён|удален|home|wfh|work\s*from\s*home").expect("valid regex")
});
static REMOTE_NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)onsite|on[-\s]?site|офис|гибрид|hybrid").expect("valid regex")
});

/// Job-type patterns in priority order; the first match wins.
static JOB_TYPE_PATTERNS: LazyLock<Vec<(JobType, Regex)>> = LazyLock::new(|| {
    [
        (JobType::Internship, r"(?i)intern(ship)?|стаж"),
        (JobType::Contract, r"(?i)contract|контракт"),
        (JobType::PartTime, r"(?i)part[-\s]?time|непол"),
        (JobType::FullTime, r"(?i)full[-\s]?time|полный"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("valid regex")))
    .collect()
});

/// Cut `text` to at most [`DESCRIPTION_LIMIT`] characters.
pub fn truncate_description(text: &str) -> String {
    text.trim().chars().take(DESCRIPTION_LIMIT).collect()
}

/// The text heuristics run over: title, location and description, lower-cased.
pub fn inference_text(title: &str, location: &str, description: &str) -> String {
    format!("{title} {location} {description}").to_lowercase()
}

/// `Some(true)` for remote wording, `Some(false)` for onsite/hybrid wording.
///
/// Remote wording is checked first, so "remote or hybrid" resolves remote.
pub fn infer_remote(text: &str) -> Option<bool> {
    if REMOTE_POSITIVE.is_match(text) {
        Some(true)
    } else if REMOTE_NEGATIVE.is_match(text) {
        Some(false)
    } else {
        None
    }
}

pub fn infer_job_type(text: &str) -> Option<JobType> {
    JOB_TYPE_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(kind, _)| *kind)
}

/// Display label for a resolved remote flag.
pub fn remote_label(remote: Option<bool>) -> &'static str {
    match remote {
        Some(true) => "Remote",
        Some(false) => "Office/Hybrid",
        None => crate::models::PLACEHOLDER,
    }
}
