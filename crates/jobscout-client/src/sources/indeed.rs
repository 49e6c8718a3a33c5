use jobscout_core::error::AppError;
use jobscout_core::models::{RawJob, SourceQuery};
use scraper::Html;

use super::{Site, absolutize, first_attr, first_text, non_empty, selector, with_params};

/// Indeed. The base host depends on the country code.
pub struct Indeed;

impl Indeed {
    /// Search origin for a country code; unknown codes use the US site.
    pub fn origin(country_code: &str) -> &'static str {
        match country_code {
            "uk" => "https://uk.indeed.com",
            "india" => "https://in.indeed.com",
            "germany" => "https://de.indeed.com",
            _ => "https://www.indeed.com",
        }
    }
}

impl Site for Indeed {
    const ID: &'static str = "indeed";

    fn search_url(query: &SourceQuery) -> Result<String, AppError> {
        let base = format!("{}/jobs", Self::origin(&query.country_code));
        let fromage = query
            .hours_old
            .filter(|h| *h > 0)
            .map(|h| h.clamp(1, 30).to_string())
            .unwrap_or_default();
        let start = if query.offset > 0 {
            query.offset.to_string()
        } else {
            String::new()
        };
        let radius = query
            .distance
            .filter(|d| *d > 0)
            .map(|d| d.to_string())
            .unwrap_or_default();

        with_params(
            &base,
            &[
                ("q", query.search_term.clone()),
                ("l", query.location.clone()),
                ("fromage", fromage),
                ("start", start),
                ("radius", radius),
            ],
        )
    }

    fn parse(html: &str, query: &SourceQuery) -> Result<Vec<RawJob>, AppError> {
        let origin = Self::origin(&query.country_code);
        let document = Html::parse_document(html);

        let card = selector("a.tapItem")?;
        let title = selector("h2.jobTitle")?;
        let company = selector(".companyName")?;
        let location = selector(".companyLocation")?;
        let date = selector(".date")?;
        let salary = selector(".salary-snippet-container, .salary-snippet")?;
        let snippet = selector(".job-snippet")?;

        let mut jobs: Vec<RawJob> = document
            .select(&card)
            .map(|el| RawJob {
                title: first_text(el, &title),
                company: first_text(el, &company),
                location: first_text(el, &location),
                site: Self::ID.to_string(),
                job_url: absolutize(origin, el.value().attr("href").unwrap_or_default()),
                date_posted: first_text(el, &date),
                description: first_text(el, &snippet),
                salary_text: non_empty(first_text(el, &salary)),
                ..RawJob::default()
            })
            .filter(|job| !job.title.is_empty())
            .collect();

        if jobs.is_empty() {
            let beacon = selector("div.job_seen_beacon")?;
            let link = selector("a")?;
            jobs = document
                .select(&beacon)
                .map(|el| RawJob {
                    title: first_text(el, &title),
                    company: first_text(el, &company),
                    location: first_text(el, &location),
                    site: Self::ID.to_string(),
                    job_url: absolutize(origin, &first_attr(el, &link, "href")),
                    date_posted: first_text(el, &date),
                    description: first_text(el, &snippet),
                    salary_text: non_empty(first_text(el, &salary)),
                    ..RawJob::default()
                })
                .filter(|job| !job.title.is_empty() && !job.job_url.is_empty())
                .collect();
        }

        Ok(jobs)
    }
}
