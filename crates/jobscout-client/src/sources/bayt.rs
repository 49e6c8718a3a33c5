use jobscout_core::error::AppError;
use jobscout_core::models::{RawJob, SourceQuery};
use scraper::Html;

use super::{Site, absolutize, first_attr, first_text, selector, with_params};

const ORIGIN: &str = "https://www.bayt.com";

pub struct Bayt;

impl Site for Bayt {
    const ID: &'static str = "bayt";

    fn search_url(query: &SourceQuery) -> Result<String, AppError> {
        with_params(
            &format!("{ORIGIN}/en/jobs/"),
            &[
                ("q", query.search_term.clone()),
                ("l", query.location.clone()),
            ],
        )
    }

    fn parse(html: &str, _query: &SourceQuery) -> Result<Vec<RawJob>, AppError> {
        let document = Html::parse_document(html);

        let card = selector("div.has-pointer, div.card-content")?;
        let title = selector("h2 a, a.job-title")?;
        let company = selector("bdi, .company-name")?;
        let location = selector(".location, .job-location")?;
        let paragraph = selector("p")?;

        let jobs = document
            .select(&card)
            .map(|el| RawJob {
                title: first_text(el, &title),
                company: first_text(el, &company),
                location: first_text(el, &location),
                site: Self::ID.to_string(),
                job_url: absolutize(ORIGIN, &first_attr(el, &title, "href")),
                description: first_text(el, &paragraph),
                ..RawJob::default()
            })
            .filter(|job| !job.title.is_empty() && !job.job_url.is_empty())
            .collect();

        Ok(jobs)
    }
}
