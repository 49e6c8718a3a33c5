use jobscout_core::error::AppError;
use jobscout_core::models::{RawJob, SourceQuery};
use scraper::Html;

use super::{Site, absolutize, first_attr, first_text, selector, text, with_params};

const ORIGIN: &str = "https://www.bdjobs.com";

pub struct BdJobs;

impl Site for BdJobs {
    const ID: &'static str = "bdjobs";

    fn search_url(query: &SourceQuery) -> Result<String, AppError> {
        with_params(
            &format!("{ORIGIN}/jobsearch.asp"),
            &[
                ("txtKeyword", query.search_term.clone()),
                ("l", query.location.clone()),
            ],
        )
    }

    fn parse(html: &str, _query: &SourceQuery) -> Result<Vec<RawJob>, AppError> {
        let document = Html::parse_document(html);

        let card = selector(".job-card")?;
        let link = selector("a")?;
        let company = selector(".company-name")?;
        let location = selector(".job-location")?;
        let paragraph = selector("p")?;

        let jobs = document
            .select(&card)
            .map(|el| RawJob {
                title: first_text(el, &link),
                company: first_text(el, &company),
                location: first_text(el, &location),
                site: Self::ID.to_string(),
                job_url: absolutize(ORIGIN, &first_attr(el, &link, "href")),
                description: el.select(&paragraph).map(text).collect::<Vec<_>>().join(" "),
                ..RawJob::default()
            })
            .filter(|job| !job.title.is_empty() && !job.job_url.is_empty())
            .collect();

        Ok(jobs)
    }
}
