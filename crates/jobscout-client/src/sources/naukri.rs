use jobscout_core::error::AppError;
use jobscout_core::models::{RawJob, SourceQuery};
use scraper::Html;

use super::{Site, absolutize, first_attr, first_text, selector};

const ORIGIN: &str = "https://www.naukri.com";

/// Naukri. Search terms live in the path, not the query string.
pub struct Naukri;

fn slug(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("-")
}

impl Site for Naukri {
    const ID: &'static str = "naukri";
    const ACCEPT_LANGUAGE: &'static str = "en-IN,en;q=0.9";

    fn search_url(query: &SourceQuery) -> Result<String, AppError> {
        let term = slug(&query.search_term);
        let loc = slug(&query.location);
        let path = match (term.is_empty(), loc.is_empty()) {
            (false, false) => format!("{term}-jobs-in-{loc}"),
            (false, true) => format!("{term}-jobs"),
            (true, false) => format!("jobs-in-{loc}"),
            (true, true) => {
                return Err(AppError::InvalidArgument(
                    "naukri needs a search term or a location".into(),
                ));
            }
        };
        url::Url::parse(ORIGIN)
            .and_then(|base| base.join(&path))
            .map(|u| u.to_string())
            .map_err(|e| AppError::ParseError(format!("Invalid search path '{path}': {e}")))
    }

    fn parse(html: &str, _query: &SourceQuery) -> Result<Vec<RawJob>, AppError> {
        let document = Html::parse_document(html);

        let card = selector("article.jobTuple")?;
        let title = selector("a.title")?;
        let company = selector("a.subTitle")?;
        let location = selector("li.location")?;
        let description = selector("div.job-description")?;

        let jobs = document
            .select(&card)
            .map(|el| RawJob {
                title: first_text(el, &title),
                company: first_text(el, &company),
                location: first_text(el, &location),
                site: Self::ID.to_string(),
                job_url: absolutize(ORIGIN, &first_attr(el, &title, "href")),
                description: first_text(el, &description),
                ..RawJob::default()
            })
            .filter(|job| !job.title.is_empty() && !job.job_url.is_empty())
            .collect();

        Ok(jobs)
    }
}
