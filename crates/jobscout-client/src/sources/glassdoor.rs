use jobscout_core::error::AppError;
use jobscout_core::models::{RawJob, SourceQuery};
use scraper::{ElementRef, Html};

use super::{Site, absolutize, first_attr, first_text, selector, text, with_params};

const ORIGIN: &str = "https://www.glassdoor.com";

/// Glassdoor. Two known layouts: listing cards, and bare `data-test` links.
pub struct Glassdoor;

impl Site for Glassdoor {
    const ID: &'static str = "glassdoor";

    fn search_url(query: &SourceQuery) -> Result<String, AppError> {
        with_params(
            &format!("{ORIGIN}/Job/jobs.htm"),
            &[
                ("sc.keyword", query.search_term.clone()),
                ("locKeyword", query.location.clone()),
            ],
        )
    }

    fn parse(html: &str, _query: &SourceQuery) -> Result<Vec<RawJob>, AppError> {
        let document = Html::parse_document(html);

        let card = selector("li.react-job-listing, article.jobCard")?;
        let job_link = selector(r#"a.jobLink, a[href*="/partner/jobListing.htm"]"#)?;
        let any_link = selector("a")?;
        let employer = selector(".jobEmpolyerName, .employerName")?;
        let location = selector(".jobLocation, .location")?;
        let snippet = selector(".job-snippet, .jobDesc")?;

        let mut jobs: Vec<RawJob> = document
            .select(&card)
            .map(|el| {
                let mut title = first_text(el, &job_link);
                if title.is_empty() {
                    title = first_text(el, &any_link);
                }
                RawJob {
                    title,
                    company: first_text(el, &employer),
                    location: first_text(el, &location),
                    site: Self::ID.to_string(),
                    job_url: absolutize(ORIGIN, &first_attr(el, &job_link, "href")),
                    description: first_text(el, &snippet),
                    ..RawJob::default()
                }
            })
            .filter(|job| !job.title.is_empty())
            .collect();

        if jobs.is_empty() {
            let data_link = selector(r#"a[data-test="job-link"]"#)?;
            let short_employer = selector(r#"[data-test="employer-short-name"], .employerName"#)?;
            let header_location = selector(r#"[data-test="header-location"], .jobLocation"#)?;

            jobs = document
                .select(&data_link)
                .filter_map(|a| {
                    let title = text(a);
                    let job_url = absolutize(ORIGIN, a.value().attr("href").unwrap_or_default());
                    if title.is_empty() || job_url.is_empty() {
                        return None;
                    }
                    let container = enclosing_card(a);
                    Some(RawJob {
                        title,
                        company: container
                            .map(|c| first_text(c, &short_employer))
                            .unwrap_or_default(),
                        location: container
                            .map(|c| first_text(c, &header_location))
                            .unwrap_or_default(),
                        site: Self::ID.to_string(),
                        job_url,
                        ..RawJob::default()
                    })
                })
                .collect();
        }

        Ok(jobs)
    }
}

/// Nearest `li`, `article` or `div` around a link.
fn enclosing_card(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| matches!(a.value().name(), "li" | "article" | "div"))
}
