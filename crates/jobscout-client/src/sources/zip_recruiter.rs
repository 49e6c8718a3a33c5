use jobscout_core::error::AppError;
use jobscout_core::models::{RawJob, SourceQuery};
use scraper::Html;

use super::{Site, absolutize, first_attr, first_text, non_empty, selector, with_params};

const ORIGIN: &str = "https://www.ziprecruiter.com";

/// Listings shown per results page.
const PAGE_SIZE: u32 = 20;

pub struct ZipRecruiter;

impl Site for ZipRecruiter {
    const ID: &'static str = "zip_recruiter";

    fn search_url(query: &SourceQuery) -> Result<String, AppError> {
        let page = if query.offset > 0 {
            (query.offset / PAGE_SIZE + 1).to_string()
        } else {
            String::new()
        };
        with_params(
            &format!("{ORIGIN}/candidate/search"),
            &[
                ("search", query.search_term.clone()),
                ("location", query.location.clone()),
                ("page", page),
            ],
        )
    }

    fn parse(html: &str, _query: &SourceQuery) -> Result<Vec<RawJob>, AppError> {
        let document = Html::parse_document(html);

        let card = selector("article.job_result")?;
        let title = selector("a.just_job_title")?;
        let company = selector(".t_org_link")?;
        let location = selector(".t_location")?;
        let link = selector("a.result_job_link")?;
        let time = selector("time")?;
        let salary = selector(".salary")?;
        let salary_alt = selector(".t_salary")?;
        let snippet = selector(".job_snippet")?;

        let jobs = document
            .select(&card)
            .map(|el| RawJob {
                title: first_text(el, &title),
                company: first_text(el, &company),
                location: first_text(el, &location),
                site: Self::ID.to_string(),
                job_url: absolutize(ORIGIN, &first_attr(el, &link, "href")),
                date_posted: first_attr(el, &time, "datetime"),
                description: first_text(el, &snippet),
                salary_text: non_empty(first_text(el, &salary))
                    .or_else(|| non_empty(first_text(el, &salary_alt))),
                ..RawJob::default()
            })
            .filter(|job| !job.title.is_empty())
            .collect();

        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_maps_to_page_number() {
        let mut q = SourceQuery {
            search_term: "nurse".into(),
            location: "Ohio".into(),
            ..SourceQuery::default()
        };
        assert_eq!(
            ZipRecruiter::search_url(&q).unwrap(),
            "https://www.ziprecruiter.com/candidate/search?search=nurse&location=Ohio"
        );
        q.offset = 45;
        assert!(ZipRecruiter::search_url(&q).unwrap().ends_with("&page=3"));
    }

    #[test]
    fn parses_job_results() {
        let html = r#"
            <article class="job_result">
              <a class="just_job_title">Registered Nurse</a>
              <a class="t_org_link">City Hospital</a>
              <span class="t_location">Columbus, OH</span>
              <a class="result_job_link" href="/c/City-Hospital/Job/Nurse/-in-Columbus,OH?jid=7"></a>
              <time datetime="2024-03-01">1 week ago</time>
              <span class="t_salary">$38 to $45 per hour</span>
              <p class="job_snippet">Night shifts.</p>
            </article>
        "#;
        let jobs = ZipRecruiter::parse(html, &SourceQuery::default()).unwrap();
        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.title, "Registered Nurse");
        assert_eq!(job.company, "City Hospital");
        assert_eq!(job.date_posted, "2024-03-01");
        assert_eq!(job.salary_text.as_deref(), Some("$38 to $45 per hour"));
        assert!(job.job_url.starts_with("https://www.ziprecruiter.com/c/City-Hospital/"));
        assert_eq!(job.site, "zip_recruiter");
    }
}
