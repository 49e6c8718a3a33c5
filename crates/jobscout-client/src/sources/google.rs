use jobscout_core::error::AppError;
use jobscout_core::models::{RawJob, SourceQuery};
use scraper::{ElementRef, Html};
use url::Url;

use super::{Site, first_text, selector, text, with_params};

const SEARCH: &str = "https://www.google.com/search";

/// Google web search for "<term> jobs in <location>".
///
/// Results carry no company; the location is the one searched for.
pub struct Google;

impl Site for Google {
    const ID: &'static str = "google";

    fn search_url(query: &SourceQuery) -> Result<String, AppError> {
        let mut q = Vec::new();
        if !query.search_term.is_empty() {
            q.push(query.search_term.clone());
        }
        q.push("jobs".to_string());
        if !query.location.is_empty() {
            q.push(format!("in {}", query.location));
        }
        with_params(SEARCH, &[("q", q.join(" "))])
    }

    fn parse(html: &str, query: &SourceQuery) -> Result<Vec<RawJob>, AppError> {
        let document = Html::parse_document(html);
        let result_link = selector("div.yuRUbf > a")?;
        let heading = selector("h3")?;

        let record = |title: String, href: &str| RawJob {
            title,
            location: query.location.clone(),
            site: Self::ID.to_string(),
            job_url: unwrap_redirect(href),
            ..RawJob::default()
        };

        let mut jobs: Vec<RawJob> = document
            .select(&result_link)
            .filter_map(|a| {
                let href = a.value().attr("href").filter(|h| !h.is_empty())?;
                let mut title = first_text(a, &heading);
                if title.is_empty() {
                    title = text(a);
                }
                Some(record(title, href))
            })
            .collect();

        if jobs.is_empty() {
            let result_heading = selector("div.g h3")?;
            jobs = document
                .select(&result_heading)
                .filter_map(|h| {
                    let href = enclosing_link(h)?
                        .value()
                        .attr("href")
                        .filter(|h| !h.is_empty())?;
                    Some(record(text(h), href))
                })
                .collect();
        }

        Ok(jobs)
    }
}

/// The target of a `/url?q=<target>&...` redirect; other links pass through.
pub fn unwrap_redirect(href: &str) -> String {
    if href.starts_with("/url?") {
        let target = Url::parse(SEARCH)
            .and_then(|base| base.join(href))
            .ok()
            .and_then(|url| {
                url.query_pairs()
                    .find(|(k, _)| k == "q")
                    .map(|(_, v)| v.into_owned())
            });
        if let Some(target) = target {
            return target;
        }
    }
    href.to_string()
}

fn enclosing_link(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "a")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> SourceQuery {
        SourceQuery {
            search_term: "rust".into(),
            location: "Berlin".into(),
            ..SourceQuery::default()
        }
    }

    #[test]
    fn builds_natural_language_query() {
        assert_eq!(
            Google::search_url(&query()).unwrap(),
            "https://www.google.com/search?q=rust+jobs+in+Berlin"
        );
        assert_eq!(
            Google::search_url(&SourceQuery::default()).unwrap(),
            "https://www.google.com/search?q=jobs"
        );
    }

    #[test]
    fn unwraps_redirects() {
        assert_eq!(
            unwrap_redirect("/url?q=https://jobs.example.com/a%3Fb%3D1&sa=U"),
            "https://jobs.example.com/a?b=1"
        );
        assert_eq!(unwrap_redirect("https://direct.com/x"), "https://direct.com/x");
    }

    #[test]
    fn parses_results_and_stamps_location() {
        let html = r#"
            <div class="yuRUbf"><a href="/url?q=https://careers.acme.com/rust&sa=U"><h3>Rust Developer - Acme</h3></a></div>
            <div class="yuRUbf"><a href="">Empty</a></div>
        "#;
        let jobs = Google::parse(html, &query()).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Rust Developer - Acme");
        assert_eq!(jobs[0].job_url, "https://careers.acme.com/rust");
        assert_eq!(jobs[0].location, "Berlin");
        assert_eq!(jobs[0].company, "");
    }

    #[test]
    fn falls_back_to_headings() {
        let html = r#"<div class="g"><a href="https://jobs.example.org/1"><h3>Systems Engineer</h3></a></div>"#;
        let jobs = Google::parse(html, &query()).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_url, "https://jobs.example.org/1");
    }
}
