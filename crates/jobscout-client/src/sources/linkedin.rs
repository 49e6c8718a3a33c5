use jobscout_core::error::AppError;
use jobscout_core::models::{RawJob, SourceQuery};
use scraper::Html;

use super::{Site, first_attr, first_text, selector, with_params};

/// LinkedIn public job search.
pub struct LinkedIn;

impl Site for LinkedIn {
    const ID: &'static str = "linkedin";

    fn search_url(query: &SourceQuery) -> Result<String, AppError> {
        let start = if query.offset > 0 {
            query.offset.to_string()
        } else {
            String::new()
        };
        with_params(
            "https://www.linkedin.com/jobs/search/",
            &[
                ("keywords", query.search_term.clone()),
                ("location", query.location.clone()),
                ("start", start),
            ],
        )
    }

    fn parse(html: &str, _query: &SourceQuery) -> Result<Vec<RawJob>, AppError> {
        let document = Html::parse_document(html);

        let card = selector("li div.base-card")?;
        let title = selector("h3.base-search-card__title")?;
        let company = selector("h4.base-search-card__subtitle")?;
        let location = selector("span.job-search-card__location")?;
        let link = selector("a.base-card__full-link")?;
        let time = selector("time")?;
        let snippet = selector("p.job-card-container__snippet")?;

        let mut jobs: Vec<RawJob> = document
            .select(&card)
            .map(|el| RawJob {
                title: first_text(el, &title),
                company: first_text(el, &company),
                location: first_text(el, &location),
                site: Self::ID.to_string(),
                job_url: first_attr(el, &link, "href"),
                date_posted: first_attr(el, &time, "datetime"),
                description: first_text(el, &snippet),
                ..RawJob::default()
            })
            .filter(|job| !job.title.is_empty())
            .collect();

        if jobs.is_empty() {
            let item = selector("li.jobs-search-results__list-item")?;
            let heading = selector("h3")?;
            let subtitle = selector(".base-search-card__subtitle")?;
            let any_location = selector(".job-search-card__location")?;

            jobs = document
                .select(&item)
                .map(|el| {
                    let mut name = first_text(el, &link);
                    if name.is_empty() {
                        name = first_text(el, &heading);
                    }
                    RawJob {
                        title: name,
                        company: first_text(el, &subtitle),
                        location: first_text(el, &any_location),
                        site: Self::ID.to_string(),
                        job_url: first_attr(el, &link, "href"),
                        date_posted: first_attr(el, &time, "datetime"),
                        ..RawJob::default()
                    }
                })
                .filter(|job| !job.title.is_empty() && !job.job_url.is_empty())
                .collect();
        }

        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_url() {
        let q = SourceQuery {
            search_term: "platform engineer".into(),
            location: "London".into(),
            offset: 25,
            ..SourceQuery::default()
        };
        assert_eq!(
            LinkedIn::search_url(&q).unwrap(),
            "https://www.linkedin.com/jobs/search/?keywords=platform+engineer&location=London&start=25"
        );
    }

    #[test]
    fn parses_base_cards() {
        let html = r#"
            <ul><li>
              <div class="base-card">
                <a class="base-card__full-link" href="https://uk.linkedin.com/jobs/view/platform-engineer-42?trk=x"></a>
                <h3 class="base-search-card__title"> Platform Engineer </h3>
                <h4 class="base-search-card__subtitle">Umbrella</h4>
                <span class="job-search-card__location">London, England</span>
                <time datetime="2024-03-08">2 days ago</time>
              </div>
            </li></ul>
        "#;
        let jobs = LinkedIn::parse(html, &SourceQuery::default()).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Platform Engineer");
        assert_eq!(jobs[0].company, "Umbrella");
        assert_eq!(jobs[0].date_posted, "2024-03-08");
        assert!(jobs[0].job_url.contains("platform-engineer-42"));
    }

    #[test]
    fn falls_back_to_list_items() {
        let html = r#"
            <ul>
              <li class="jobs-search-results__list-item">
                <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/7">SRE</a>
                <span class="base-search-card__subtitle">Hooli</span>
              </li>
              <li class="jobs-search-results__list-item"><h3>No link</h3></li>
            </ul>
        "#;
        let jobs = LinkedIn::parse(html, &SourceQuery::default()).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "SRE");
        assert_eq!(jobs[0].company, "Hooli");
    }
}
