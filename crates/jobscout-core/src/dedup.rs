use std::collections::HashSet;

use crate::models::NormalizedJob;

/// Keep the first record per dedup key, in arrival order, up to `quota`.
///
/// Consumes the iterator lazily and stops pulling as soon as the quota is
/// met, so upstream normalization of the remaining records never runs.
pub fn assemble<I>(jobs: I, quota: usize) -> Vec<NormalizedJob>
where
    I: IntoIterator<Item = NormalizedJob>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(quota.min(64));
    if quota == 0 {
        return out;
    }
    for job in jobs {
        if seen.insert(job.dedup_key()) {
            out.push(job);
            if out.len() >= quota {
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PLACEHOLDER;

    fn job(title: &str, url: &str) -> NormalizedJob {
        NormalizedJob {
            title: title.into(),
            company: "Acme".into(),
            location: "Berlin".into(),
            site: "indeed".into(),
            date_posted: PLACEHOLDER.into(),
            job_type: None,
            remote: PLACEHOLDER.into(),
            remote_bool: None,
            salary: PLACEHOLDER.into(),
            min_amount: None,
            max_amount: None,
            currency: None,
            interval: None,
            job_url: url.into(),
            job_url_raw: url.into(),
            description: String::new(),
        }
    }

    #[test]
    fn keeps_first_seen() {
        let jobs = vec![
            job("a", "https://x.com/1"),
            job("b", "https://x.com/2"),
            job("c", "https://x.com/1"),
        ];
        let out = assemble(jobs, 10);
        let titles: Vec<_> = out.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, ["a", "b"]);
    }

    #[test]
    fn respects_quota_for_every_size() {
        let jobs: Vec<_> = (0..8)
            .map(|i| job("t", &format!("https://x.com/{}", i % 5)))
            .collect();
        for quota in 0..10 {
            let out = assemble(jobs.clone(), quota);
            assert!(out.len() <= quota);
            assert_eq!(out.len(), quota.min(5));
            let keys: HashSet<_> = out.iter().map(NormalizedJob::dedup_key).collect();
            assert_eq!(keys.len(), out.len());
        }
    }

    #[test]
    fn text_key_when_url_missing() {
        let jobs = vec![job("same", ""), job("same", ""), job("other", "")];
        assert_eq!(assemble(jobs, 10).len(), 2);
    }

    #[test]
    fn stops_pulling_after_quota() {
        let mut pulled = 0;
        let jobs = (0..100).map(|i| {
            pulled += 1;
            job("t", &format!("https://x.com/{i}"))
        });
        let out = assemble(jobs, 3);
        assert_eq!(out.len(), 3);
        assert_eq!(pulled, 3);
    }
}
