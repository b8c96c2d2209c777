use futures::stream::{self, StreamExt};

use crate::models::Candidate;
use crate::services::github_service::UserSource;

pub const SEARCH_PAGES: u32 = 3;
pub const RESULTS_PER_PAGE: u32 = 100;
pub const TOP_LIMIT: usize = 300;

/// Cap on in-flight repository-count lookups. One request per candidate with
/// no limit would mean up to 300 simultaneous calls against the API.
const LOOKUP_CONCURRENCY: usize = 10;

/// Outcome of one aggregation run. The failure counts let callers tell an
/// upstream outage apart from a genuinely empty result set.
#[derive(Debug, Default)]
pub struct RankingReport {
    pub candidates: Vec<Candidate>,
    pub failed_pages: usize,
    pub failed_lookups: usize,
}

impl RankingReport {
    /// True when every search page failed and nothing was ranked.
    pub fn upstream_outage(&self) -> bool {
        self.failed_pages == SEARCH_PAGES as usize && self.candidates.is_empty()
    }
}

/// Ranks users for a location by public repository count: three search pages,
/// one detail lookup per entry, stable descending sort, top 300. Failures are
/// absorbed into the report; this never returns an error.
pub async fn rank_top_users<S: UserSource>(source: &S, location: &str) -> RankingReport {
    let mut report = RankingReport::default();

    // Pages are fetched one at a time; a failed page contributes no entries.
    let mut entries = Vec::new();
    for page in 1..=SEARCH_PAGES {
        match source.search_users_page(location, page, RESULTS_PER_PAGE).await {
            Ok(items) => entries.extend(items),
            Err(e) => {
                log::error!("❌ Failed to fetch search page {}: {}", page, e);
                report.failed_pages += 1;
            }
        }
    }

    // TODO: dedup logins before the lookups. The search snapshot can shift
    // between page requests, so one user can appear on two pages and then
    // rank twice.
    log::info!(
        "📄 {} search entries collected for location '{}'",
        entries.len(),
        location
    );

    // `buffered` caps the in-flight lookups and yields in input order, which
    // is what keeps the tie-break below stable.
    let results: Vec<_> = stream::iter(entries)
        .map(|user| async move {
            let count = source.fetch_repo_count(&user.login).await;
            (user, count)
        })
        .buffered(LOOKUP_CONCURRENCY)
        .collect()
        .await;

    let mut candidates = Vec::with_capacity(results.len());
    for (user, count) in results {
        let repositories_count = match count {
            Ok(n) => n,
            Err(e) => {
                log::error!(
                    "❌ Failed to fetch repository count for user {}: {}",
                    user.login,
                    e
                );
                report.failed_lookups += 1;
                0
            }
        };
        candidates.push(Candidate {
            login: user.login,
            avatar_url: user.avatar_url,
            html_url: user.html_url,
            repositories_count,
        });
    }

    // sort_by is stable: equal counts keep their encounter order
    candidates.sort_by(|a, b| b.repositories_count.cmp(&a.repositories_count));
    candidates.truncate(TOP_LIMIT);

    log::info!(
        "🏆 Ranked {} users for location '{}' ({} pages failed, {} lookups failed)",
        candidates.len(),
        location,
        report.failed_pages,
        report.failed_lookups
    );

    report.candidates = candidates;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::github_service::{SearchUser, UserSource};
    use crate::utils::error::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeSource {
        pages: HashMap<u32, Vec<SearchUser>>,
        counts: HashMap<String, u32>,
        failing_logins: Vec<String>,
        fail_all_pages: bool,
    }

    fn user(login: &str) -> SearchUser {
        SearchUser {
            login: login.to_string(),
            avatar_url: format!("https://avatars.example.com/{}", login),
            html_url: format!("https://github.com/{}", login),
        }
    }

    #[async_trait]
    impl UserSource for FakeSource {
        async fn search_users_page(
            &self,
            _location: &str,
            page: u32,
            _per_page: u32,
        ) -> Result<Vec<SearchUser>, FetchError> {
            if self.fail_all_pages {
                return Err(FetchError::Status(503));
            }
            Ok(self.pages.get(&page).cloned().unwrap_or_default())
        }

        async fn fetch_repo_count(&self, login: &str) -> Result<u32, FetchError> {
            if self.failing_logins.iter().any(|l| l == login) {
                return Err(FetchError::Transport("connection reset".to_string()));
            }
            Ok(self.counts.get(login).copied().unwrap_or(0))
        }
    }

    #[tokio::test]
    async fn ranks_one_user_per_page_by_repo_count() {
        let mut source = FakeSource::default();
        source.pages.insert(1, vec![user("alice")]);
        source.pages.insert(2, vec![user("bob")]);
        source.pages.insert(3, vec![user("carol")]);
        source.counts.insert("alice".to_string(), 10);
        source.counts.insert("bob".to_string(), 50);
        source.counts.insert("carol".to_string(), 30);

        let report = rank_top_users(&source, "Sri Lanka").await;

        let logins: Vec<&str> = report
            .candidates
            .iter()
            .map(|c| c.login.as_str())
            .collect();
        assert_eq!(logins, vec!["bob", "carol", "alice"]);
        assert_eq!(report.candidates[0].repositories_count, 50);
        assert_eq!(report.candidates[1].repositories_count, 30);
        assert_eq!(report.candidates[2].repositories_count, 10);
        assert_eq!(report.failed_pages, 0);
        assert_eq!(report.failed_lookups, 0);
    }

    #[tokio::test]
    async fn all_pages_failing_yields_empty_outage_report() {
        let source = FakeSource {
            fail_all_pages: true,
            ..FakeSource::default()
        };

        let report = rank_top_users(&source, "Sri Lanka").await;

        assert!(report.candidates.is_empty());
        assert_eq!(report.failed_pages, SEARCH_PAGES as usize);
        assert!(report.upstream_outage());
    }

    #[tokio::test]
    async fn failed_lookup_keeps_candidate_with_zero_count() {
        let mut source = FakeSource::default();
        source.pages.insert(1, vec![user("alice"), user("bob")]);
        source.counts.insert("alice".to_string(), 7);
        source.failing_logins.push("bob".to_string());

        let report = rank_top_users(&source, "Sri Lanka").await;

        assert_eq!(report.candidates.len(), 2);
        assert_eq!(report.candidates[0].login, "alice");
        assert_eq!(report.candidates[1].login, "bob");
        assert_eq!(report.candidates[1].repositories_count, 0);
        assert_eq!(report.failed_lookups, 1);
        assert!(!report.upstream_outage());
    }

    #[tokio::test]
    async fn output_is_truncated_and_sorted_non_increasing() {
        let mut source = FakeSource::default();
        let mut page = Vec::new();
        for i in 0..320u32 {
            let login = format!("user{}", i);
            source.counts.insert(login.clone(), i);
            page.push(user(&login));
        }
        source.pages.insert(1, page);

        let report = rank_top_users(&source, "Sri Lanka").await;

        assert_eq!(report.candidates.len(), TOP_LIMIT);
        assert_eq!(report.candidates[0].repositories_count, 319);
        assert!(report
            .candidates
            .windows(2)
            .all(|w| w[0].repositories_count >= w[1].repositories_count));
    }

    #[tokio::test]
    async fn equal_counts_keep_first_appearance_order() {
        let mut source = FakeSource::default();
        source.pages.insert(1, vec![user("first"), user("second")]);
        source.pages.insert(2, vec![user("third")]);
        source.counts.insert("first".to_string(), 5);
        source.counts.insert("second".to_string(), 5);
        source.counts.insert("third".to_string(), 5);

        let report = rank_top_users(&source, "Sri Lanka").await;

        let logins: Vec<&str> = report
            .candidates
            .iter()
            .map(|c| c.login.as_str())
            .collect();
        assert_eq!(logins, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn duplicate_login_across_pages_is_ranked_twice() {
        // Cross-page duplicates are not collapsed; see the TODO above.
        let mut source = FakeSource::default();
        source.pages.insert(1, vec![user("alice")]);
        source.pages.insert(2, vec![user("alice")]);
        source.counts.insert("alice".to_string(), 12);

        let report = rank_top_users(&source, "Sri Lanka").await;

        assert_eq!(report.candidates.len(), 2);
        assert!(report.candidates.iter().all(|c| c.login == "alice"));
    }
}
