use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;

use crate::utils::error::FetchError;

const GITHUB_API_BASE: &str = "https://api.github.com";

/// One entry from a search results page.
#[derive(Debug, Deserialize, Clone)]
pub struct SearchUser {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<SearchUser>,
}

#[derive(Debug, Deserialize)]
struct UserDetail {
    public_repos: u32,
}

/// Source of candidate users and their repository counts. The aggregator
/// only talks to this trait, so tests can feed it an in-memory source.
#[async_trait]
pub trait UserSource: Send + Sync {
    async fn search_users_page(
        &self,
        location: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<SearchUser>, FetchError>;

    async fn fetch_repo_count(&self, login: &str) -> Result<u32, FetchError>;
}

/// GitHub REST client. Token comes in through the constructor, not the
/// environment.
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
}

impl GithubClient {
    pub fn new(token: &str) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        // GitHub rejects requests without a User-Agent
        headers.insert(USER_AGENT, HeaderValue::from_static("ranking-service"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| FetchError::Transport(format!("Invalid token value: {}", e)))?;
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: GITHUB_API_BASE.to_string(),
        })
    }
}

/// Search qualifier string, e.g. `location:"Sri Lanka" repos:>0 sort:repositories-desc`.
pub fn build_search_query(location: &str) -> String {
    format!("location:\"{}\" repos:>0 sort:repositories-desc", location)
}

#[async_trait]
impl UserSource for GithubClient {
    async fn search_users_page(
        &self,
        location: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<SearchUser>, FetchError> {
        log::info!("🔍 Fetching users by repositories, page {}...", page);

        let query = build_search_query(location);
        let url = format!(
            "{}/search/users?q={}&page={}&per_page={}",
            self.base_url,
            urlencoding::encode(&query),
            page,
            per_page
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let data: SearchResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        log::info!("✅ {} users fetched for page {}", data.items.len(), page);

        Ok(data.items)
    }

    async fn fetch_repo_count(&self, login: &str) -> Result<u32, FetchError> {
        let url = format!("{}/users/{}", self.base_url, login);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let user: UserDetail = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(user.public_repos)
    }
}
