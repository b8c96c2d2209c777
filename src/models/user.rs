use serde::{Deserialize, Serialize};

/// Persisted ranking entry, keyed by GitHub username.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct StoredUser {
    pub username: String,
    pub avatar_url: String,
    pub html_url: String,
    pub repositories_count: u32,
}

/// Transient ranked entry produced by one aggregation run.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    pub repositories_count: u32,
}
