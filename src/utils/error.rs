use std::fmt;

/// Failure classes for upstream GitHub calls. The aggregator counts these
/// instead of aborting, so a caller can tell an outage from an empty result.
#[derive(Debug)]
pub enum FetchError {
    Transport(String),
    Status(u16),
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "Transport error: {}", msg),
            FetchError::Status(code) => write!(f, "Upstream API error: HTTP {}", code),
            FetchError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}
