//! Error types for the fetch-classify-render pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, MilestoneError>;

/// Everything that can end a fetch-render cycle.
///
/// None of these are retried. The `Display` text is the message shown to the user.
#[derive(Debug, Error)]
pub enum MilestoneError {
    /// Missing owner/repository name or an unusable destination path
    #[error("{0}")]
    Input(String),

    /// The primary repository lookup answered 404
    #[error("Repository not found.")]
    NotFound,

    /// Any of the GitHub calls answered 403
    #[error("GitHub API rate limit reached. Please try again later.")]
    RateLimited,

    /// The primary repository lookup answered with some other non-200 status
    #[error("Failed to fetch data from GitHub. Status code: {0}")]
    Upstream(u16),

    /// Connection, DNS, timeout or body read failure
    #[error("Network error: {0}")]
    Network(String),

    /// GitHub answered with a body that is not JSON
    #[error("Unexpected response from GitHub: {0}")]
    MalformedResponse(String),

    /// Drawing or writing the chart failed
    #[error("Failed to render chart: {0}")]
    Render(String),
}

impl MilestoneError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub fn render(message: impl std::fmt::Display) -> Self {
        Self::Render(message.to_string())
    }
}
