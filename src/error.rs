//! Error taxonomy for the fetch-and-summarize pipeline.

/// Every failure the pipeline can report.
///
/// Causes are carried as strings so a value can be cloned into a
/// per-message [`SummaryResult`](crate::domain::email::SummaryResult).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("missing credential: {field} is absent or empty")]
    MissingCredential { field: &'static str },

    #[error("invalid search query: {0}")]
    InvalidQuery(String),

    #[error("could not connect to mailbox host: {0}")]
    ConnectionFailure(String),

    #[error("mailbox authentication failed: {0}")]
    AuthenticationFailure(String),

    #[error("mailbox search failed: {0}")]
    SearchFailure(String),

    #[error("summarization rate limit exceeded")]
    RateLimitExceeded,

    #[error("summarization API error: {0}")]
    ApiError(String),
}

impl Error {
    /// Batch-fatal errors abort the whole run; the rest stay local to one message.
    pub fn is_batch_fatal(&self) -> bool {
        !matches!(self, Error::RateLimitExceeded | Error::ApiError(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
