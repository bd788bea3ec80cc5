use crate::error::{Error, Result};

/// Mailbox sequence number as returned by SEARCH.
pub type MessageId = u32;

pub const MAX_RESULTS_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    keyword: String,
    max_results: usize,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>, max_results: usize) -> Result<Self> {
        let keyword = keyword.into();
        if max_results == 0 {
            return Err(Error::InvalidQuery(
                "maxResults must be at least 1".to_string(),
            ));
        }
        // CR/LF would terminate the IMAP command line early
        if keyword.contains(['\r', '\n']) {
            return Err(Error::InvalidQuery(
                "keyword must not contain line breaks".to_string(),
            ));
        }
        // quoted IMAP strings are 7-bit; 8-bit text would need a literal
        if !keyword.is_ascii() {
            return Err(Error::InvalidQuery(
                "keyword must be ASCII".to_string(),
            ));
        }
        Ok(Self {
            keyword,
            max_results,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    /// Raw `Date` header value, never reparsed.
    pub date: String,
    pub body: String,
}

/// Terminal output of the pipeline: one per fetched message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub subject: String,
    pub date: String,
    pub outcome: Result<String>,
}

impl SummaryResult {
    pub fn summary(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    pub fn error(&self) -> Option<&Error> {
        self.outcome.as_ref().err()
    }
}
