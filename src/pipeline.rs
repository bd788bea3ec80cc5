//! Fetch-and-summarize orchestration.
//!
//! Credential, connection, auth and search failures abort the run. A failed
//! summary only marks its own message and the run continues with the next.

use crate::credentials::{Credentials, RawCredentials};
use crate::domain::email::{SearchQuery, SummaryResult};
use crate::error::Result;
use crate::llm::summarizer::{CompletionBackend, Sleeper, Summarizer};
use crate::mail::imap_client::{MailboxConnector, fetch_messages};

pub struct Pipeline<'a, B, S> {
    connector: &'a dyn MailboxConnector,
    summarizer: &'a Summarizer<B, S>,
}

impl<'a, B: CompletionBackend, S: Sleeper> Pipeline<'a, B, S> {
    pub fn new(connector: &'a dyn MailboxConnector, summarizer: &'a Summarizer<B, S>) -> Self {
        Self {
            connector,
            summarizer,
        }
    }

    /// Summarize up to `max_results` of the newest messages whose subject contains `keyword`.
    ///
    /// Results are ordered newest first. The mailbox session is closed before
    /// summarization starts.
    pub fn run(
        &self,
        raw: &RawCredentials,
        keyword: &str,
        max_results: usize,
    ) -> Result<Vec<SummaryResult>> {
        let credentials = Credentials::validate(raw)?;
        let query = SearchQuery::new(keyword, max_results)?;

        let messages = fetch_messages(self.connector, &credentials, &query)?;
        if messages.is_empty() {
            log::info!("no messages match {:?}", query.keyword());
            return Ok(vec![]);
        }

        let results = messages
            .into_iter()
            .map(|m| {
                let outcome = self.summarizer.summarize(&credentials, &m.subject, &m.body);
                if let Err(e) = &outcome {
                    log::warn!("could not summarize {:?}: {e}", m.subject);
                }
                SummaryResult {
                    subject: m.subject,
                    date: m.date,
                    outcome,
                }
            })
            .collect();
        Ok(results)
    }
}
