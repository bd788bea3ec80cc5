use native_tls::TlsConnector;
use secrecy::ExposeSecret;

use crate::credentials::Credentials;
use crate::domain::email::{EmailMessage, MessageId, SearchQuery};
use crate::error::{Error, Result};
use crate::mail::parser;

type TlsSession = imap::Session<native_tls::TlsStream<std::net::TcpStream>>;

/// Full message without setting `\Seen`.
pub const FETCH_ITEMS: &str = "BODY.PEEK[]";

/// One authenticated mailbox session. Not shared between runs.
pub trait MailboxSession {
    /// Select INBOX and search by subject; ids come back ascending.
    fn search(&mut self, keyword: &str) -> Result<Vec<MessageId>>;
    fn fetch_raw(&mut self, id: MessageId) -> Result<Vec<u8>>;
    fn close(&mut self) -> Result<()>;
}

pub trait MailboxConnector {
    fn open(&self, credentials: &Credentials) -> Result<Box<dyn MailboxSession>>;
}

/// Owns a session and logs it out exactly once, on `close` or on drop.
pub struct SessionGuard {
    session: Box<dyn MailboxSession>,
    closed: bool,
}

impl SessionGuard {
    pub fn new(session: Box<dyn MailboxSession>) -> Self {
        Self {
            session,
            closed: false,
        }
    }

    pub fn search(&mut self, keyword: &str) -> Result<Vec<MessageId>> {
        self.session.search(keyword)
    }

    pub fn fetch_raw(&mut self, id: MessageId) -> Result<Vec<u8>> {
        self.session.fetch_raw(id)
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.session.close() {
            log::warn!("mailbox logout failed: {e}");
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Keep the last `max_results` ids of an ascending list, newest first.
///
/// "Newest" means highest id returned by search; the Date header is not consulted.
pub fn select_recent(ids: &[MessageId], max_results: usize) -> Vec<MessageId> {
    let start = ids.len().saturating_sub(max_results);
    ids[start..].iter().rev().copied().collect()
}

/// Open a session, search, fetch and parse up to `max_results` messages.
///
/// The session is released on every path out of this function.
pub fn fetch_messages(
    connector: &dyn MailboxConnector,
    credentials: &Credentials,
    query: &SearchQuery,
) -> Result<Vec<EmailMessage>> {
    let mut session = SessionGuard::new(connector.open(credentials)?);

    let ids = session.search(query.keyword())?;
    log::info!("{} message(s) match {:?}", ids.len(), query.keyword());
    if ids.is_empty() {
        session.close();
        return Ok(vec![]);
    }

    let recent = select_recent(&ids, query.max_results());
    log::debug!("fetching ids {:?}", recent);

    let mut out = Vec::with_capacity(recent.len());
    for id in recent {
        let raw = session.fetch_raw(id)?;
        out.push(parser::parse(&raw));
    }

    session.close();
    Ok(out)
}

/// Quote a keyword for an IMAP SEARCH SUBJECT criterion.
///
/// Only ASCII keywords reach here; `SearchQuery` rejects anything else.
pub fn build_search_query(keyword: &str) -> String {
    let escaped = keyword.replace('\\', "\\\\").replace('"', "\\\"");
    format!("SUBJECT \"{escaped}\"")
}

pub struct ImapClient {
    pub server: String,
    pub port: u16,
}

impl ImapClient {
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        Self {
            server: server.into(),
            port,
        }
    }
}

impl MailboxConnector for ImapClient {
    fn open(&self, credentials: &Credentials) -> Result<Box<dyn MailboxSession>> {
        log::info!("Connecting to {}:{}", self.server, self.port);
        let tls = TlsConnector::builder()
            .build()
            .map_err(|e| Error::ConnectionFailure(e.to_string()))?;
        let client = imap::connect(
            (self.server.as_str(), self.port),
            self.server.as_str(),
            &tls,
        )
        .map_err(|e| Error::ConnectionFailure(e.to_string()))?;

        let session = client
            .login(
                credentials.mailbox_address(),
                credentials.mailbox_secret().expose_secret(),
            )
            .map_err(|(e, _client)| Error::AuthenticationFailure(e.to_string()))?;

        Ok(Box::new(ImapSession { inner: session }))
    }
}

struct ImapSession {
    inner: TlsSession,
}

impl MailboxSession for ImapSession {
    fn search(&mut self, keyword: &str) -> Result<Vec<MessageId>> {
        self.inner
            .select("INBOX")
            .map_err(|e| Error::SearchFailure(format!("select INBOX: {e}")))?;

        // the crate hands back a set; order it so "last" means most recent
        let mut ids: Vec<MessageId> = self
            .inner
            .search(build_search_query(keyword))
            .map_err(|e| Error::SearchFailure(e.to_string()))?
            .into_iter()
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    fn fetch_raw(&mut self, id: MessageId) -> Result<Vec<u8>> {
        let fetches = self
            .inner
            .fetch(id.to_string(), FETCH_ITEMS)
            .map_err(|e| Error::SearchFailure(format!("fetch {id}: {e}")))?;
        fetches
            .iter()
            .next()
            .and_then(|f| f.body())
            .map(|b| b.to_vec())
            .ok_or_else(|| Error::SearchFailure(format!("message {id} returned no body")))
    }

    fn close(&mut self) -> Result<()> {
        self.inner
            .logout()
            .map_err(|e| Error::SearchFailure(format!("logout: {e}")))
    }
}
