//! In-memory mailbox used by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::credentials::Credentials;
use crate::domain::email::MessageId;
use crate::error::{Error, Result};
use crate::mail::imap_client::{MailboxConnector, MailboxSession};

#[derive(Default)]
struct State {
    // id = index + 1, like IMAP sequence numbers
    messages: Vec<(String, Vec<u8>)>,
    reject_login: bool,
    fail_search: bool,
    fail_fetch_of: Option<MessageId>,
    opens: usize,
    closes: usize,
    fetched: Vec<MessageId>,
}

#[derive(Clone, Default)]
pub struct FakeMailbox {
    state: Rc<RefCell<State>>,
}

impl FakeMailbox {
    pub fn with_subjects(subjects: &[&str]) -> Self {
        let mailbox = Self::default();
        for (i, subject) in subjects.iter().enumerate() {
            let raw = format!(
                "Subject: {subject}\r\nDate: Mon, {} Sep 2025 08:00:00 +0000\r\n\r\nBody of {subject}\r\n",
                i + 1
            );
            mailbox.push_raw(subject, raw.into_bytes());
        }
        mailbox
    }

    pub fn push_raw(&self, subject: &str, raw: Vec<u8>) {
        self.state
            .borrow_mut()
            .messages
            .push((subject.to_string(), raw));
    }

    pub fn reject_login(&self) {
        self.state.borrow_mut().reject_login = true;
    }

    pub fn fail_search(&self) {
        self.state.borrow_mut().fail_search = true;
    }

    pub fn fail_fetch_of(&self, id: MessageId) {
        self.state.borrow_mut().fail_fetch_of = Some(id);
    }

    pub fn opens(&self) -> usize {
        self.state.borrow().opens
    }

    pub fn closes(&self) -> usize {
        self.state.borrow().closes
    }

    pub fn open_sessions(&self) -> usize {
        let s = self.state.borrow();
        s.opens - s.closes
    }

    pub fn fetched(&self) -> Vec<MessageId> {
        self.state.borrow().fetched.clone()
    }
}

impl MailboxConnector for FakeMailbox {
    fn open(&self, _credentials: &Credentials) -> Result<Box<dyn MailboxSession>> {
        let mut s = self.state.borrow_mut();
        if s.reject_login {
            return Err(Error::AuthenticationFailure(
                "[AUTHENTICATIONFAILED] Invalid credentials".to_string(),
            ));
        }
        s.opens += 1;
        Ok(Box::new(FakeSession {
            state: Rc::clone(&self.state),
        }))
    }
}

struct FakeSession {
    state: Rc<RefCell<State>>,
}

impl MailboxSession for FakeSession {
    fn search(&mut self, keyword: &str) -> Result<Vec<MessageId>> {
        let s = self.state.borrow();
        if s.fail_search {
            return Err(Error::SearchFailure("BAD search".to_string()));
        }
        let needle = keyword.to_lowercase();
        Ok(s.messages
            .iter()
            .enumerate()
            .filter(|(_, (subject, _))| subject.to_lowercase().contains(&needle))
            .map(|(i, _)| i as MessageId + 1)
            .collect())
    }

    fn fetch_raw(&mut self, id: MessageId) -> Result<Vec<u8>> {
        let mut s = self.state.borrow_mut();
        if s.fail_fetch_of == Some(id) {
            return Err(Error::SearchFailure(format!("fetch {id}: connection reset")));
        }
        s.fetched.push(id);
        s.messages
            .get(id as usize - 1)
            .map(|(_, raw)| raw.clone())
            .ok_or_else(|| Error::SearchFailure(format!("message {id} returned no body")))
    }

    fn close(&mut self) -> Result<()> {
        self.state.borrow_mut().closes += 1;
        Ok(())
    }
}
