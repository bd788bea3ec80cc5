use std::time::Duration;

use secrecy::ExposeSecret;

use crate::credentials::Credentials;
use crate::error::{Error, Result};

pub const MODEL: &str = "gpt-4o";
pub const TEMPERATURE: f32 = 0.5;

/// One chat completion: a single user-role prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: &'static str,
    pub temperature: f32,
    pub prompt: String,
}

/// What a provider call can fail with, before retry policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    RateLimited,
    Api(String),
}

pub trait CompletionBackend {
    fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> std::result::Result<String, CompletionError>;
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Retry on rate limits only, with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_secs(5),
        }
    }
}

pub fn build_prompt(subject: &str, body: &str) -> String {
    format!(
        "Summarize this email for a busy parent in 2-3 bullet points:\n\nSubject: {subject}\nBody: {body}"
    )
}

pub struct Summarizer<B, S = ThreadSleeper> {
    backend: B,
    sleeper: S,
    policy: RetryPolicy,
}

impl<B: CompletionBackend> Summarizer<B, ThreadSleeper> {
    pub fn new(backend: B) -> Self {
        Self::with_sleeper(backend, ThreadSleeper, RetryPolicy::default())
    }
}

impl<B: CompletionBackend, S: Sleeper> Summarizer<B, S> {
    pub fn with_sleeper(backend: B, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            backend,
            sleeper,
            policy,
        }
    }

    /// Summarize one message. An empty reply is still a success.
    pub fn summarize(
        &self,
        credentials: &Credentials,
        subject: &str,
        body: &str,
    ) -> Result<String> {
        let request = CompletionRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            prompt: build_prompt(subject, body),
        };

        let mut attempt = 1;
        loop {
            match self
                .backend
                .complete(credentials.summarization_api_key().expose_secret(), &request)
            {
                Ok(text) => return Ok(text.trim().to_string()),
                Err(CompletionError::RateLimited) if attempt < self.policy.max_attempts => {
                    log::warn!(
                        "rate limited on attempt {attempt}/{}; retrying in {:?}",
                        self.policy.max_attempts,
                        self.policy.backoff
                    );
                    self.sleeper.sleep(self.policy.backoff);
                    attempt += 1;
                }
                Err(CompletionError::RateLimited) => return Err(Error::RateLimitExceeded),
                Err(CompletionError::Api(message)) => return Err(Error::ApiError(message)),
            }
        }
    }
}
