//! Credential gate: nothing touches the network until this passes.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// Credential strings as they arrive from the environment or keyring.
#[derive(Debug, Clone)]
pub struct RawCredentials {
    pub mailbox_address: String,
    pub mailbox_secret: SecretString,
    pub summarization_api_key: SecretString,
}

/// Validated, immutable credentials shared read-only by every component.
#[derive(Debug, Clone)]
pub struct Credentials {
    mailbox_address: String,
    mailbox_secret: SecretString,
    summarization_api_key: SecretString,
}

impl Credentials {
    pub fn validate(raw: &RawCredentials) -> Result<Self> {
        Ok(Self {
            mailbox_address: required("mailbox address", &raw.mailbox_address)?,
            mailbox_secret: required("mailbox secret", raw.mailbox_secret.expose_secret())?
                .into(),
            summarization_api_key: required(
                "summarization API key",
                raw.summarization_api_key.expose_secret(),
            )?
            .into(),
        })
    }

    pub fn mailbox_address(&self) -> &str {
        &self.mailbox_address
    }

    pub fn mailbox_secret(&self) -> &SecretString {
        &self.mailbox_secret
    }

    pub fn summarization_api_key(&self) -> &SecretString {
        &self.summarization_api_key
    }
}

/// Strip surrounding whitespace and quote characters, as pasted secrets often carry them.
pub fn clean_secret(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\'')
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let cleaned = clean_secret(value);
    if cleaned.is_empty() {
        return Err(Error::MissingCredential { field });
    }
    Ok(cleaned.to_string())
}
