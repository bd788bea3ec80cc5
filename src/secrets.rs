use anyhow::{Result, anyhow};
use keyring::{Entry, Error as KeyringError};

use crate::credentials::RawCredentials;

const SERVICE: &str = "mail_digest";

/// The three secrets the pipeline needs, with their env var and keyring names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretName {
    EmailAddress,
    AppPassword,
    ApiKey,
}

impl SecretName {
    pub fn env_var(self) -> &'static str {
        match self {
            SecretName::EmailAddress => "EMAIL_ADDRESS",
            SecretName::AppPassword => "EMAIL_APP_PASSWORD",
            SecretName::ApiKey => "OPENAI_API_KEY",
        }
    }

    pub fn keyring_user(self) -> &'static str {
        match self {
            SecretName::EmailAddress => "email-address",
            SecretName::AppPassword => "app-password",
            SecretName::ApiKey => "api-key",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "email-address" => Ok(SecretName::EmailAddress),
            "app-password" => Ok(SecretName::AppPassword),
            "api-key" => Ok(SecretName::ApiKey),
            other => Err(anyhow!(
                "unknown secret {other:?} (expected email-address, app-password or api-key)"
            )),
        }
    }
}

/// Save a secret into the OS keyring
pub fn save_secret(name: SecretName, value: &str) -> Result<()> {
    let entry = Entry::new(SERVICE, name.keyring_user());
    entry?
        .set_password(value)
        .map_err(|e| anyhow!(e.to_string()))?;
    Ok(())
}

/// Load a secret from the keyring, `None` if it was never stored
pub fn load_secret(name: SecretName) -> Result<Option<String>> {
    let entry = Entry::new(SERVICE, name.keyring_user());
    match entry?.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(KeyringError::NoEntry) => Ok(None),
        Err(e) => Err(anyhow!(e.to_string())),
    }
}

/// Resolve raw credentials: environment first, keyring second.
///
/// Absent values come back empty; the credential gate decides whether that is fatal.
pub fn load_raw_credentials() -> RawCredentials {
    RawCredentials {
        mailbox_address: resolve(SecretName::EmailAddress),
        mailbox_secret: resolve(SecretName::AppPassword).into(),
        summarization_api_key: resolve(SecretName::ApiKey).into(),
    }
}

fn resolve(name: SecretName) -> String {
    if let Some(v) = std::env::var(name.env_var())
        .ok()
        .filter(|v| !v.trim().is_empty())
    {
        return v;
    }
    match load_secret(name) {
        Ok(v) => v.unwrap_or_default(),
        Err(e) => {
            // no secret service on this host; the gate reports the empty field
            log::debug!("keyring lookup for {} failed: {e}", name.keyring_user());
            String::new()
        }
    }
}
