use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_IMAP_SERVER: &str = "imap.gmail.com";
pub const DEFAULT_IMAP_PORT: u16 = 993;
pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

/// Non-secret settings. Secrets come from env/keyring, see `secrets`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub imap_server: Option<String>,
    pub imap_port: Option<u16>,
    pub api_base: Option<String>,
}

impl Config {
    pub fn imap_server(&self) -> &str {
        self.imap_server.as_deref().unwrap_or(DEFAULT_IMAP_SERVER)
    }

    pub fn imap_port(&self) -> u16 {
        self.imap_port.unwrap_or(DEFAULT_IMAP_PORT)
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

const TEMPLATE: &str = r#"# mail_digest settings. Secrets are NOT read from here:
# set EMAIL_ADDRESS, EMAIL_APP_PASSWORD and OPENAI_API_KEY in the environment,
# or store them with `mail_digest set-secret --name <email-address|app-password|api-key>`.

# imap_server = "imap.gmail.com"
# imap_port = 993
# api_base = "https://api.openai.com"
"#;

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("mail_digest"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Read the config at `path`; if missing, write a template and use defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        fs::write(path, TEMPLATE)?;
        log::info!("Created template config at {}", path.display());
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)?;
    Ok(cfg)
}
