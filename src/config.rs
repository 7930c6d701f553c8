use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    /// Seconds between one status response settling and the next query.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Give up after this many status queries. Unbounded when unset.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_attempts: None,
        }
    }
}

fn default_interval_secs() -> u64 {
    5
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Where the session JSON lives. Defaults to the platform config dir.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    #[serde(default)]
    pub oauth: Option<OauthConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OauthConfig {
    /// Provider authorization endpoint the browser is sent to.
    pub authorize_url: String,
    /// Endpoint where the callback code is exchanged for a token.
    pub token_url: String,
    pub client_id: String,
    /// Local address the one-shot callback listener binds to.
    #[serde(default = "default_callback_bind")]
    pub callback_bind: String,
}

fn default_callback_bind() -> String {
    "127.0.0.1:8732".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// Directory PDF downloads are written into.
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

/// Load the config file, or fall back to built-in defaults when it does
/// not exist. A file that exists but fails to parse or validate is still
/// an error.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    load_config(path)
}

fn validate(config: &Config) -> Result<()> {
    url::Url::parse(&config.api.base_url)
        .with_context(|| format!("api.base_url is not a valid URL: '{}'", config.api.base_url))?;

    if config.api.timeout_secs == 0 {
        anyhow::bail!("api.timeout_secs must be > 0");
    }

    if config.poll.interval_secs == 0 {
        anyhow::bail!("poll.interval_secs must be > 0");
    }

    if config.poll.max_attempts == Some(0) {
        anyhow::bail!("poll.max_attempts must be >= 1 when set");
    }

    if let Some(oauth) = &config.auth.oauth {
        url::Url::parse(&oauth.authorize_url)
            .with_context(|| "auth.oauth.authorize_url is not a valid URL")?;
        url::Url::parse(&oauth.token_url)
            .with_context(|| "auth.oauth.token_url is not a valid URL")?;
        if oauth.client_id.is_empty() {
            anyhow::bail!("auth.oauth.client_id must not be empty");
        }
    }

    Ok(())
}
