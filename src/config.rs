use crate::auth::PollerConfig;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Tool settings read from `config.toml`; command-line flags take precedence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_region")]
    pub region: String,
    /// Start-url host fragment or full portal URL
    #[serde(default)]
    pub start_url: Option<String>,
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
    /// Upper bound for a whole login, including the time the operator needs to approve it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub poll: PollSettings,
    /// Override for the OIDC endpoint (defaults to the regional one)
    #[serde(default)]
    pub oidc_endpoint: Option<String>,
    /// Override for the portal endpoint (defaults to the regional one)
    #[serde(default)]
    pub portal_endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollSettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_interval_secs")]
    pub default_interval_secs: u64,
}

fn default_region() -> String {
    "ap-northeast-1".to_string()
}

fn default_open_browser() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    900
}

fn default_max_attempts() -> u32 {
    crate::auth::poller::DEFAULT_MAX_ATTEMPTS
}

fn default_interval_secs() -> u64 {
    crate::auth::poller::DEFAULT_INTERVAL.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: default_region(),
            start_url: None,
            open_browser: default_open_browser(),
            timeout_secs: default_timeout_secs(),
            poll: PollSettings::default(),
            oidc_endpoint: None,
            portal_endpoint: None,
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            default_interval_secs: default_interval_secs(),
        }
    }
}

impl PollSettings {
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            max_attempts: self.max_attempts,
            default_interval: Duration::from_secs(self.default_interval_secs.max(1)),
        }
    }
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("sso-cli")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".sso-cli")
        };
        Ok(dir)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::parse(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Region from the command line, falling back to the configured one
    pub fn resolve_region(&self, flag: Option<String>) -> String {
        flag.unwrap_or_else(|| self.region.clone())
    }

    /// Portal URL from the command line or the configured default
    pub fn resolve_start_url(&self, flag: Option<String>) -> Result<String> {
        let host = flag
            .or_else(|| self.start_url.clone())
            .filter(|value| !value.trim().is_empty())
            .context("please specify the AWS SSO access portal URL with --url flag")?;
        Ok(crate::api::constants::start_url(&host))
    }
}

/// Locations of the files shared with the AWS CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsPaths {
    pub sso_cache_dir: PathBuf,
    pub config_file: PathBuf,
}

impl AwsPaths {
    /// `~/.aws/sso/cache` and `~/.aws/config`
    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(Self::under(home))
    }

    pub fn under(home: impl Into<PathBuf>) -> Self {
        let aws = home.into().join(".aws");
        Self {
            sso_cache_dir: aws.join("sso").join("cache"),
            config_file: aws.join("config"),
        }
    }
}
