use crate::error::{Result, SentinelError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
const CLAUDE_TOKEN_ENV: &str = "ANTHROPIC_AUTH_TOKEN";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub token sent with every API request (optional for public repositories)
    pub github_token: Option<String>,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Root directory for raw and summarized progress files
    #[serde(default = "default_progress_dir")]
    pub progress_dir: PathBuf,

    /// JSON file holding the watched repositories
    #[serde(default = "default_subscriptions_file")]
    pub subscriptions_file: PathBuf,

    /// Claude API key
    pub claude_api_key: Option<String>,

    /// Claude model used for summaries
    #[serde(default = "default_claude_model")]
    pub claude_model: String,

    /// Upper bound on the length of a generated report, in tokens
    #[serde(default = "default_max_tokens")]
    pub claude_max_tokens: u32,

    /// Default rolling window in days (1-30)
    #[serde(default = "default_period")]
    pub default_period_days: u32,

    /// Enable caching of generated reports
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Cache TTL in hours (default: 168 hours / 7 days)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_hours: u32,

    /// Report cache location (default: ~/.cache/repo-sentinel)
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default location (~/.config/repo-sentinel/config.toml)
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SentinelError::config(format!(
                "Config file not found at: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SentinelError::config("Could not determine home directory"))?;
        Ok(home.join(".config").join("repo-sentinel").join("config.toml"))
    }

    /// Get the default cache directory path
    pub fn default_cache_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SentinelError::config("Could not determine home directory"))?;
        Ok(home.join(".cache").join("repo-sentinel"))
    }

    /// Cache directory from the config, or the default one
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match self.cache_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => Self::default_cache_dir(),
        }
    }

    /// Create a default configuration file at the default location
    pub fn create_default() -> Result<Self> {
        Self::create_default_at(&Self::default_config_path()?)
    }

    /// Write a default configuration file to `path`
    pub fn create_default_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config = Self::default();
        let toml_string = toml::to_string_pretty(&config)?;
        fs::write(path, toml_string)?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref key) = self.claude_api_key {
            if !key.starts_with("sk-ant-") {
                return Err(SentinelError::config(
                    "Invalid Claude API key format (should start with 'sk-ant-')",
                ));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(SentinelError::config("request_timeout_secs must be > 0"));
        }

        if !(1..=30).contains(&self.default_period_days) {
            return Err(SentinelError::config(
                "default_period_days must be between 1 and 30",
            ));
        }

        if self.claude_max_tokens == 0 {
            return Err(SentinelError::config("claude_max_tokens must be > 0"));
        }

        if self.cache_ttl_hours == 0 {
            return Err(SentinelError::config("cache_ttl_hours must be > 0"));
        }

        Ok(())
    }

    /// Load config from file, or create default if it doesn't exist
    pub fn load_or_create_default() -> Result<Self> {
        Self::load_or_create_at(&Self::default_config_path()?)
    }

    /// Load the config at `path`, writing the defaults there only when no file exists
    ///
    /// An existing file that fails to parse or validate is an error and is left untouched.
    pub fn load_or_create_at(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        eprintln!("Config file not found. Creating default config...");
        Self::create_default_at(path)
    }

    /// GitHub token, preferring the environment over the config file
    pub fn github_token(&self) -> Option<String> {
        env::var(GITHUB_TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.github_token.clone())
    }

    /// Claude API key, preferring the environment over the config file
    pub fn get_api_key(&self) -> Result<String> {
        env::var(CLAUDE_TOKEN_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.claude_api_key.clone())
            .ok_or_else(|| {
                SentinelError::MissingConfig(format!(
                    "claude_api_key (or the {} environment variable)",
                    CLAUDE_TOKEN_ENV
                ))
            })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: default_github_api_url(),
            request_timeout_secs: default_request_timeout(),
            progress_dir: default_progress_dir(),
            subscriptions_file: default_subscriptions_file(),
            claude_api_key: None,
            claude_model: default_claude_model(),
            claude_max_tokens: default_max_tokens(),
            default_period_days: default_period(),
            cache_enabled: default_true(),
            cache_ttl_hours: default_cache_ttl(),
            cache_dir: None,
        }
    }
}

// Serde default functions
fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_progress_dir() -> PathBuf {
    PathBuf::from("daily_progress")
}

fn default_subscriptions_file() -> PathBuf {
    PathBuf::from("subscriptions.json")
}

fn default_claude_model() -> String {
    crate::ai::claude::DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    crate::ai::claude::DEFAULT_MAX_TOKENS
}

fn default_period() -> u32 {
    7
}

fn default_cache_ttl() -> u32 {
    168 // 7 days in hours
}

fn default_true() -> bool {
    true
}
