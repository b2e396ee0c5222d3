use thiserror::Error;

/// Main error type for repo-sentinel
#[derive(Error, Debug)]
pub enum SentinelError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// HTTP/API errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Claude API errors
    #[error("Claude API error: {0}")]
    ClaudeApi(String),

    /// Caching errors
    #[error("Cache error: {0}")]
    Cache(#[from] sled::Error),

    /// A date bound that is not an ISO-8601 timestamp
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Invalid timespan
    #[error("Invalid timespan: {0}")]
    InvalidTimespan(String),

    /// A repository identifier that is not `owner/name`
    #[error("Invalid repository: {0}")]
    InvalidRepository(String),

    /// Missing configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Regex errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for repo-sentinel operations
pub type Result<T> = std::result::Result<T, SentinelError>;

impl SentinelError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Claude API error
    pub fn claude_api<S: Into<String>>(msg: S) -> Self {
        Self::ClaudeApi(msg.into())
    }

    pub fn invalid_timestamp<S: Into<String>>(value: S) -> Self {
        Self::InvalidTimestamp(value.into())
    }
}
