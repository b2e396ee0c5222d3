use crate::config::Config;
use crate::error::{Result, SentinelError};
use crate::github::bounds::{retain_created_until, DateBound};
use crate::github::{Category, CommitRecord, IssueRecord, PullRequestRecord, UpdateSet};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Why a single category could not be fetched
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a response (connect, DNS, timeout)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("upstream returned {status}")]
    UpstreamStatus { status: StatusCode, body: String },

    /// The API answered 2xx but the body was not the expected JSON
    #[error("could not decode response: {source}")]
    Decode {
        source: serde_json::Error,
        body: String,
    },
}

impl FetchError {
    /// Raw response body, when a response was received
    pub fn body(&self) -> Option<&str> {
        match self {
            FetchError::Transport(_) => None,
            FetchError::UpstreamStatus { body, .. } | FetchError::Decode { body, .. } => {
                Some(body)
            }
        }
    }
}

/// GitHub REST API client
///
/// Holds the credential and connection settings; every fetch builds and owns
/// its own request, so one value can be shared by reference.
pub struct GitHubClient {
    client: Client,
    api_url: String,
}

impl GitHubClient {
    /// Create a new client against `api_url`
    pub fn new(api_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("repo-sentinel/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| SentinelError::config("GitHub token contains invalid characters"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the application config
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = match config.request_timeout_secs {
            0 => DEFAULT_TIMEOUT_SECS,
            secs => secs,
        };
        Self::new(
            &config.github_api_url,
            config.github_token().as_deref(),
            Duration::from_secs(timeout),
        )
    }

    /// Fetch all three categories for `repo`, one after another
    pub async fn fetch_updates(
        &self,
        repo: &str,
        since: Option<&DateBound>,
        until: Option<&DateBound>,
    ) -> UpdateSet {
        UpdateSet {
            commits: self.fetch_commits(repo, since, until).await,
            issues: self.fetch_issues(repo, since, until).await,
            pull_requests: self.fetch_pull_requests(repo, since, until).await,
        }
    }

    /// Fetch commits in `[since, until]`; both bounds are honored upstream
    pub async fn fetch_commits(
        &self,
        repo: &str,
        since: Option<&DateBound>,
        until: Option<&DateBound>,
    ) -> Vec<CommitRecord> {
        debug!("Fetching commits for {}", repo);
        let result = self
            .get_json(repo, Category::Commits, &commit_query(since, until))
            .await;
        degrade(repo, Category::Commits, result)
    }

    /// Fetch issues of every state, with `until` applied client-side
    pub async fn fetch_issues(
        &self,
        repo: &str,
        since: Option<&DateBound>,
        until: Option<&DateBound>,
    ) -> Vec<IssueRecord> {
        debug!("Fetching issues for {}", repo);
        let result = self
            .get_json(repo, Category::Issues, &state_query(since))
            .await
            .map(|issues| apply_until(issues, until));
        degrade(repo, Category::Issues, result)
    }

    /// Fetch pull requests of every state, with `until` applied client-side
    pub async fn fetch_pull_requests(
        &self,
        repo: &str,
        since: Option<&DateBound>,
        until: Option<&DateBound>,
    ) -> Vec<PullRequestRecord> {
        debug!("Fetching pull requests for {}", repo);
        let result = self
            .get_json(repo, Category::PullRequests, &state_query(since))
            .await
            .map(|prs| apply_until(prs, until));
        degrade(repo, Category::PullRequests, result)
    }

    fn endpoint(&self, repo: &str, category: Category) -> String {
        format!("{}/repos/{}/{}", self.api_url, repo, category.endpoint())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        repo: &str,
        category: Category,
        query: &[(&str, String)],
    ) -> std::result::Result<Vec<T>, FetchError> {
        let response = self
            .client
            .get(self.endpoint(repo, category))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::UpstreamStatus { status, body });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { source, body })
    }
}

/// Query for the commits endpoint: each bound only when provided
pub fn commit_query(since: Option<&DateBound>, until: Option<&DateBound>) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(since) = since {
        query.push(("since", since.as_str().to_string()));
    }
    if let Some(until) = until {
        query.push(("until", until.as_str().to_string()));
    }
    query
}

/// Query for issues and pulls: every state, lower bound only
pub fn state_query(since: Option<&DateBound>) -> Vec<(&'static str, String)> {
    let mut query = vec![("state", "all".to_string())];
    if let Some(since) = since {
        query.push(("since", since.as_str().to_string()));
    }
    query
}

fn apply_until<T: crate::github::Created>(records: Vec<T>, until: Option<&DateBound>) -> Vec<T> {
    match until {
        Some(until) => retain_created_until(records, until),
        None => records,
    }
}

/// Log a failed category and fall back to no data for it
fn degrade<T>(repo: &str, category: Category, result: std::result::Result<Vec<T>, FetchError>) -> Vec<T> {
    match result {
        Ok(records) => {
            debug!("Fetched {} {} for {}", records.len(), category, repo);
            records
        }
        Err(e) => {
            error!("Failed to fetch {} from {}: {}", category, repo, e);
            error!(
                "Response details: {}",
                e.body().unwrap_or("no response data available")
            );
            Vec::new()
        }
    }
}
