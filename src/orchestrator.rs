use crate::config::Config;
use crate::error::Result;
use crate::github::client::GitHubClient;
use crate::github::repo::normalize_repo;
use crate::report::raw::export_progress_by_date_range;
use crate::report::summary::ReportGenerator;
use crate::report::window::ReportWindow;
use crate::subscriptions::SubscriptionManager;
use std::path::PathBuf;
use tracing::info;

/// Outcome of a subscription change, with the message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionChange {
    Added(String),
    AlreadySubscribed(String),
    Removed(String),
    NotSubscribed(String),
}

impl SubscriptionChange {
    pub fn message(&self) -> String {
        match self {
            Self::Added(repo) => format!("Subscribed to {}", repo),
            Self::AlreadySubscribed(repo) => format!("Already subscribed to {}", repo),
            Self::Removed(repo) => format!("Unsubscribed from {}", repo),
            Self::NotSubscribed(repo) => format!("Not subscribed to {}", repo),
        }
    }
}

/// Coordinates fetching, raw export, summarization and the watch list
pub struct Orchestrator {
    config: Config,
    github: GitHubClient,
    subscriptions: SubscriptionManager,
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(config: Config) -> Result<Self> {
        let github = GitHubClient::from_config(&config)?;
        let subscriptions = SubscriptionManager::open(&config.subscriptions_file);

        Ok(Self {
            config,
            github,
            subscriptions,
        })
    }

    /// Fetch activity for `repo` over `window` and write the raw progress file
    pub async fn export_raw(&self, repo: &str, window: &ReportWindow) -> Result<PathBuf> {
        let repo = normalize_repo(repo)?;
        let (since, until) = window.bounds();
        export_progress_by_date_range(&self.github, &self.config.progress_dir, &repo, &since, &until)
            .await
    }

    /// Export the raw file, then summarize it
    ///
    /// Returns the report text, the report path and the raw file path.
    pub async fn export_progress(
        &self,
        repo: &str,
        window: &ReportWindow,
        generator: &ReportGenerator,
    ) -> Result<(String, PathBuf, PathBuf)> {
        let raw_path = self.export_raw(repo, window).await?;
        let (report, report_path) = generator
            .generate_report_by_date_range(&raw_path, window.days())
            .await?;
        Ok((report, report_path, raw_path))
    }

    pub fn subscriptions(&self) -> &[String] {
        self.subscriptions.list()
    }

    pub fn add_subscription(&mut self, input: &str) -> Result<SubscriptionChange> {
        let repo = normalize_repo(input)?;
        let change = if self.subscriptions.add(&repo)? {
            SubscriptionChange::Added(repo)
        } else {
            SubscriptionChange::AlreadySubscribed(repo)
        };
        info!("{}", change.message());
        Ok(change)
    }

    pub fn remove_subscription(&mut self, input: &str) -> Result<SubscriptionChange> {
        let repo = normalize_repo(input)?;
        let change = if self.subscriptions.remove(&repo)? {
            SubscriptionChange::Removed(repo)
        } else {
            SubscriptionChange::NotSubscribed(repo)
        };
        info!("{}", change.message());
        Ok(change)
    }
}
