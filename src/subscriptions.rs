use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Watched repositories, persisted as a JSON array of `owner/name` strings
pub struct SubscriptionManager {
    path: PathBuf,
    subscriptions: Vec<String>,
}

impl SubscriptionManager {
    /// Open the list at `path`
    ///
    /// A missing or malformed file yields an empty list rather than an error.
    pub fn open(path: &Path) -> Self {
        let subscriptions = Self::load(path);
        Self {
            path: path.to_path_buf(),
            subscriptions,
        }
    }

    fn load(path: &Path) -> Vec<String> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "Subscriptions file {} does not exist, starting with an empty list",
                    path.display()
                );
                return Vec::new();
            }
            Err(e) => {
                error!("Could not read subscriptions file {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                error!(
                    "Subscriptions file {} is malformed ({}), using an empty list",
                    path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.subscriptions)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn list(&self) -> &[String] {
        &self.subscriptions
    }

    pub fn contains(&self, repo: &str) -> bool {
        self.subscriptions.iter().any(|s| s == repo)
    }

    /// Subscribe to `repo`; returns `false` if it was already present
    pub fn add(&mut self, repo: &str) -> Result<bool> {
        if self.contains(repo) {
            info!("Subscription {} already exists", repo);
            return Ok(false);
        }

        self.subscriptions.push(repo.to_string());
        self.save()?;
        info!("Added subscription: {}", repo);
        Ok(true)
    }

    /// Unsubscribe from `repo`; returns `false` if it was not present
    pub fn remove(&mut self, repo: &str) -> Result<bool> {
        let Some(index) = self.subscriptions.iter().position(|s| s == repo) else {
            warn!("Tried to remove unknown subscription: {}", repo);
            return Ok(false);
        };

        self.subscriptions.remove(index);
        self.save()?;
        info!("Removed subscription: {}", repo);
        Ok(true)
    }
}
