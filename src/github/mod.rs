pub mod bounds;
pub mod client;
pub mod repo;

use serde::{Deserialize, Serialize};

/// A commit as returned by `GET /repos/{repo}/commits`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full commit hash
    pub sha: String,
    /// Commit payload
    pub commit: CommitDetail,
}

/// The nested `commit` object of a commit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetail {
    /// Full commit message
    pub message: String,
}

impl CommitRecord {
    /// Short commit hash (7 characters)
    pub fn short_sha(&self) -> String {
        self.sha.chars().take(7).collect()
    }
}

/// An issue as returned by `GET /repos/{repo}/issues`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRecord {
    pub title: String,
    pub number: u64,
    pub state: String,
    pub created_at: String,
}

/// A pull request as returned by `GET /repos/{repo}/pulls`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestRecord {
    pub title: String,
    pub number: u64,
    pub state: String,
    pub created_at: String,
}

/// Records that carry a creation timestamp, filtered client-side against `until`
pub trait Created {
    fn created_at(&self) -> &str;
}

impl Created for IssueRecord {
    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl Created for PullRequestRecord {
    fn created_at(&self) -> &str {
        &self.created_at
    }
}

/// One of the three independent data kinds fetched per cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Commits,
    Issues,
    PullRequests,
}

impl Category {
    /// Endpoint segment under `/repos/{repo}/`
    pub fn endpoint(&self) -> &'static str {
        match self {
            Category::Commits => "commits",
            Category::Issues => "issues",
            Category::PullRequests => "pulls",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Commits => "Commits",
            Category::Issues => "Issues",
            Category::PullRequests => "Pull Requests",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one fetch cycle
#[derive(Debug, Clone, Default)]
pub struct UpdateSet {
    pub commits: Vec<CommitRecord>,
    pub issues: Vec<IssueRecord>,
    pub pull_requests: Vec<PullRequestRecord>,
}

impl UpdateSet {
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty() && self.issues.is_empty() && self.pull_requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_commit_record_ignores_unknown_fields() {
        let value = json!({
            "sha": "0123456789abcdef",
            "node_id": "C_kwDO",
            "commit": {
                "message": "Fix the parser",
                "author": { "name": "octocat" }
            },
            "html_url": "https://github.com/octo/demo/commit/0123456789abcdef"
        });

        let record: CommitRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.commit.message, "Fix the parser");
        assert_eq!(record.short_sha(), "0123456");
    }

    #[test]
    fn test_short_sha_on_short_hash() {
        let record = CommitRecord {
            sha: "abc".to_string(),
            commit: CommitDetail {
                message: String::new(),
            },
        };
        assert_eq!(record.short_sha(), "abc");
    }

    #[test]
    fn test_category_endpoints() {
        assert_eq!(Category::Commits.endpoint(), "commits");
        assert_eq!(Category::Issues.endpoint(), "issues");
        assert_eq!(Category::PullRequests.endpoint(), "pulls");
        assert_eq!(Category::PullRequests.to_string(), "Pull Requests");
    }

    #[test]
    fn test_update_set_is_empty() {
        let mut updates = UpdateSet::default();
        assert!(updates.is_empty());

        updates.issues.push(IssueRecord {
            title: "Crash on start".to_string(),
            number: 1,
            state: "open".to_string(),
            created_at: "2024-01-02T00:00:00Z".to_string(),
        });
        assert!(!updates.is_empty());
    }
}
