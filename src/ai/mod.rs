pub mod cache;
pub mod claude;
pub mod prompt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// AI-generated progress report for a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Repository identifier (owner/name)
    pub repository: String,
    /// Length of the covered period in days
    pub period_days: u32,
    /// Report body in markdown format
    pub content: String,
    /// When this report was generated
    pub generated_at: DateTime<Utc>,
}

impl ProgressReport {
    /// Create a new report
    pub fn new(repository: String, period_days: u32, content: String) -> Self {
        Self {
            repository,
            period_days,
            content,
            generated_at: Utc::now(),
        }
    }

    /// Format report as markdown
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "# {} progress ({} {})\n\n",
            self.repository,
            self.period_days,
            if self.period_days == 1 { "day" } else { "days" }
        ));
        output.push_str(self.content.trim());
        output.push_str("\n\n");

        output.push_str(&format!(
            "*Generated at: {}*\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output
    }
}
