use crate::error::Result;
use crate::github::bounds::DateBound;
use crate::github::client::GitHubClient;
use crate::github::repo::dir_name;
use crate::github::UpdateSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Characters of a commit message kept in the raw report
const MESSAGE_WIDTH: usize = 50;
const ELLIPSIS: &str = "...";
const RANGE_SEPARATOR: &str = "_to_";
const EXTENSION: &str = "md";

/// Fetch a repository's activity in `[since, until]` and write the raw report
///
/// Bounds are validated before any request goes out. Individual categories that
/// fail to fetch end up as empty sections; only filesystem errors are returned.
pub async fn export_progress_by_date_range(
    client: &GitHubClient,
    root: &Path,
    repo: &str,
    since: &str,
    until: &str,
) -> Result<PathBuf> {
    let since = DateBound::parse(since)?;
    let until = DateBound::parse(until)?;
    debug!("Exporting progress for {} from {} to {}", repo, since, until);

    let updates = client.fetch_updates(repo, Some(&since), Some(&until)).await;
    if updates.is_empty() {
        warn!("No activity found for {} between {} and {}", repo, since, until);
    }

    let repo_dir = root.join(dir_name(repo));
    fs::create_dir_all(&repo_dir)?;

    let file_path = repo_dir.join(report_file_name(&since, &until));
    fs::write(&file_path, render_raw_report(repo, &since, &until, &updates))?;

    info!("[{}] progress file written: {}", repo, file_path.display());
    Ok(file_path)
}

/// `<since-date>_to_<until-date>.md`
pub fn report_file_name(since: &DateBound, until: &DateBound) -> String {
    format!(
        "{}{}{}.{}",
        since.date_part(),
        RANGE_SEPARATOR,
        until.date_part(),
        EXTENSION
    )
}

/// Render the raw report text
pub fn render_raw_report(
    repo: &str,
    since: &DateBound,
    until: &DateBound,
    updates: &UpdateSet,
) -> String {
    let mut output = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(output, "# Progress for {} ({} to {})\n", repo, since, until);

    output.push_str("\n## Commits\n");
    for commit in &updates.commits {
        let _ = writeln!(
            output,
            "- {} ({})",
            truncate_message(&commit.commit.message),
            commit.short_sha()
        );
    }

    output.push_str("\n## Issues\n");
    for issue in &updates.issues {
        let _ = writeln!(output, "- {} #{} ({})", issue.title, issue.number, issue.state);
    }

    output.push_str("\n## Pull Requests\n");
    for pr in &updates.pull_requests {
        let _ = writeln!(output, "- {} #{} ({})", pr.title, pr.number, pr.state);
    }

    output
}

/// First 50 characters of a commit message, always followed by `...`
pub fn truncate_message(message: &str) -> String {
    let mut short: String = message.chars().take(MESSAGE_WIDTH).collect();
    short.push_str(ELLIPSIS);
    short
}
