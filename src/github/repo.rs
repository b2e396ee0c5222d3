use crate::error::{Result, SentinelError};
use regex::Regex;

const NAME_PATTERN: &str = r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$";

/// Normalize user input into an `owner/name` repository identifier
///
/// Accepts the plain identifier or any of the usual GitHub remote URL forms.
pub fn normalize_repo(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SentinelError::InvalidRepository(
            "please enter a repository name (e.g. owner/repo)".to_string(),
        ));
    }

    let candidate = parse_github_url(input).unwrap_or_else(|| input.trim_matches('/').to_string());

    if Regex::new(NAME_PATTERN)?.is_match(&candidate) {
        Ok(candidate)
    } else {
        Err(SentinelError::InvalidRepository(format!(
            "'{}' is not of the form owner/repo",
            input
        )))
    }
}

/// Parse an `owner/name` identifier out of a GitHub remote URL
pub fn parse_github_url(url: &str) -> Option<String> {
    // Handle different GitHub URL formats:
    // - https://github.com/owner/repo.git
    // - git@github.com:owner/repo.git
    // - https://github.com/owner/repo
    // - git://github.com/owner/repo.git
    let patterns = [
        r"^https?://github\.com/([^/]+)/([^/]+?)(?:\.git)?/?$",
        r"^git@github\.com:([^/]+)/([^/]+?)(?:\.git)?$",
        r"^git://github\.com/([^/]+)/([^/]+?)(?:\.git)?$",
    ];

    let url = url.trim();
    for pattern in patterns {
        if let Some(captures) = Regex::new(pattern).ok()?.captures(url) {
            let owner = captures.get(1)?.as_str();
            let repo = captures.get(2)?.as_str();
            return Some(format!("{}/{}", owner, repo));
        }
    }

    None
}

/// Filesystem-safe directory name for a repository
pub fn dir_name(repo: &str) -> String {
    repo.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_url_https() {
        assert_eq!(
            parse_github_url("https://github.com/rust-lang/rust.git").as_deref(),
            Some("rust-lang/rust")
        );
        assert_eq!(
            parse_github_url("https://github.com/rust-lang/rust").as_deref(),
            Some("rust-lang/rust")
        );
    }

    #[test]
    fn test_parse_github_url_ssh() {
        assert_eq!(
            parse_github_url("git@github.com:rust-lang/rust.git").as_deref(),
            Some("rust-lang/rust")
        );
    }

    #[test]
    fn test_parse_github_url_git_protocol() {
        assert_eq!(
            parse_github_url("git://github.com/rust-lang/rust.git").as_deref(),
            Some("rust-lang/rust")
        );
    }

    #[test]
    fn test_parse_github_url_invalid() {
        assert!(parse_github_url("https://gitlab.com/owner/repo").is_none());
        assert!(parse_github_url("not a url").is_none());
        assert!(parse_github_url("").is_none());
    }

    #[test]
    fn test_normalize_repo() {
        assert_eq!(normalize_repo("octo/demo").unwrap(), "octo/demo");
        assert_eq!(normalize_repo("  octo/demo \n").unwrap(), "octo/demo");
        assert_eq!(
            normalize_repo("https://github.com/tokio-rs/tokio").unwrap(),
            "tokio-rs/tokio"
        );
        assert_eq!(normalize_repo("serde-rs/serde.rs").unwrap(), "serde-rs/serde.rs");
    }

    #[test]
    fn test_normalize_repo_rejects_invalid() {
        assert!(normalize_repo("").is_err());
        assert!(normalize_repo("   ").is_err());
        assert!(normalize_repo("just-a-name").is_err());
        assert!(normalize_repo("a/b/c").is_err());
        assert!(normalize_repo("owner/has space").is_err());
    }

    #[test]
    fn test_dir_name() {
        assert_eq!(dir_name("octo/demo"), "octo_demo");
        assert_eq!(dir_name("plain"), "plain");
    }
}
