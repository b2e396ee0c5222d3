use crate::ai::cache::ReportCache;
use crate::ai::claude::ClaudeClient;
use crate::ai::prompt::{generate_report_prompt, repository_from_raw};
use crate::ai::ProgressReport;
use crate::config::Config;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const REPORT_SUFFIX: &str = "_report";

/// Turns raw progress files into language-model written reports
pub struct ReportGenerator {
    claude: ClaudeClient,
    cache: Option<ReportCache>,
}

impl ReportGenerator {
    pub fn new(claude: ClaudeClient, cache: Option<ReportCache>) -> Self {
        Self { claude, cache }
    }

    /// Build a generator from config; `use_cache` lets the CLI opt out per run
    pub fn from_config(config: &Config, use_cache: bool) -> Result<Self> {
        let claude = ClaudeClient::new(config.get_api_key()?)?
            .with_model(config.claude_model.clone())
            .with_max_tokens(config.claude_max_tokens);

        let cache = if config.cache_enabled && use_cache {
            Some(ReportCache::from_config(config)?)
        } else {
            None
        };

        Ok(Self::new(claude, cache))
    }

    /// Summarize the raw file at `raw_path` covering `period_days`
    ///
    /// Writes the report next to the raw file and returns its text and path.
    pub async fn generate_report_by_date_range(
        &self,
        raw_path: &Path,
        period_days: u32,
    ) -> Result<(String, PathBuf)> {
        let raw = fs::read_to_string(raw_path)?;
        let repository = repository_from_raw(&raw).unwrap_or_else(|| fallback_name(raw_path));

        let report = match self.cache {
            Some(ref cache) => {
                let key = ReportCache::generate_key(&raw, period_days, self.claude.model());
                if let Some(cached) = cache.get(&key)? {
                    debug!("Using cached report for {}", repository);
                    cached
                } else {
                    let report = self.summarize(repository, period_days, &raw).await?;
                    cache.set(&key, report.clone())?;
                    report
                }
            }
            None => self.summarize(repository, period_days, &raw).await?,
        };

        let markdown = report.to_markdown();
        let report_path = report_path_for(raw_path);
        fs::write(&report_path, &markdown)?;

        info!("[{}] progress report written: {}", report.repository, report_path.display());
        Ok((markdown, report_path))
    }

    async fn summarize(&self, repository: String, period_days: u32, raw: &str) -> Result<ProgressReport> {
        let prompt = generate_report_prompt(&repository, period_days, raw);
        let content = self.claude.complete(prompt).await?;
        Ok(ProgressReport::new(repository, period_days, content))
    }
}

/// `<dir>/<stem>_report.md` for a raw file `<dir>/<stem>.md`
pub fn report_path_for(raw_path: &Path) -> PathBuf {
    let stem = raw_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    raw_path.with_file_name(format!("{}{}.md", stem, REPORT_SUFFIX))
}

fn fallback_name(raw_path: &Path) -> String {
    raw_path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RAW: &str = "# Progress for octo/demo (2024-01-01T00:00:00Z to 2024-01-07T00:00:00Z)\n\n\
                       \n## Commits\n- Initial import... (1111111)\n\
                       \n## Issues\n\
                       \n## Pull Requests\n";

    async fn claude_server(expected_calls: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": "## New Features\n- Initial import" }]
            })))
            .expect(expected_calls)
            .mount(&server)
            .await;
        server
    }

    fn write_raw(dir: &Path) -> PathBuf {
        let repo_dir = dir.join("octo_demo");
        fs::create_dir_all(&repo_dir).unwrap();
        let raw_path = repo_dir.join("2024-01-01_to_2024-01-07.md");
        fs::write(&raw_path, RAW).unwrap();
        raw_path
    }

    fn claude_for(server: &MockServer) -> ClaudeClient {
        ClaudeClient::new("sk-ant-test-key".to_string())
            .unwrap()
            .with_api_url(&server.uri())
    }

    #[test]
    fn test_report_path_for() {
        let raw = Path::new("daily_progress/octo_demo/2024-01-01_to_2024-01-07.md");
        assert_eq!(
            report_path_for(raw),
            PathBuf::from("daily_progress/octo_demo/2024-01-01_to_2024-01-07_report.md")
        );
    }

    #[tokio::test]
    async fn test_generate_report_writes_file() {
        let server = claude_server(1).await;
        let temp_dir = TempDir::new().unwrap();
        let raw_path = write_raw(temp_dir.path());

        let generator = ReportGenerator::new(claude_for(&server), None);
        let (report, report_path) = generator
            .generate_report_by_date_range(&raw_path, 6)
            .await
            .unwrap();

        assert!(report.starts_with("# octo/demo progress (6 days)"));
        assert!(report.contains("- Initial import"));
        assert_eq!(report_path, report_path_for(&raw_path));
        assert_eq!(fs::read_to_string(&report_path).unwrap(), report);
    }

    #[tokio::test]
    async fn test_generate_report_uses_cache() {
        let server = claude_server(1).await;
        let temp_dir = TempDir::new().unwrap();
        let raw_path = write_raw(temp_dir.path());
        let cache = ReportCache::new(&temp_dir.path().join("cache"), 24).unwrap();

        let generator = ReportGenerator::new(claude_for(&server), Some(cache));
        let (first, _) = generator.generate_report_by_date_range(&raw_path, 6).await.unwrap();
        let (second, _) = generator.generate_report_by_date_range(&raw_path, 6).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_generate_report_missing_raw_file() {
        let server = claude_server(0).await;
        let temp_dir = TempDir::new().unwrap();

        let generator = ReportGenerator::new(claude_for(&server), None);
        let result = generator
            .generate_report_by_date_range(&temp_dir.path().join("missing.md"), 7)
            .await;

        assert!(matches!(result, Err(crate::error::SentinelError::Io(_))));
    }
}
