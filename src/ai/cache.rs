use crate::ai::ProgressReport;
use crate::config::Config;
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use sled::Db;
use std::path::Path;

/// Cache for AI-generated progress reports
pub struct ReportCache {
    db: Db,
    ttl_hours: u32,
}

impl ReportCache {
    /// Create or open a cache
    pub fn new(cache_dir: &Path, ttl_hours: u32) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)?;

        let db_path = cache_dir.join("reports.sled");
        let db = sled::open(db_path)?;

        Ok(Self { db, ttl_hours })
    }

    /// Create cache from config
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.cache_dir()?, config.cache_ttl_hours)
    }

    /// Generate a cache key from the raw report, the period and the model
    ///
    /// The key is a hex SHA-256 digest, identical across builds.
    pub fn generate_key(raw_report: &str, period_days: u32, model: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(model.as_bytes());
        hasher.update([0u8]);
        hasher.update(period_days.to_be_bytes());
        hasher.update(raw_report.as_bytes());

        format!("report_{}", hex::encode(hasher.finalize()))
    }

    /// Get a report from cache if it exists and is not expired
    pub fn get(&self, key: &str) -> Result<Option<ProgressReport>> {
        if let Some(data) = self.db.get(key)? {
            let cached: CachedReport = serde_json::from_slice(&data)?;

            if self.is_expired(&cached.cached_at) {
                self.db.remove(key)?;
                return Ok(None);
            }

            Ok(Some(cached.report))
        } else {
            Ok(None)
        }
    }

    /// Store a report in cache
    pub fn set(&self, key: &str, report: ProgressReport) -> Result<()> {
        let cached = CachedReport {
            report,
            cached_at: Utc::now(),
        };

        let data = serde_json::to_vec(&cached)?;
        self.db.insert(key, data)?;
        self.db.flush()?;

        Ok(())
    }

    fn is_expired(&self, cached_at: &DateTime<Utc>) -> bool {
        let now = Utc::now();
        let ttl = Duration::hours(self.ttl_hours as i64);
        now - *cached_at > ttl
    }

    /// Clear all cache entries
    pub fn clear(&self) -> Result<()> {
        self.db.clear()?;
        self.db.flush()?;
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.db.len(),
            db_size_bytes: self.db.size_on_disk().unwrap_or(0),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct CachedReport {
    report: ProgressReport,
    cached_at: DateTime<Utc>,
}

/// Cache statistics
#[derive(Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub db_size_bytes: u64,
}

impl CacheStats {
    /// Format size in human-readable format
    pub fn format_size(&self) -> String {
        let bytes = self.db_size_bytes;
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.2} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn report() -> ProgressReport {
        ProgressReport::new("octo/demo".to_string(), 7, "Quiet week".to_string())
    }

    #[test]
    fn test_cache_key_generation() {
        let key1 = ReportCache::generate_key("raw", 7, "model-a");
        let key2 = ReportCache::generate_key("raw", 7, "model-a");
        let key3 = ReportCache::generate_key("raw", 14, "model-a");
        let key4 = ReportCache::generate_key("raw", 7, "model-b");

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
        assert_ne!(key1, key4);
        assert!(key1.starts_with("report_"));
    }

    #[test]
    fn test_cache_key_is_stable() {
        // Persisted keys must not change between builds
        assert_eq!(
            ReportCache::generate_key("raw", 7, "model-a"),
            "report_4c03f3c1192b22347cc69019374207a94d5747dbc4cd45958d6cc3ce2a751705"
        );
    }

    #[test]
    fn test_from_config_uses_configured_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            cache_dir: Some(temp_dir.path().join("cache")),
            ..Config::default()
        };

        let cache = ReportCache::from_config(&config).unwrap();
        cache.set("key", report()).unwrap();
        assert!(temp_dir.path().join("cache").join("reports.sled").exists());
    }

    #[test]
    fn test_cache_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ReportCache::new(temp_dir.path(), 24).unwrap();

        cache.set("test_key", report()).unwrap();

        let retrieved = cache.get("test_key").unwrap();
        assert_eq!(retrieved.unwrap().repository, "octo/demo");
        assert!(cache.get("other_key").unwrap().is_none());
    }

    #[test]
    fn test_cache_expiration() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ReportCache::new(temp_dir.path(), 0).unwrap(); // 0 hour TTL

        cache.set("test_key", report()).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(100));
        assert!(cache.get("test_key").unwrap().is_none());
    }

    #[test]
    fn test_cache_clear_and_stats() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ReportCache::new(temp_dir.path(), 24).unwrap();
        assert_eq!(cache.stats().total_entries, 0);

        cache.set("key1", report()).unwrap();
        cache.set("key2", report()).unwrap();
        assert_eq!(cache.stats().total_entries, 2);

        cache.clear().unwrap();
        assert_eq!(cache.stats().total_entries, 0);
    }

    #[test]
    fn test_format_size() {
        let stats = CacheStats { total_entries: 0, db_size_bytes: 512 };
        assert_eq!(stats.format_size(), "512 B");
        let stats = CacheStats { total_entries: 0, db_size_bytes: 2048 };
        assert_eq!(stats.format_size(), "2.00 KB");
    }
}
