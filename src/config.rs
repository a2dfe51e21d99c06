use crate::search::SearchOptions;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// How the aggregator fetches service documents during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// One document at a time, in listing order.
    Sequential,
    /// Fan out with many fetches in flight.
    Concurrent,
    /// Use the `FETCH_CONCURRENCY` setting.
    Custom,
}

impl FetchMode {
    pub fn from_env() -> Self {
        match env::var("DOCSEARCH_FETCH_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "sequential" | "serial" => Self::Sequential,
            "concurrent" | "parallel" => Self::Concurrent,
            _ => Self::Custom,
        }
    }
}

pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding one `<service>.json` document per service.
    pub data_dir: PathBuf,
    pub shutdown_timeout_secs: u64,
    /// Upper bound on matches reported per service.
    pub max_matches_per_service: usize,
    /// Per-document fetch timeout. A timed-out service is skipped.
    pub fetch_timeout_ms: u64,
    /// Maximum document fetches in flight during one search.
    pub fetch_concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// `DOCSEARCH_FETCH_MODE` picks a fetch preset:
    /// - `sequential`: one fetch at a time
    /// - `concurrent`: up to 16 fetches in flight
    /// - unset or other: `FETCH_CONCURRENCY` (default 8)
    pub fn from_env() -> anyhow::Result<Self> {
        let fetch_concurrency = match FetchMode::from_env() {
            FetchMode::Sequential => 1,
            FetchMode::Concurrent => 16,
            FetchMode::Custom => env::var("FETCH_CONCURRENCY")
                .unwrap_or_else(|_| "8".to_string())
                .parse()?,
        };

        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            data_dir: PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string())),
            shutdown_timeout_secs: env::var("SHUTDOWN_TIMEOUT")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            max_matches_per_service: env::var("MAX_MATCHES_PER_SERVICE")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            fetch_timeout_ms: env::var("FETCH_TIMEOUT_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()?,
            fetch_concurrency,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings under which every search would come back empty or stall.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.fetch_concurrency == 0 {
            anyhow::bail!("FETCH_CONCURRENCY must be at least 1");
        }
        if self.max_matches_per_service == 0 {
            anyhow::bail!("MAX_MATCHES_PER_SERVICE must be at least 1");
        }
        Ok(())
    }

    /// Search tuning derived from this configuration.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_matches_per_service: self.max_matches_per_service,
            fetch_timeout: Duration::from_millis(self.fetch_timeout_ms),
            fetch_concurrency: self.fetch_concurrency,
        }
    }
}
