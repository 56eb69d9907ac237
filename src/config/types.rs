use serde::Deserialize;

/// Main configuration structure for Khabargir
///
/// Every section and key has a default, so an empty file (or no file at all)
/// is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

/// Crawl pacing and stopping thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of concurrent article fetches
    pub workers: usize,

    /// Maximum number of daily archives crawled at once
    #[serde(rename = "day-workers")]
    pub day_workers: usize,

    /// Consecutive empty cursors or listing pages before a source is exhausted
    #[serde(rename = "empty-streak-limit")]
    pub empty_streak_limit: u32,

    /// Consecutive identical listing pages before a source is stopped
    #[serde(rename = "identical-streak-limit")]
    pub identical_streak_limit: u32,

    /// Upper bound on listing pages walked for one archive day
    #[serde(rename = "max-pages-per-day")]
    pub max_pages_per_day: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            day_workers: 5,
            empty_streak_limit: 3,
            identical_streak_limit: 5,
            max_pages_per_day: 100,
        }
    }
}

/// HTTP request behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Retries after the first attempt for retryable failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base delay before the first retry (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Ceiling on the backoff delay (milliseconds)
    #[serde(rename = "max-backoff-ms")]
    pub max_backoff_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
            max_retries: 3,
            retry_delay_ms: 1000,
            max_backoff_ms: 8000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory in which `<site>.db` files are created
    #[serde(rename = "database-dir")]
    pub database_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_dir: ".".to_string(),
        }
    }
}
