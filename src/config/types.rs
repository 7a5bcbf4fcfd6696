use serde::Deserialize;

/// Main configuration structure for wikisift
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Builds a minimal configuration from a base URL alone, for invocations
    /// that pass everything on the command line instead of a config file.
    pub fn from_base_url(base_url: &str) -> Self {
        Config {
            source: SourceConfig {
                base_url: base_url.to_string(),
                username: None,
                token: None,
                spaces: Vec::new(),
                history: false,
            },
            crawler: CrawlerConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

/// Remote wiki source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the wiki, e.g. "https://example.atlassian.net/wiki"
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Username or email for basic auth (optional; anonymous otherwise)
    #[serde(default)]
    pub username: Option<String>,

    /// API token for basic auth (optional; anonymous otherwise)
    #[serde(default)]
    pub token: Option<String>,

    /// Space keys to scan; empty means every discovered space
    #[serde(default)]
    pub spaces: Vec<String>,

    /// Whether to walk historical page versions as well
    #[serde(default)]
    pub history: bool,
}

impl SourceConfig {
    /// Whether both halves of the basic auth credential pair are present.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.token.is_some()
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of concurrent HTTP requests, across all crawl levels
    #[serde(rename = "max-concurrent-requests", default = "default_concurrency")]
    pub max_concurrent_requests: u32,

    /// Listing window size; must match the window the server fills
    #[serde(rename = "window-size", default = "default_window_size")]
    pub window_size: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-seconds", default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        CrawlerConfig {
            max_concurrent_requests: default_concurrency(),
            window_size: default_window_size(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

fn default_concurrency() -> u32 {
    5
}

fn default_window_size() -> u32 {
    25
}

fn default_timeout() -> u64 {
    30
}

/// Report output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Optional path for a JSON copy of the report
    #[serde(rename = "json-path", default)]
    pub json_path: Option<String>,
}
