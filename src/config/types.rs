use serde::Deserialize;
use std::time::Duration;

/// Browser-like user agent sent with the page download
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// Main configuration structure for Page-Lens
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub prober: ProberConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Settings for downloading the page under analysis
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Overall timeout for the page download (seconds)
    #[serde(rename = "timeout-secs", default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with the download
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Settings for link liveness probes
#[derive(Debug, Clone, Deserialize)]
pub struct ProberConfig {
    /// Per-probe timeout (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of probes in flight; 0 means unbounded
    #[serde(rename = "max-concurrent-probes", default)]
    pub max_concurrent_probes: usize,
}

impl ProberConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the in-flight cap, if one is configured
    pub fn concurrency_limit(&self) -> Option<usize> {
        (self.max_concurrent_probes > 0).then_some(self.max_concurrent_probes)
    }
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_probe_timeout_ms(),
            max_concurrent_probes: 0,
        }
    }
}

/// HTTP API settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Origins allowed by the CORS layer
    #[serde(rename = "allowed-origins", default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:4200".to_string()]
}
