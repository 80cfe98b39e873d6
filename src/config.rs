use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Recommendation backend base URL (serves `/random-art` and `/recommend/:id`)
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Object store bucket holding `<id>.jpg` artwork images
    #[serde(default = "default_s3_bucket_name")]
    pub s3_bucket_name: String,

    #[serde(default = "default_aws_region")]
    pub aws_region: String,

    /// Overrides the bucket/region image host when set
    #[serde(default)]
    pub image_base_url: Option<String>,

    /// Pause between a judgment and the card advance, in milliseconds
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Timeout applied to every backend request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How many recommendation requests may be in flight at once
    #[serde(default = "default_recommend_concurrency")]
    pub recommend_concurrency: usize,

    /// Swipe sessions untouched for this long are dropped
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    #[serde(default = "default_session_sweep_interval_secs")]
    pub session_sweep_interval_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_s3_bucket_name() -> String {
    "artwork-portfolio-project".to_string()
}

fn default_aws_region() -> String {
    "eu-north-1".to_string()
}

fn default_settle_delay_ms() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_recommend_concurrency() -> usize {
    1
}

fn default_session_ttl_secs() -> u64 {
    1800
}

fn default_session_sweep_interval_secs() -> u64 {
    60
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            s3_bucket_name: default_s3_bucket_name(),
            aws_region: default_aws_region(),
            image_base_url: None,
            settle_delay_ms: default_settle_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            recommend_concurrency: default_recommend_concurrency(),
            session_ttl_secs: default_session_ttl_secs(),
            session_sweep_interval_secs: default_session_sweep_interval_secs(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_interval_secs.max(1))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
