use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Sleeper fantasy API base URL
    #[serde(default = "default_sleeper_api_url")]
    pub sleeper_api_url: String,

    /// ESPN core API base URL (NFL schedule data)
    #[serde(default = "default_espn_api_url")]
    pub espn_api_url: String,

    /// Player directory cache time-to-live in milliseconds
    #[serde(default = "default_player_cache_ttl_ms")]
    pub player_cache_ttl_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_sleeper_api_url() -> String {
    "https://api.sleeper.app/v1".to_string()
}

fn default_espn_api_url() -> String {
    "https://sports.core.api.espn.com".to_string()
}

fn default_player_cache_ttl_ms() -> u64 {
    3_600_000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
