use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::{schedule::EspnClient, sleeper::SleeperClient, FantasySource, ScheduleSource};

/// Shared application state: the two upstream data sources.
///
/// Held behind trait objects so tests can swap in stub sources.
#[derive(Clone)]
pub struct AppState {
    pub fantasy: Arc<dyn FantasySource>,
    pub schedule: Arc<dyn ScheduleSource>,
}

impl AppState {
    pub fn new(fantasy: Arc<dyn FantasySource>, schedule: Arc<dyn ScheduleSource>) -> Self {
        Self { fantasy, schedule }
    }

    /// Wires up the real Sleeper and ESPN clients from configuration
    pub fn from_config(config: &Config) -> Self {
        let sleeper = SleeperClient::new(
            config.sleeper_api_url.clone(),
            Duration::from_millis(config.player_cache_ttl_ms),
        );
        let espn = EspnClient::new(config.espn_api_url.clone());

        Self::new(Arc::new(sleeper), Arc::new(espn))
    }
}
