use log::LevelFilter;
use std::time::Duration;

pub const DEFAULT_REFRESH_SECS: u64 = 60;
pub const MIN_REFRESH_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub refresh_every: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            refresh_every: Duration::from_secs(DEFAULT_REFRESH_SECS),
        }
    }
}

impl AppSettings {
    /// Read `CCUP_REFRESH_SECS` and `CCUP_LOG_LEVEL`; anything unset or unparsable keeps its default.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let refresh_secs = lookup("CCUP_REFRESH_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs.max(MIN_REFRESH_SECS))
            .unwrap_or(DEFAULT_REFRESH_SECS);
        let log_level = lookup("CCUP_LOG_LEVEL").and_then(|v| v.trim().parse::<LevelFilter>().ok());

        Self {
            full_screen: false,
            log_level,
            refresh_every: Duration::from_secs(refresh_secs),
        }
    }
}
