//! Process configuration read from the environment.

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;

/// One hour between polling sweeps unless overridden.
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub const PORT_ENV: &str = "PORT";
pub const POLLING_INTERVAL_ENV: &str = "POLLING_INTERVAL_MS";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Period of the background polling sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    interval: Duration,
}

impl PollingConfig {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_env() -> Self {
        let raw = std::env::var(POLLING_INTERVAL_ENV).ok();
        Self::new(parse_polling_interval(raw.as_deref()))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Human-readable interval for startup logs, e.g. `"5 minute(s)"`.
    pub fn format_interval(&self) -> String {
        format_interval(self.interval)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLLING_INTERVAL)
    }
}

/// Everything the binary needs to boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub polling: PollingConfig,
    /// When unset the in-memory store is used.
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = std::env::var(PORT_ENV).ok();
        let database_url = std::env::var(DATABASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self {
            port: parse_port(port.as_deref()),
            polling: PollingConfig::from_env(),
            database_url,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            polling: PollingConfig::default(),
            database_url: None,
        }
    }
}

/// Milliseconds read from the leading digits (`"1.5"` is 1 ms, `"500ms"` is
/// 500 ms). No leading digits, or zero, falls back to the default.
pub fn parse_polling_interval(raw: Option<&str>) -> Duration {
    let Some(raw) = raw else {
        return DEFAULT_POLLING_INTERVAL;
    };

    let trimmed = raw.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());

    match trimmed[..digits_end].parse::<u64>() {
        Ok(ms) if ms > 0 => Duration::from_millis(ms),
        _ => {
            warn!(value = raw, "invalid {POLLING_INTERVAL_ENV}, using default interval");
            DEFAULT_POLLING_INTERVAL
        }
    }
}

pub fn parse_port(raw: Option<&str>) -> u16 {
    let Some(raw) = raw else {
        return DEFAULT_PORT;
    };

    match raw.trim().parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            warn!(value = raw, "invalid {PORT_ENV}, using default port {DEFAULT_PORT}");
            DEFAULT_PORT
        }
    }
}

/// Rounds to whole minutes below an hour, whole hours otherwise.
pub fn format_interval(interval: Duration) -> String {
    let minutes = (interval.as_millis() as f64 / 60_000.0).round() as u64;
    if minutes < 60 {
        return format!("{minutes} minute(s)");
    }
    let hours = (minutes as f64 / 60.0).round() as u64;
    format!("{hours} hour(s)")
}
