use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::Level;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub backend_url: String,
    pub api_prefix: String,

    // Attendance window
    pub window_poll_secs: u64,
    /// Fixed office offset from UTC; host local time when unset
    pub utc_offset_minutes: Option<i32>,

    // Backend
    pub status_cache_ttl_secs: u64,
    pub backend_timeout_secs: u64,

    // Rate limiting
    pub rate_submit_per_min: u32,
    pub rate_protected_per_min: u32,

    pub log_level: Level,
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} must be set"))
}

fn parsed<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let utc_offset_minutes = match env::var("ATTENDANCE_UTC_OFFSET_MINUTES") {
            Ok(raw) => Some(raw.trim().parse().with_context(|| {
                format!("ATTENDANCE_UTC_OFFSET_MINUTES has an invalid value: {raw:?}")
            })?),
            Err(_) => None,
        };

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            backend_url: required("BACKEND_URL")?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            window_poll_secs: parsed("WINDOW_POLL_SECS", 60)?,
            utc_offset_minutes,

            status_cache_ttl_secs: parsed("STATUS_CACHE_TTL_SECS", 30)?,
            backend_timeout_secs: parsed("BACKEND_TIMEOUT_SECS", 10)?,

            rate_submit_per_min: parsed("RATE_SUBMIT_PER_MIN", 30)?,
            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", 1000)?,

            log_level: parsed("LOG_LEVEL", Level::DEBUG)?,
        })
    }
}
