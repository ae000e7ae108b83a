//! # API Configuration Module
//!
//! Loads server, database and scheduling settings from environment variables,
//! with defaults where a value is optional.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: host address to bind to (default: "0.0.0.0")
//! - `API_PORT`: port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 5)
//! - `DATABASE_ACQUIRE_TIMEOUT_SECONDS`: pool acquire timeout (default: 5)
//! - `LOG_LEVEL`: logging level (default: "info")
//! - `API_CORS_ORIGINS`: comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: request timeout (default: 30)
//! - `SCHEDULE_WINDOW_DAYS`: days generated per month generation (default: 30)
//! - `SCHEDULE_TIMEZONE`: IANA zone that defines "today" (default: "Asia/Jakarta")

use std::{env, time::Duration};

use chrono_tz::Tz;
use eyre::{Result, WrapErr, eyre};
use fieldslot_core::engine::DEFAULT_WINDOW_DAYS;
use tracing::Level;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: u64,
    pub log_level: Level,
    pub cors_origins: Option<Vec<String>>,
    /// Request timeout in seconds
    pub request_timeout: u64,
    pub schedule_window_days: u32,
    pub schedule_timezone: Tz,
}

impl ApiConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if `DATABASE_URL` is missing, or if `API_PORT`,
    /// `SCHEDULE_WINDOW_DAYS` or `SCHEDULE_TIMEZONE` cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // Network settings
        let host = var("API_HOST", "0.0.0.0");
        let port = var("API_PORT", "3000")
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;
        let database_max_connections = var("DATABASE_MAX_CONNECTIONS", "5").parse().unwrap_or(5);
        let database_acquire_timeout = var("DATABASE_ACQUIRE_TIMEOUT_SECONDS", "5")
            .parse()
            .unwrap_or(5);

        // Logging settings
        let log_level = match var("LOG_LEVEL", "info").as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        let request_timeout = var("API_REQUEST_TIMEOUT_SECONDS", "30").parse().unwrap_or(30);

        // Scheduling settings
        let schedule_window_days = var("SCHEDULE_WINDOW_DAYS", &DEFAULT_WINDOW_DAYS.to_string())
            .parse()
            .wrap_err("Invalid SCHEDULE_WINDOW_DAYS value")?;
        let timezone = var("SCHEDULE_TIMEZONE", "Asia/Jakarta");
        let schedule_timezone = timezone
            .parse::<Tz>()
            .map_err(|e| eyre!("Invalid SCHEDULE_TIMEZONE value {timezone:?}: {e}"))?;

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            database_acquire_timeout,
            log_level,
            cors_origins,
            request_timeout,
            schedule_window_days,
            schedule_timezone,
        })
    }

    /// Returns the server address (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.database_acquire_timeout)
    }
}
