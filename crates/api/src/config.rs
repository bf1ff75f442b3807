//! Server settings, read once at startup from the process environment
//! (after `dotenv` has had a chance to populate it).
//!
//! | variable | default |
//! |---|---|
//! | `API_HOST` | `0.0.0.0` |
//! | `API_PORT` | `3000` |
//! | `STORE_BACKEND` | `postgres` (or `memory`) |
//! | `DATABASE_URL` | none, required for `postgres` |
//! | `LOG_LEVEL` | `info` |
//! | `API_CORS_ORIGINS` | none; comma-separated |
//! | `API_REQUEST_TIMEOUT_SECONDS` | `30` |

use eyre::{eyre, Result, WrapErr};
use std::env;
use std::str::FromStr;
use tracing::Level;

/// Storage used for the schedule catalog and the booking ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Persistent storage in PostgreSQL
    Postgres,
    /// Process-local storage, lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(eyre!("Unknown STORE_BACKEND value: {}", other)),
        }
    }
}

/// ```no_run
/// # fn main() -> eyre::Result<()> {
/// let config = clinicslot_api::config::ApiConfig::from_env()?;
/// assert!(config.server_addr().contains(':'));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Storage backend for schedules and bookings
    pub store_backend: StoreBackend,

    /// PostgreSQL database connection string, required for the postgres backend
    pub database_url: Option<String>,

    pub log_level: Level,

    /// Allowed CORS origins; `None` leaves CORS headers off
    pub cors_origins: Option<Vec<String>>,

    /// Seconds before an in-flight request is answered with 408
    pub request_timeout: u64,
}

impl ApiConfig {
    /// Fails on an unparseable `API_PORT`, an unknown `STORE_BACKEND`, or a
    /// missing `DATABASE_URL` when the postgres backend is selected.
    pub fn from_env() -> Result<Self> {
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        let store_backend: StoreBackend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;
        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(eyre!("DATABASE_URL environment variable must be set"));
        }

        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(Self {
            host,
            port,
            store_backend,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_log_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
