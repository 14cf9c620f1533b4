//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

/// Top-level service configuration.
///
/// Loaded once at startup via [`BookingConfig::from_env`].
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// Optional dedicated listener that serves only `/metrics`.
    pub metrics_listen_addr: Option<SocketAddr>,

    /// SQLite database file, or `:memory:` for an ephemeral database.
    pub database_path: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Whether to insert the sample hotels into an empty database.
    pub seed_sample_data: bool,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl BookingConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` or `METRICS_LISTEN_ADDR` is set but
    /// cannot be parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()?;

        let metrics_listen_addr = match std::env::var("METRICS_LISTEN_ADDR") {
            Ok(v) if !v.trim().is_empty() => Some(v.trim().parse::<SocketAddr>()?),
            _ => None,
        };

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "bookings.db".to_string());

        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 5);
        let database_connect_timeout_secs = parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5);

        let seed_sample_data = parse_env_bool("SEED_SAMPLE_DATA", true);

        let log_json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            listen_addr,
            metrics_listen_addr,
            database_path,
            database_max_connections,
            database_connect_timeout_secs,
            seed_sample_data,
            log_json,
        })
    }

    /// Database connection acquire timeout.
    #[must_use]
    pub const fn database_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.database_connect_timeout_secs)
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key)
        .ok()
        .map(|v| v.trim().to_ascii_lowercase())
        .as_deref()
    {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}
