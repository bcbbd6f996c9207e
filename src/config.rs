//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Missing or unparsable values fall back
//! to defaults; only `LISTEN_ADDR` is validated strictly.

use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::entropy::DEFAULT_QRNG_URL;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// Whether dice are drawn from the quantum RNG service at all.
    pub qrng_enabled: bool,

    /// Quantum RNG endpoint.
    pub qrng_url: String,

    /// Upper bound on one quantum RNG request.
    pub qrng_timeout: Duration,

    /// Largest dice count accepted in a single notation.
    pub max_dice_per_notation: u32,

    /// Capacity of each connection's outbound queue.
    pub ws_outbound_capacity: usize,

    /// How long a broadcast waits on one full outbound queue before
    /// dropping that connection.
    pub ws_send_timeout: Duration,

    /// Tracing output format.
    pub log_format: LogFormat,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()?;

        Ok(Self {
            listen_addr,
            qrng_enabled: parse_env_bool("QRNG_ENABLED", true),
            qrng_url: std::env::var("QRNG_URL").unwrap_or_else(|_| DEFAULT_QRNG_URL.to_string()),
            qrng_timeout: Duration::from_millis(parse_env("QRNG_TIMEOUT_MS", 1_000)),
            max_dice_per_notation: parse_env("MAX_DICE_PER_NOTATION", 100),
            ws_outbound_capacity: parse_env("WS_OUTBOUND_CAPACITY", 64).max(1),
            ws_send_timeout: Duration::from_millis(parse_env("WS_SEND_TIMEOUT_MS", 1_000)),
            log_format: LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref()),
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            qrng_enabled: true,
            qrng_url: DEFAULT_QRNG_URL.to_string(),
            qrng_timeout: Duration::from_secs(1),
            max_dice_per_notation: 100,
            ws_outbound_capacity: 64,
            ws_send_timeout: Duration::from_secs(1),
            log_format: LogFormat::Pretty,
        }
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
    parse_bool(std::env::var(key).ok().as_deref()).unwrap_or(default)
}

fn parse_bool(value: Option<&str>) -> Option<bool> {
    match value?.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
