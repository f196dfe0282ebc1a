//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Unset or unparsable numeric values
//! fall back to defaults.

use std::net::SocketAddr;
use std::str::FromStr;

use crate::domain::backup::{BACKUP_DIR_MAX_CHARS, DEFAULT_BACKUP_DIR, artifact_dir};

/// Log output format for `tracing-subscriber`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::LogFormat(other.to_string())),
        }
    }
}

/// Configuration errors raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LISTEN_ADDR` is not a socket address.
    #[error("invalid LISTEN_ADDR {value:?}: {source}")]
    ListenAddr {
        /// The rejected value.
        value: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },

    /// `BACKUP_DIR` is too long for artifact paths to be stored.
    #[error("BACKUP_DIR is {len} characters, at most {max} allowed")]
    BackupDir {
        /// Length of the rejected value, without trailing separators.
        len: usize,
        /// Longest accepted value.
        max: usize,
    },

    /// `LOG_FORMAT` is neither `pretty` nor `json`.
    #[error("invalid LOG_FORMAT {0:?}: expected \"pretty\" or \"json\"")]
    LogFormat(String),
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`ServiceConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:5005`).
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Directory under which backup artifact paths are generated.
    pub backup_dir: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Log output format.
    pub log_format: LogFormat,
}

impl ServiceConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `LISTEN_ADDR`, `BACKUP_DIR` or
    /// `LOG_FORMAT` is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `LISTEN_ADDR`, `BACKUP_DIR` or
    /// `LOG_FORMAT` is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:5005".to_string());
        let listen_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::ListenAddr {
                value: raw_addr.clone(),
                source,
            })?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let backup_dir = lookup("BACKUP_DIR").unwrap_or_else(|| DEFAULT_BACKUP_DIR.to_string());
        let backup_dir_len = artifact_dir(&backup_dir).chars().count();
        if backup_dir_len > BACKUP_DIR_MAX_CHARS {
            return Err(ConfigError::BackupDir {
                len: backup_dir_len,
                max: BACKUP_DIR_MAX_CHARS,
            });
        }

        let log_format = lookup("LOG_FORMAT")
            .map(|raw| raw.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10),
            database_min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 1),
            database_connect_timeout_secs: parse_or(&lookup, "DATABASE_CONNECT_TIMEOUT_SECS", 5),
            backup_dir,
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30),
            log_format,
        })
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_select_memory_store() {
        let Ok(cfg) = config(&[]) else {
            panic!("defaults must load");
        };
        assert_eq!(cfg.listen_addr.port(), 5005);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.backup_dir, "/backups");
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn overrides_are_applied() {
        let Ok(cfg) = config(&[
            ("LISTEN_ADDR", "127.0.0.1:8080"),
            ("DATABASE_URL", "postgres://u@h/db"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("BACKUP_DIR", "/var/dumps"),
            ("LOG_FORMAT", "JSON"),
        ]) else {
            panic!("overrides must load");
        };
        assert_eq!(cfg.listen_addr.port(), 8080);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://u@h/db"));
        assert_eq!(cfg.database_max_connections, 4);
        assert_eq!(cfg.backup_dir, "/var/dumps");
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let Ok(cfg) = config(&[("REQUEST_TIMEOUT_SECS", "soon")]) else {
            panic!("must load");
        };
        assert_eq!(cfg.request_timeout_secs, 30);
    }

    #[test]
    fn invalid_listen_addr_is_an_error() {
        assert!(matches!(
            config(&[("LISTEN_ADDR", "nowhere")]),
            Err(ConfigError::ListenAddr { .. })
        ));
    }

    #[test]
    fn oversized_backup_dir_is_an_error() {
        let longest = format!("/{}/", "d".repeat(BACKUP_DIR_MAX_CHARS - 1));
        let Ok(cfg) = config(&[("BACKUP_DIR", longest.as_str())]) else {
            panic!("longest dir must load");
        };
        assert_eq!(cfg.backup_dir, longest);

        let too_long = format!("/{}", "d".repeat(BACKUP_DIR_MAX_CHARS));
        assert!(matches!(
            config(&[("BACKUP_DIR", too_long.as_str())]),
            Err(ConfigError::BackupDir { len, max }) if len == max + 1
        ));
    }

    #[test]
    fn invalid_log_format_is_an_error() {
        assert!(matches!(
            config(&[("LOG_FORMAT", "xml")]),
            Err(ConfigError::LogFormat(_))
        ));
    }
}
