//! Configuration module for the navigation backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default upper bound for an uploaded backup file (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Default lifetime of an announcement view record (30 days).
pub const DEFAULT_ANNOUNCEMENT_VIEW_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key guarding the admin routes
    pub admin_key: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Path to the admin credential file (kept outside the database)
    pub credential_path: PathBuf,
    /// Directory receiving temporary restore uploads
    pub upload_dir: PathBuf,
    /// Maximum accepted size of an uploaded backup, in bytes
    pub max_upload_bytes: usize,
    /// How long an announcement view suppresses the announcement for a viewer
    pub announcement_view_ttl: Duration,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let admin_key = env::var("NAV_ADMIN_KEY").ok().filter(|k| !k.is_empty());

        let db_path = env::var("NAV_DB_PATH")
            .unwrap_or_else(|_| "./data/nav.sqlite".to_string())
            .into();

        let credential_path = env::var("NAV_CREDENTIAL_PATH")
            .unwrap_or_else(|_| "./data/admin_password.json".to_string())
            .into();

        let upload_dir = env::var("NAV_UPLOAD_DIR")
            .unwrap_or_else(|_| "./temp".to_string())
            .into();

        let max_upload_bytes = parse_or("NAV_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES);

        let announcement_view_ttl = Duration::from_secs(parse_or(
            "NAV_ANNOUNCEMENT_VIEW_TTL_SECS",
            DEFAULT_ANNOUNCEMENT_VIEW_TTL_SECS,
        ));

        let bind_addr = parse_or(
            "NAV_BIND_ADDR",
            SocketAddr::from(([127, 0, 0, 1], 3000)),
        );

        let log_level = env::var("NAV_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            admin_key,
            db_path,
            credential_path,
            upload_dir,
            max_upload_bytes,
            announcement_view_ttl,
            bind_addr,
            log_level,
        }
    }
}

/// Parse an environment variable, keeping the default when it is unset or malformed.
fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring malformed {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 8] = [
        "NAV_ADMIN_KEY",
        "NAV_DB_PATH",
        "NAV_CREDENTIAL_PATH",
        "NAV_UPLOAD_DIR",
        "NAV_MAX_UPLOAD_BYTES",
        "NAV_ANNOUNCEMENT_VIEW_TTL_SECS",
        "NAV_BIND_ADDR",
        "NAV_LOG_LEVEL",
    ];

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        for key in KEYS {
            env::remove_var(key);
        }

        let config = Config::from_env();

        assert!(config.admin_key.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/nav.sqlite"));
        assert_eq!(
            config.credential_path,
            PathBuf::from("./data/admin_password.json")
        );
        assert_eq!(config.upload_dir, PathBuf::from("./temp"));
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(
            config.announcement_view_ttl,
            Duration::from_secs(DEFAULT_ANNOUNCEMENT_VIEW_TTL_SECS)
        );
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_parse_or_falls_back_on_garbage() {
        env::set_var("NAV_TEST_PARSE_OR", "not-a-number");
        assert_eq!(parse_or("NAV_TEST_PARSE_OR", 42usize), 42);

        env::set_var("NAV_TEST_PARSE_OR", "7");
        assert_eq!(parse_or("NAV_TEST_PARSE_OR", 42usize), 7);

        env::remove_var("NAV_TEST_PARSE_OR");
    }
}
