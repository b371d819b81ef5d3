//! Configuration module for the Pet Care backend.
//!
//! All configuration is loaded from environment variables with sensible
//! defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Fallback signing secret for local development only.
pub const DEV_JWT_SECRET: &str = "change-this-in-production";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// HS256 secret for signing bearer tokens
    pub jwt_secret: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Bootstrap admin account, created at startup when absent
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("PETCARE_DB_PATH")
            .unwrap_or_else(|_| "./data/petcare.sqlite".to_string())
            .into();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());

        let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
        let bind_addr = env::var("PETCARE_BIND_ADDR")
            .unwrap_or_else(|_| format!("127.0.0.1:{}", port))
            .parse()
            .expect("Invalid PETCARE_BIND_ADDR format");

        let log_level = env::var("PETCARE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let admin_email = env::var("PETCARE_ADMIN_EMAIL").ok();
        let admin_password = env::var("PETCARE_ADMIN_PASSWORD").ok();

        Self {
            db_path,
            jwt_secret,
            bind_addr,
            log_level,
            admin_email,
            admin_password,
        }
    }

    /// True when the server is running with the development fallback secret.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("PETCARE_DB_PATH");
        env::remove_var("JWT_SECRET");
        env::remove_var("PORT");
        env::remove_var("PETCARE_BIND_ADDR");
        env::remove_var("PETCARE_LOG_LEVEL");
        env::remove_var("PETCARE_ADMIN_EMAIL");
        env::remove_var("PETCARE_ADMIN_PASSWORD");

        let config = Config::from_env();

        assert_eq!(config.db_path, PathBuf::from("./data/petcare.sqlite"));
        assert!(config.uses_dev_secret());
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.log_level, "info");
        assert!(config.admin_email.is_none());
    }
}
