use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// `DATABASE_URL` is required at startup. The Moveware credentials are read
/// here but validated lazily by `Moveware::client`, so a portal instance can
/// boot (and serve cached data) with an incomplete upstream configuration;
/// affected requests fail with a configuration error instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub moveware_api_url: String,
    pub moveware_username: String,
    pub moveware_password: String,
    pub moveware_api_version: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            moveware_api_url: optional_env("MOVEWARE_API_URL"),
            moveware_username: optional_env("MOVEWARE_USERNAME"),
            moveware_password: optional_env("MOVEWARE_PASSWORD"),
            moveware_api_version: std::env::var("MOVEWARE_API_VERSION")
                .unwrap_or_else(|_| "api".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> String {
    std::env::var(key).unwrap_or_default()
}
