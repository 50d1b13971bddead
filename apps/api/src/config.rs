use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default, so a bare `resume-api` starts out of the box.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory holding the collection file (`resumes.json`).
    pub data_dir: PathBuf,
    /// Directory of static PWA assets served at `/`.
    pub static_dir: PathBuf,
    /// When true, 500 responses include the underlying error text.
    pub dev_mode: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            data_dir: PathBuf::from(
                std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            ),
            static_dir: PathBuf::from(
                std::env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
            ),
            dev_mode: std::env::var("APP_ENV")
                .map(|v| v == "development")
                .unwrap_or(false),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
