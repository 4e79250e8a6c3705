use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::http::DEFAULT_BASE_URL;

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Locker backend
    pub api_base_url: String,
    pub api_timeout_seconds: u64,

    // Where the signed-in session is kept between invocations
    pub session_file: PathBuf,

    // Suffix printed after overdue fees
    pub overdue_currency: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenv::dotenv().ok();

        let api_base_url = env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let api_timeout_seconds = env::var("API_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("API_TIMEOUT_SECONDS must be a valid number")?;

        let session_file = match env::var("SESSION_FILE") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_session_file()?,
        };

        let overdue_currency = env::var("OVERDUE_CURRENCY").unwrap_or_else(|_| "THB".to_string());

        Ok(Self {
            api_base_url,
            api_timeout_seconds,
            session_file,
            overdue_currency,
        })
    }

    /// Apply command line overrides on top of the environment
    pub fn with_overrides(mut self, api_url: Option<String>, session_file: Option<PathBuf>) -> Self {
        if let Some(url) = api_url {
            self.api_base_url = url;
        }
        if let Some(path) = session_file {
            self.session_file = path;
        }
        self
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_seconds)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            anyhow::bail!("API base URL cannot be empty");
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            anyhow::bail!("API base URL must start with http:// or https://");
        }

        if self.api_timeout_seconds == 0 || self.api_timeout_seconds > 300 {
            anyhow::bail!("API timeout must be between 1 and 300 seconds");
        }

        if self.session_file.as_os_str().is_empty() {
            anyhow::bail!("Session file path cannot be empty");
        }

        Ok(())
    }
}

fn default_session_file() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine the user config directory")?;
    Ok(dir.join("parcel-locker").join("session.json"))
}
