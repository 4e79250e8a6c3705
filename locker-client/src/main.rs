mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use parcel_locker_client::config::Config;
use parcel_locker_client::http::HttpClient;
use parcel_locker_client::session::SessionStore;

use commands::{AppContext, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for page output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parcel_locker_client=info,parcel_locker=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_overrides(cli.api_url.clone(), cli.session_file.clone());
    config.validate().context("Invalid configuration")?;

    debug!("Locker API: {}", config.api_base_url);
    debug!("Session file: {}", config.session_file.display());

    // Initialize API client
    let http = HttpClient::new(config.api_base_url.clone(), config.api_timeout())
        .context("Failed to create API client")?;

    let session = SessionStore::open(http.clone(), config.session_file.clone())
        .context("Failed to open session")?;
    if let Some(s) = session.session() {
        debug!("Signed in as {} ({})", s.user_id, s.role);
    }

    let mut ctx = AppContext::new(config, http, session);
    commands::run(cli.command, &mut ctx).await
}
