//! Terminal pages. Each subcommand binds one store to its API calls and
//! renders the store state after every step.

mod admin;
mod auth;
mod courier;
mod deposit;
mod pickup;
mod prompt;
mod recipient;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use parcel_locker_client::config::Config;
use parcel_locker_client::http::HttpClient;
use parcel_locker_client::session::SessionStore;

pub use prompt::Prompt;

/// Smart parcel locker client
#[derive(Parser, Debug)]
#[command(name = "parcel-locker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides API_BASE_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session file (overrides SESSION_FILE)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and keep the session for later commands
    Login(auth::LoginArgs),

    /// Create an account
    Register(auth::RegisterArgs),

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Deposit a parcel at a kiosk (no account needed)
    Deposit(deposit::DepositArgs),

    /// Courier pages
    #[command(subcommand)]
    Courier(courier::CourierCommand),

    /// Collect a parcel with a phone OTP or a pickup code (no account needed)
    #[command(subcommand)]
    Pickup(pickup::PickupCommand),

    /// Recipient pages
    #[command(subcommand)]
    Recipient(recipient::RecipientCommand),

    /// Admin pages
    #[command(subcommand)]
    Admin(admin::AdminCommand),
}

/// Everything a page needs: configuration, the shared HTTP client and the
/// persisted session
pub struct AppContext {
    pub config: Config,
    pub http: HttpClient,
    pub session: SessionStore,
    pub prompt: Prompt,
}

impl AppContext {
    pub fn new(config: Config, http: HttpClient, session: SessionStore) -> Self {
        Self {
            config,
            http,
            session,
            prompt: Prompt::new(),
        }
    }
}

pub async fn run(command: Command, ctx: &mut AppContext) -> Result<()> {
    match command {
        Command::Login(args) => auth::login(ctx, args).await,
        Command::Register(args) => auth::register(ctx, args).await,
        Command::Logout => auth::logout(ctx).await,
        Command::Whoami => auth::whoami(ctx).await,
        Command::Deposit(args) => deposit::run(ctx, args).await,
        Command::Courier(cmd) => courier::run(ctx, cmd).await,
        Command::Pickup(cmd) => pickup::run(ctx, cmd).await,
        Command::Recipient(cmd) => recipient::run(ctx, cmd).await,
        Command::Admin(cmd) => admin::run(ctx, cmd).await,
    }
}

/// Format an optional timestamp for display
pub(crate) fn when(ts: Option<chrono::DateTime<chrono::Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}
