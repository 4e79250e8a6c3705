use anyhow::{Context, Result};
use clap::Args;

use parcel_locker_client::models::Role;

use super::AppContext;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Phone number
    #[arg(short, long)]
    pub phone: String,

    /// Password (asked for when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Phone number
    #[arg(short, long)]
    pub phone: String,

    /// Password (asked for when omitted)
    #[arg(long)]
    pub password: Option<String>,

    /// ADMIN, COURIER or RECIPIENT
    #[arg(long, default_value = "RECIPIENT")]
    pub role: Role,
}

pub async fn login(ctx: &mut AppContext, args: LoginArgs) -> Result<()> {
    let password = match args.password {
        Some(p) => p,
        None => ctx.prompt.ask("Password").await?,
    };

    let session = ctx
        .session
        .login(&args.phone, &password)
        .await
        .context("Login failed")?;

    println!("✅ Signed in as {} ({})", session.user_id, session.role);
    Ok(())
}

pub async fn register(ctx: &mut AppContext, args: RegisterArgs) -> Result<()> {
    let password = match args.password {
        Some(p) => p,
        None => ctx.prompt.ask("Password").await?,
    };

    let created = ctx
        .session
        .register(&args.phone, &password, args.role)
        .await
        .context("Registration failed")?;

    println!("✅ Account created: {} ({})", created.user_id, created.role);
    println!("   Sign in with: parcel-locker login --phone {}", args.phone);
    Ok(())
}

pub async fn logout(ctx: &mut AppContext) -> Result<()> {
    ctx.session.logout().await.context("Logout failed")?;
    println!("👋 Signed out");
    Ok(())
}

pub async fn whoami(ctx: &mut AppContext) -> Result<()> {
    if !ctx.session.is_signed_in() {
        println!("Not signed in");
        return Ok(());
    }

    let session = ctx
        .session
        .refresh()
        .await
        .context("Failed to load current user")?;

    println!("User:  {}", session.user_id);
    println!("Role:  {}", session.role);
    if let Some(phone) = &session.phone {
        println!("Phone: {}", phone);
    }
    Ok(())
}
