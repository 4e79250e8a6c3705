use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use parcel_locker_client::guard::Section;
use parcel_locker_client::models::CompartmentSize;
use parcel_locker_client::store::{CourierStep, CourierStore};

use super::AppContext;

#[derive(Subcommand, Debug)]
pub enum CourierCommand {
    /// List lockers that accept deposits
    Lockers,

    /// Create a parcel and put it in a locker
    Deposit(CourierDepositArgs),
}

#[derive(Args, Debug)]
pub struct CourierDepositArgs {
    /// Locker id (chosen from a list when omitted)
    #[arg(long)]
    pub locker: Option<String>,

    /// Compartment size: S, M or L
    #[arg(long)]
    pub size: CompartmentSize,

    /// Recipient user id; the parcel is addressed to yourself when omitted
    #[arg(long)]
    pub recipient: Option<String>,
}

pub async fn run(ctx: &mut AppContext, cmd: CourierCommand) -> Result<()> {
    let courier_id = ctx.session.require(Section::Courier)?.user_id.clone();
    let mut store = CourierStore::new(ctx.http.clone());

    match cmd {
        CourierCommand::Lockers => {
            store.load_lockers().await.context("Failed to load lockers")?;
            if store.lockers.is_empty() {
                println!("No lockers are accepting deposits");
            }
            for locker in &store.lockers {
                println!("{}  {}", locker.locker_id, locker.label());
            }
            Ok(())
        }
        CourierCommand::Deposit(args) => deposit(ctx, &mut store, &courier_id, args).await,
    }
}

async fn deposit(
    ctx: &mut AppContext,
    store: &mut CourierStore,
    courier_id: &str,
    args: CourierDepositArgs,
) -> Result<()> {
    // Step 1: locker
    let locker_id = match args.locker {
        Some(id) => id,
        None => {
            store.load_lockers().await.context("Failed to load lockers")?;
            if store.lockers.is_empty() {
                bail!("No lockers are accepting deposits right now");
            }
            for (i, locker) in store.lockers.iter().enumerate() {
                println!("  {}. {}", i + 1, locker.label());
            }
            let idx = ctx.prompt.choose("Locker", store.lockers.len()).await?;
            store.lockers[idx].locker_id.clone()
        }
    };
    store.set_locker_id(locker_id);
    store.set_step(CourierStep::SelectSize);

    // Step 2: size
    store.set_size(args.size);
    store.set_step(CourierStep::Recipient);

    // Step 3: recipient
    if let Some(recipient) = args.recipient {
        store.set_use_self_recipient(false);
        store.set_recipient_id(recipient);
    }
    let recipient_id = store
        .effective_recipient(courier_id)
        .map(str::to_string)
        .context("Recipient id is required")?;

    println!("📦 Creating parcel for {}...", recipient_id);
    let summary = store
        .complete_deposit(courier_id, &recipient_id)
        .await
        .context("Deposit failed")?;

    // Step 4: done
    println!("✅ Parcel is in the locker");
    println!("   Parcel ID:   {}", summary.parcel_id);
    println!(
        "   Compartment: {}",
        summary.compartment_id.as_deref().unwrap_or("-")
    );
    if let Some(status) = summary.status {
        println!("   Status:      {}", status);
    }
    Ok(())
}
