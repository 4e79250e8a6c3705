use anyhow::{bail, Context, Result};
use clap::Args;

use parcel_locker_client::models::CompartmentSize;
use parcel_locker_client::store::DepositStore;

use super::AppContext;

#[derive(Args, Debug)]
pub struct DepositArgs {
    /// Locker id (chosen from a list when omitted)
    #[arg(long)]
    pub locker: Option<String>,

    /// Phone number of the person collecting the parcel
    #[arg(long)]
    pub receiver_phone: String,

    /// Phone number of the sender
    #[arg(long)]
    pub sender_phone: String,

    /// Compartment size: S, M or L
    #[arg(long)]
    pub size: CompartmentSize,
}

pub async fn run(ctx: &mut AppContext, args: DepositArgs) -> Result<()> {
    let mut store = DepositStore::new(ctx.http.clone());

    // Step 1: locker and phone numbers
    store.load_lockers().await.context("Failed to load lockers")?;
    if store.lockers.is_empty() {
        bail!("No lockers are accepting deposits right now");
    }

    let locker_id = match args.locker {
        Some(id) => id,
        None => {
            println!("📍 Available lockers:");
            for (i, locker) in store.lockers.iter().enumerate() {
                println!("  {}. {}", i + 1, locker.label());
            }
            let idx = ctx.prompt.choose("Locker", store.lockers.len()).await?;
            store.lockers[idx].locker_id.clone()
        }
    };

    if let Err(e) = store.set_details(&locker_id, &args.receiver_phone, &args.sender_phone) {
        bail!("❌ {}", e);
    }

    // Step 2: size, then confirm
    store.set_size(args.size);
    println!(
        "📦 Depositing a size {} parcel at {}",
        args.size,
        store.locker_label.as_deref().unwrap_or(&locker_id)
    );

    if store.confirm().await.is_err() {
        let message = store.error.as_deref().unwrap_or("System error. Please try again.");
        bail!("❌ {}", message);
    }

    // Step 3: compartment is open
    let Some(result) = &store.result else {
        bail!("Deposit finished without a result");
    };
    println!("✅ Compartment open, place the parcel inside and close the door");
    println!("   Parcel ID:   {}", result.parcel_id);
    println!("   Parcel code: {}", result.parcel_code);
    if let Some(code) = &result.pickup_code {
        println!("   Pickup code: {} (share with the receiver)", code);
    }
    println!("   Status:      {}", result.status);
    Ok(())
}
