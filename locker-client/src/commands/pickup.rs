use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use parcel_locker_client::error::FlowError;
use parcel_locker_client::store::{PickupStep, PickupStore};

use super::{when, AppContext};

/// Wrong codes allowed before giving up
const OTP_ATTEMPTS: usize = 3;

#[derive(Subcommand, Debug)]
pub enum PickupCommand {
    /// Verify with a one-time code sent to your phone
    Phone(PhoneArgs),

    /// Use the pickup code you received at deposit time
    Code(CodeArgs),
}

#[derive(Args, Debug)]
pub struct PhoneArgs {
    /// Phone number the parcel was sent to
    #[arg(short, long)]
    pub phone: String,

    /// Parcel to collect (chosen from the list when omitted)
    #[arg(long)]
    pub parcel: Option<String>,
}

#[derive(Args, Debug)]
pub struct CodeArgs {
    #[arg(short, long)]
    pub phone: String,

    #[arg(short, long)]
    pub code: String,
}

pub async fn run(ctx: &mut AppContext, cmd: PickupCommand) -> Result<()> {
    let mut store = PickupStore::new(ctx.http.clone());

    match cmd {
        PickupCommand::Phone(args) => with_phone(ctx, &mut store, args).await,
        PickupCommand::Code(args) => {
            if store.use_pickup_code(&args.phone, &args.code).is_err() {
                bail!("❌ {}", store.error.as_deref().unwrap_or("Invalid pickup code"));
            }
            println!("✅ Enter code {} at the locker to open your compartment", args.code);
            Ok(())
        }
    }
}

async fn with_phone(ctx: &mut AppContext, store: &mut PickupStore, args: PhoneArgs) -> Result<()> {
    // Phone -> Otp
    if store.request_otp(&args.phone).await.is_err() {
        bail!("❌ {}", error_text(store));
    }
    println!("📱 A one-time code was sent to {}", args.phone);

    // Otp -> List
    let mut attempts = 0;
    while store.step == PickupStep::Otp {
        let code = ctx.prompt.ask("OTP").await?;
        match store.verify_otp(&code).await {
            Ok(_) => {}
            Err(e) => {
                attempts += 1;
                if attempts >= OTP_ATTEMPTS || matches!(e, FlowError::InvalidState(_)) {
                    bail!("❌ {}", error_text(store));
                }
                println!("❌ {}", error_text(store));
            }
        }
    }

    if store.parcels.is_empty() {
        println!("No parcels are waiting for {}", args.phone);
        return Ok(());
    }

    println!("📦 Parcels waiting for you:");
    for (i, parcel) in store.parcels.iter().enumerate() {
        println!(
            "  {}. {}  locker {}  size {}  collect by {}",
            i + 1,
            parcel.parcel_code,
            parcel.locker_id,
            parcel.size.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
            when(parcel.expires_at)
        );
    }

    let parcel_id = match args.parcel {
        Some(id) => id,
        None => {
            let idx = ctx.prompt.choose("Parcel", store.parcels.len()).await?;
            store.parcels[idx].parcel_id.clone()
        }
    };
    if let Err(e) = store.select_parcel(&parcel_id) {
        bail!("❌ {}", e);
    }

    // List -> Done
    if store.confirm_pickup().await.is_err() {
        bail!("❌ {}", error_text(store));
    }

    let Some(confirmation) = &store.confirmation else {
        bail!("Pickup finished without a confirmation");
    };
    println!("✅ Pickup confirmed, your compartment is open");
    if let Some(parcel) = &store.collected {
        println!("   Parcel code: {}", parcel.parcel_code);
    }
    println!("   Picked up:   {}", when(confirmation.picked_up_at));
    if confirmation.overdue_days > 0 {
        println!(
            "   Overdue:     {} day(s), fee {} {}",
            confirmation.overdue_days, confirmation.overdue_fee, ctx.config.overdue_currency
        );
    }
    Ok(())
}

fn error_text(store: &PickupStore) -> &str {
    store
        .error
        .as_deref()
        .unwrap_or("Something went wrong. Please try again.")
}
