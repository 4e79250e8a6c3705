use anyhow::{Context, Result};
use clap::Subcommand;

use parcel_locker_client::guard::Section;
use parcel_locker_client::store::RecipientStore;

use super::{when, AppContext};

#[derive(Subcommand, Debug)]
pub enum RecipientCommand {
    /// Show your active parcel
    Parcel,

    /// Verify an OTP and collect your active parcel
    Pickup,
}

pub async fn run(ctx: &mut AppContext, cmd: RecipientCommand) -> Result<()> {
    let recipient_id = ctx.session.require(Section::Recipient)?.user_id.clone();
    let mut store = RecipientStore::new(ctx.http.clone());

    let Some(parcel) = store
        .fetch_parcel(&recipient_id)
        .await
        .context("Failed to load your parcel")?
    else {
        println!("📭 You have no parcels waiting");
        return Ok(());
    };

    println!("📦 Parcel {}", parcel.parcel_code);
    println!("   Status:     {}", parcel.status);
    println!("   Locker:     {}", parcel.locker_id);
    println!("   Collect by: {}", when(parcel.expires_at));

    if let RecipientCommand::Pickup = cmd {
        store
            .request_otp()
            .await
            .context("Failed to request a one-time code")?;
        println!("📱 A one-time code was sent to your phone");

        let code = ctx.prompt.ask("OTP").await?;
        store.verify_otp(&code).await.context("Verification failed")?;
        store.pickup().await.context("Pickup failed")?;
        println!("✅ Parcel collected, your compartment is open");
    }
    Ok(())
}
