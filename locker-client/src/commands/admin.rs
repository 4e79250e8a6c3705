use anyhow::{bail, Context, Result};
use clap::Subcommand;

use parcel_locker_client::api::{locations::CreateLocation, lockers::CreateLocker, parcels};
use parcel_locker_client::guard::Section;
use parcel_locker_client::models::LockerStatus;
use parcel_locker_client::store::{AdminStore, SetupStep};
use parcel_locker_client::validation;

use super::AppContext;

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Manage locations
    #[command(subcommand)]
    Locations(LocationAction),

    /// Manage lockers
    #[command(subcommand)]
    Lockers(LockerAction),

    /// Manage compartments of a locker
    #[command(subcommand)]
    Compartments(CompartmentAction),

    /// Show dashboard counters
    Overview,

    /// Set up a new site: location, locker and compartments
    Setup,

    /// Expire parcels whose pickup window has passed
    Expire,
}

#[derive(Subcommand, Debug)]
pub enum LocationAction {
    List,
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: Option<String>,
        /// Create the location as inactive
        #[arg(long)]
        inactive: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum LockerAction {
    List,
    Create {
        #[arg(long)]
        location: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Set a locker to ACTIVE, MAINTENANCE or DISABLED
    Status {
        #[arg(long)]
        locker: String,
        #[arg(long)]
        status: LockerStatus,
    },
}

#[derive(Subcommand, Debug)]
pub enum CompartmentAction {
    List {
        #[arg(long)]
        locker: String,
    },
    /// Create compartments from rows like `1-4:S 5-6:M 7:L`
    Create {
        #[arg(long)]
        locker: String,
        #[arg(required = true)]
        rows: Vec<String>,
    },
}

pub async fn run(ctx: &mut AppContext, cmd: AdminCommand) -> Result<()> {
    ctx.session.require(Section::Admin)?;
    let mut store = AdminStore::new(ctx.http.clone());

    match cmd {
        AdminCommand::Locations(action) => locations(&mut store, action).await,
        AdminCommand::Lockers(action) => lockers(&mut store, action).await,
        AdminCommand::Compartments(action) => compartments(&mut store, action).await,
        AdminCommand::Overview => {
            let overview = store.load_overview().await.context("Failed to load overview")?;
            println!("📊 Overview");
            for (metric, value) in &overview.metrics {
                println!("  {:<28} {}", metric, value);
            }
            Ok(())
        }
        AdminCommand::Setup => setup(ctx, &mut store).await,
        AdminCommand::Expire => {
            parcels::run_expire_job(&ctx.http)
                .await
                .context("Expire job failed")?;
            println!("✅ Expired parcels past their pickup window");
            Ok(())
        }
    }
}

async fn locations(store: &mut AdminStore, action: LocationAction) -> Result<()> {
    match action {
        LocationAction::List => {
            let list = store.load_locations().await.context("Failed to load locations")?;
            for location in list {
                let active = match location.is_active {
                    Some(false) => "inactive",
                    _ => "active",
                };
                println!(
                    "{}  {:<10} {} ({})",
                    location.location_id, location.code, location.name, active
                );
            }
        }
        LocationAction::Create {
            code,
            name,
            address,
            inactive,
        } => {
            let request = CreateLocation {
                code,
                name,
                address,
                is_active: Some(!inactive),
            };
            let location = store
                .create_location(&request)
                .await
                .context("Failed to create location")?;
            println!("✅ Location {} created: {}", location.code, location.location_id);
        }
    }
    Ok(())
}

async fn lockers(store: &mut AdminStore, action: LockerAction) -> Result<()> {
    match action {
        LockerAction::List => {
            let list = store.load_lockers().await.context("Failed to load lockers")?;
            for locker in list {
                println!(
                    "{}  {:<10} {:<20} {}",
                    locker.locker_id,
                    locker.locker_code,
                    locker.location_name.as_deref().unwrap_or("-"),
                    locker
                        .status
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
            }
        }
        LockerAction::Create {
            location,
            code,
            name,
        } => {
            let request = CreateLocker {
                location_id: location,
                locker_code: code,
                name,
            };
            let locker = store
                .create_locker(&request)
                .await
                .context("Failed to create locker")?;
            println!("✅ Locker {} created: {}", locker.locker_code, locker.locker_id);
        }
        LockerAction::Status { locker, status } => {
            let status = store
                .update_locker_status(&locker, status)
                .await
                .context("Failed to update locker status")?;
            println!("✅ Locker {} is now {}", locker, status);
        }
    }
    Ok(())
}

async fn compartments(store: &mut AdminStore, action: CompartmentAction) -> Result<()> {
    match action {
        CompartmentAction::List { locker } => {
            let list = store
                .load_compartments(&locker)
                .await
                .context("Failed to load compartments")?;
            for c in list {
                println!(
                    "#{:<4} {:<2} {:<15} {}",
                    c.compartment_no,
                    c.size.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                    c.status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                    c.compartment_id
                );
            }
        }
        CompartmentAction::Create { locker, rows } => {
            let specs = validation::compartment_rows(&rows)?;
            let created = store
                .create_compartments(&locker, &specs)
                .await
                .context("Failed to create compartments")?;
            println!(
                "✅ Created {} compartment(s), locker now has {}",
                created,
                store.compartments_for(&locker).len()
            );
        }
    }
    Ok(())
}

/// Guided setup; each step only runs after the previous one succeeded
async fn setup(ctx: &mut AppContext, store: &mut AdminStore) -> Result<()> {
    store.reset_setup();

    while store.setup_step != SetupStep::Finished {
        match store.setup_step {
            SetupStep::Location => {
                println!("📍 Step 1/3: location");
                let request = CreateLocation {
                    code: ctx.prompt.ask("Location code").await?,
                    name: ctx.prompt.ask("Location name").await?,
                    address: Some(ctx.prompt.ask("Address (optional)").await?)
                        .filter(|a| !a.is_empty()),
                    is_active: Some(true),
                };
                if let Err(e) = store.create_location(&request).await {
                    println!("❌ {}", e);
                }
            }
            SetupStep::Locker => {
                println!("🗄️ Step 2/3: locker");
                let Some(location_id) = store.last_location_id.clone() else {
                    bail!("Location was not recorded");
                };
                let request = CreateLocker {
                    location_id,
                    locker_code: ctx.prompt.ask("Locker code").await?,
                    name: Some(ctx.prompt.ask("Locker name (optional)").await?)
                        .filter(|n| !n.is_empty()),
                };
                if let Err(e) = store.create_locker(&request).await {
                    println!("❌ {}", e);
                }
            }
            SetupStep::Compartments => {
                println!("🔢 Step 3/3: compartments (e.g. 1-4:S 5-6:M 7:L)");
                let Some(locker_id) = store.last_locker_id.clone() else {
                    bail!("Locker was not recorded");
                };
                let line = ctx.prompt.ask("Rows").await?;
                let rows: Vec<&str> = line.split_whitespace().collect();
                let specs = match validation::compartment_rows(&rows) {
                    Ok(specs) => specs,
                    Err(e) => {
                        println!("❌ {}", e);
                        continue;
                    }
                };
                if let Err(e) = store.create_compartments(&locker_id, &specs).await {
                    println!("❌ {}", e);
                }
            }
            SetupStep::Finished => {}
        }
    }

    println!("✅ Setup finished");
    if let Some(id) = &store.last_location_id {
        println!("   Location: {}", id);
    }
    if let Some(id) = &store.last_locker_id {
        println!("   Locker:   {}", id);
        println!("   Compartments: {}", store.compartments_for(id).len());
    }
    Ok(())
}
