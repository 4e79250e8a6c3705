//! Courier deposit wizard: choose a locker and size, name the recipient, then
//! walk the parcel through create, reserve, deposit and ready.

use tracing::{debug, info};

use crate::api::{lockers, parcels};
use crate::error::{FlowError, FlowResult};
use crate::http::HttpClient;
use crate::models::{AvailableLocker, CompartmentSize, ParcelFlow, ParcelStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum CourierStep {
    #[default]
    SelectLocker = 1,
    SelectSize = 2,
    Recipient = 3,
    Done = 4,
}

/// What the courier sees once the parcel is in the locker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositSummary {
    pub parcel_id: String,
    pub compartment_id: Option<String>,
    pub status: Option<ParcelStatus>,
}

impl DepositSummary {
    /// Later responses win; empty values never overwrite earlier ones
    fn from_steps(steps: &[&ParcelFlow]) -> Self {
        let mut summary = DepositSummary {
            parcel_id: String::new(),
            compartment_id: None,
            status: None,
        };
        for step in steps {
            if !step.parcel_id.is_empty() {
                summary.parcel_id = step.parcel_id.clone();
            }
            if let Some(id) = step.compartment_id.as_ref().filter(|id| !id.is_empty()) {
                summary.compartment_id = Some(id.clone());
            }
            if step.status.is_some() {
                summary.status = step.status;
            }
        }
        summary
    }
}

pub struct CourierStore {
    http: HttpClient,
    pub step: CourierStep,
    pub lockers: Vec<AvailableLocker>,
    pub locker_id: Option<String>,
    pub size: Option<CompartmentSize>,
    pub use_self_recipient: bool,
    pub recipient_id: Option<String>,
    pub summary: Option<DepositSummary>,
    pub loading_lockers: bool,
    pub submitting: bool,
}

impl CourierStore {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            step: CourierStep::SelectLocker,
            lockers: Vec::new(),
            locker_id: None,
            size: None,
            use_self_recipient: true,
            recipient_id: None,
            summary: None,
            loading_lockers: false,
            submitting: false,
        }
    }

    /// Load lockers that accept deposits; ignored while a load is running
    pub async fn load_lockers(&mut self) -> FlowResult<()> {
        if self.loading_lockers {
            debug!("Locker list already loading");
            return Ok(());
        }

        self.loading_lockers = true;
        let result = lockers::list_available_lockers(&self.http).await;
        self.loading_lockers = false;

        self.lockers = result?;
        Ok(())
    }

    pub fn set_locker_id(&mut self, locker_id: impl Into<String>) {
        self.locker_id = Some(locker_id.into()).filter(|id: &String| !id.is_empty());
    }

    pub fn set_size(&mut self, size: CompartmentSize) {
        self.size = Some(size);
    }

    pub fn set_use_self_recipient(&mut self, value: bool) {
        self.use_self_recipient = value;
    }

    pub fn set_recipient_id(&mut self, recipient_id: impl Into<String>) {
        self.recipient_id = Some(recipient_id.into()).filter(|id: &String| !id.is_empty());
    }

    pub fn set_step(&mut self, step: CourierStep) {
        self.step = step;
    }

    /// Recipient to deposit for: the courier themself or the entered id
    pub fn effective_recipient<'a>(&'a self, courier_id: &'a str) -> Option<&'a str> {
        if self.use_self_recipient {
            Some(courier_id)
        } else {
            self.recipient_id.as_deref()
        }
    }

    /// Run the four backend steps in order and record the summary.
    ///
    /// Stops at the first failing step; the form is left untouched in that
    /// case so the courier can retry.
    pub async fn complete_deposit(&mut self, courier_id: &str, recipient_id: &str) -> FlowResult<DepositSummary> {
        let (Some(locker_id), Some(size)) = (self.locker_id.clone(), self.size) else {
            return Err(FlowError::InvalidState("INVALID_STATE"));
        };
        if courier_id.is_empty() || recipient_id.is_empty() {
            return Err(FlowError::InvalidState("INVALID_STATE"));
        }

        self.submitting = true;
        let result = self
            .run_steps(parcels::CreateParcel {
                locker_id,
                size,
                courier_id: courier_id.to_string(),
                recipient_id: recipient_id.to_string(),
                expires_at: None,
            })
            .await;
        self.submitting = false;

        let summary = result?;
        info!(
            "📦 Parcel {} ready in compartment {}",
            summary.parcel_id,
            summary.compartment_id.as_deref().unwrap_or("-")
        );

        self.locker_id = None;
        self.size = None;
        self.recipient_id = None;
        self.use_self_recipient = true;
        self.summary = Some(summary.clone());
        self.step = CourierStep::Done;
        Ok(summary)
    }

    async fn run_steps(&self, request: parcels::CreateParcel) -> FlowResult<DepositSummary> {
        let created = parcels::create_parcel(&self.http, &request).await?;
        if created.parcel_id.is_empty() {
            return Err(FlowError::InvalidState("MISSING_PARCEL_ID"));
        }
        let parcel_id = created.parcel_id.clone();
        debug!("Created parcel {}", parcel_id);

        let reserved = parcels::reserve_parcel(&self.http, &parcel_id).await?;
        let deposited = parcels::deposit_parcel(&self.http, &parcel_id).await?;
        let ready = parcels::ready_parcel(&self.http, &parcel_id, None).await?;

        Ok(DepositSummary::from_steps(&[
            &created, &reserved, &deposited, &ready,
        ]))
    }

    pub fn reset(&mut self) {
        let http = self.http.clone();
        *self = Self::new(http);
    }
}
