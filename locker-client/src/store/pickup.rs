//! Public pickup wizard.
//!
//! Phone path: `Phone -> Otp -> List -> Done`. The OTP is traded for a pickup
//! token which authorizes listing and confirming parcels.
//! Code path: `Code -> Done`, the pickup code is entered at the locker itself.

use tracing::{info, warn};

use crate::api::pickup;
use crate::error::{ApiError, FlowError, FlowResult, ValidationError};
use crate::http::HttpClient;
use crate::models::{PickupConfirmation, PickupParcel};
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickupStep {
    #[default]
    Phone,
    Otp,
    List,
    Code,
    Done,
}

pub struct PickupStore {
    http: HttpClient,
    pub step: PickupStep,
    pub phone: Option<String>,
    pub otp_ref: Option<String>,
    pub otp_code: Option<String>,
    pub pickup_code: Option<String>,
    pub pickup_token: Option<String>,
    pub parcels: Vec<PickupParcel>,
    pub selected_parcel_id: Option<String>,
    /// Parcel that was just collected, kept for the final screen
    pub collected: Option<PickupParcel>,
    pub confirmation: Option<PickupConfirmation>,
    pub submitting: bool,
    pub error: Option<String>,
}

impl PickupStore {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            step: PickupStep::Phone,
            phone: None,
            otp_ref: None,
            otp_code: None,
            pickup_code: None,
            pickup_token: None,
            parcels: Vec::new(),
            selected_parcel_id: None,
            collected: None,
            confirmation: None,
            submitting: false,
            error: None,
        }
    }

    pub async fn request_otp(&mut self, phone: &str) -> FlowResult<&str> {
        let phone = validation::phone(phone).map_err(|e| self.invalid(e))?;

        self.submitting = true;
        self.error = None;
        let result = pickup::request_otp(&self.http, &phone).await;
        self.submitting = false;

        let requested = result.map_err(|e| self.fail(e, request_otp_error_message))?;
        let Some(otp_ref) = requested.otp_ref.filter(|r| !r.is_empty()) else {
            warn!("OTP request for {} returned no otp_ref", phone);
            return Err(self.fail(ApiError::InvalidResponse, request_otp_error_message));
        };

        info!("OTP sent to {}", phone);
        self.pickup_code = None;
        self.phone = Some(phone);
        self.otp_code = None;
        self.pickup_token = None;
        self.step = PickupStep::Otp;
        Ok(self.otp_ref.insert(otp_ref).as_str())
    }

    /// Verify the OTP, keep the pickup token and load the waiting parcels
    pub async fn verify_otp(&mut self, otp_code: &str) -> FlowResult<&[PickupParcel]> {
        let otp_code = validation::otp_code(otp_code).map_err(|e| self.invalid(e))?;
        let (Some(phone), Some(otp_ref)) = (self.phone.clone(), self.otp_ref.clone()) else {
            return Err(FlowError::InvalidState("NO_OTP_REF"));
        };

        self.submitting = true;
        self.error = None;
        let result = self.verify_and_list(&phone, &otp_ref, &otp_code).await;
        self.submitting = false;

        let (token, parcels) = result.map_err(|e| self.fail(e, ApiError::user_message))?;

        info!("🔓 Phone {} verified, {} parcel(s) waiting", phone, parcels.len());
        self.otp_code = Some(otp_code);
        self.pickup_token = Some(token);
        self.parcels = parcels;
        self.selected_parcel_id = None;
        self.step = PickupStep::List;
        Ok(self.parcels.as_slice())
    }

    async fn verify_and_list(
        &self,
        phone: &str,
        otp_ref: &str,
        otp_code: &str,
    ) -> Result<(String, Vec<PickupParcel>), ApiError> {
        let grant = pickup::verify_otp(&self.http, phone, otp_ref, otp_code).await?;
        let parcels = pickup::list_parcels(&self.http, &grant.pickup_token).await?;
        Ok((grant.pickup_token, parcels))
    }

    pub fn select_parcel(&mut self, parcel_id: &str) -> FlowResult<()> {
        if !self.parcels.iter().any(|p| p.parcel_id == parcel_id) {
            return Err(ValidationError::Invalid {
                field: "parcel",
                value: parcel_id.to_string(),
            }
            .into());
        }
        self.selected_parcel_id = Some(parcel_id.to_string());
        Ok(())
    }

    pub async fn confirm_pickup(&mut self) -> FlowResult<&PickupConfirmation> {
        let (Some(token), Some(parcel_id)) = (self.pickup_token.clone(), self.selected_parcel_id.clone()) else {
            return Err(FlowError::InvalidState("INVALID_STATE"));
        };

        self.submitting = true;
        self.error = None;
        let result = pickup::confirm_pickup(&self.http, &token, &parcel_id).await;
        self.submitting = false;

        let confirmation = result.map_err(|e| self.fail(e, ApiError::user_message))?;

        info!(
            "✅ Parcel {} picked up (overdue {} day(s), fee {})",
            confirmation.parcel_id, confirmation.overdue_days, confirmation.overdue_fee
        );
        if let Some(pos) = self.parcels.iter().position(|p| p.parcel_id == parcel_id) {
            self.collected = Some(self.parcels.remove(pos));
        }
        self.step = PickupStep::Done;
        Ok(&*self.confirmation.insert(confirmation))
    }

    /// Pickup with a code printed at deposit time; no backend call is made
    pub fn use_pickup_code(&mut self, phone: &str, code: &str) -> FlowResult<()> {
        self.reset();
        self.step = PickupStep::Code;

        let phone = validation::phone(phone).map_err(|e| self.invalid(e))?;
        let code = validation::pickup_code(code).map_err(|e| self.invalid(e))?;

        self.phone = Some(phone);
        self.pickup_code = Some(code);
        self.step = PickupStep::Done;
        Ok(())
    }

    pub fn reset(&mut self) {
        let http = self.http.clone();
        *self = Self::new(http);
    }

    fn invalid(&mut self, err: ValidationError) -> FlowError {
        self.error = Some(err.to_string());
        err.into()
    }

    fn fail(&mut self, err: ApiError, message: fn(&ApiError) -> &'static str) -> FlowError {
        self.error = Some(message(&err).to_string());
        err.into()
    }
}

/// Message shown when an OTP cannot be sent
pub fn request_otp_error_message(err: &ApiError) -> &'static str {
    match err.status() {
        Some(400) => "Invalid phone number. Please check and try again.",
        Some(429) => "Too many requests. Please wait before requesting another code.",
        _ => "Something went wrong. Please try again.",
    }
}
