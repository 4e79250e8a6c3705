//! Public kiosk deposit: pick a locker, enter both phone numbers, pick a size
//! and let the backend allocate and open a compartment.

use tracing::{info, warn};

use crate::api::{lockers, parcels};
use crate::error::{ApiError, FlowError, FlowResult, ValidationError};
use crate::http::HttpClient;
use crate::models::{AvailableLocker, CompartmentSize, KioskDeposit};
use crate::validation;

pub const MISSING_FIELDS: &str = "fill in all fields before confirming";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepositStep {
    #[default]
    Details,
    Size,
    Open,
}

pub struct DepositStore {
    http: HttpClient,
    pub step: DepositStep,
    pub lockers: Vec<AvailableLocker>,
    pub locker_id: Option<String>,
    pub locker_label: Option<String>,
    pub receiver_phone: Option<String>,
    pub sender_phone: Option<String>,
    pub size: Option<CompartmentSize>,
    pub result: Option<KioskDeposit>,
    pub loading: bool,
    pub submitting: bool,
    pub error: Option<String>,
}

impl DepositStore {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            step: DepositStep::Details,
            lockers: Vec::new(),
            locker_id: None,
            locker_label: None,
            receiver_phone: None,
            sender_phone: None,
            size: None,
            result: None,
            loading: false,
            submitting: false,
            error: None,
        }
    }

    pub async fn load_lockers(&mut self) -> FlowResult<&[AvailableLocker]> {
        self.loading = true;
        self.error = None;
        let result = lockers::list_available_lockers(&self.http).await;
        self.loading = false;

        match result {
            Ok(list) => {
                self.lockers = list;
                Ok(self.lockers.as_slice())
            }
            Err(e) => {
                self.error = Some(e.user_message().to_string());
                Err(e.into())
            }
        }
    }

    /// Collect the first step and move on to size selection
    pub fn set_details(&mut self, locker_id: &str, receiver_phone: &str, sender_phone: &str) -> FlowResult<()> {
        let receiver_phone = validation::phone(receiver_phone)?;
        let sender_phone = validation::phone(sender_phone)?;

        let locker = self
            .lockers
            .iter()
            .find(|l| l.locker_id == locker_id.trim())
            .ok_or_else(|| ValidationError::Invalid {
                field: "locker",
                value: locker_id.to_string(),
            })?;

        self.locker_id = Some(locker.locker_id.clone());
        self.locker_label = Some(locker.label());
        self.receiver_phone = Some(receiver_phone);
        self.sender_phone = Some(sender_phone);
        self.error = None;
        self.step = DepositStep::Size;
        Ok(())
    }

    pub fn set_size(&mut self, size: CompartmentSize) {
        self.size = Some(size);
    }

    pub async fn confirm(&mut self) -> FlowResult<&KioskDeposit> {
        let (Some(locker_id), Some(size), Some(receiver_phone), Some(sender_phone)) = (
            self.locker_id.clone(),
            self.size,
            self.receiver_phone.clone(),
            self.sender_phone.clone(),
        ) else {
            self.error = Some(MISSING_FIELDS.to_string());
            return Err(FlowError::InvalidState(MISSING_FIELDS));
        };

        let request = parcels::KioskDepositRequest {
            locker_id,
            size,
            receiver_phone,
            sender_phone,
        };

        self.submitting = true;
        self.error = None;
        let result = parcels::deposit_at_kiosk(&self.http, &request).await;
        self.submitting = false;

        match result {
            Ok(deposit) => {
                info!(
                    "📦 Parcel {} deposited at locker {} (code {})",
                    deposit.parcel_id, request.locker_id, deposit.parcel_code
                );
                self.step = DepositStep::Open;
                Ok(&*self.result.insert(deposit))
            }
            Err(e) => {
                warn!("Kiosk deposit failed: {}", e);
                self.error = Some(deposit_error_message(&e).to_string());
                Err(e.into())
            }
        }
    }

    pub fn reset(&mut self) {
        let http = self.http.clone();
        *self = Self::new(http);
    }
}

/// Message shown when a kiosk deposit is rejected
pub fn deposit_error_message(err: &ApiError) -> &'static str {
    match err.status() {
        Some(400) => "Invalid details. Please check and try again.",
        Some(404) => "Locker not found. Please choose another one.",
        Some(409) => "Locker unavailable or no free compartment of the selected size.",
        _ => "System error. Please try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn store() -> DepositStore {
        let http = HttpClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let mut store = DepositStore::new(http);
        store.lockers = vec![AvailableLocker {
            locker_id: "l-1".to_string(),
            locker_code: "A-01".to_string(),
            location_name: "Central".to_string(),
        }];
        store
    }

    #[test]
    fn test_set_details_advances() {
        let mut store = store();
        store.set_details("l-1", "0811111111", "0822222222").unwrap();
        assert_eq!(store.step, DepositStep::Size);
        assert_eq!(store.locker_label.as_deref(), Some("A-01 • Central"));
    }

    #[test]
    fn test_set_details_rejects_unknown_locker_and_bad_phone() {
        let mut store = store();
        assert!(store.set_details("l-9", "0811111111", "0822222222").is_err());
        assert!(store.set_details("l-1", "08111", "0822222222").is_err());
        assert_eq!(store.step, DepositStep::Details);
    }

    #[tokio::test]
    async fn test_confirm_requires_all_fields() {
        let mut store = store();
        let err = store.confirm().await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidState(MISSING_FIELDS)));
        assert_eq!(store.error.as_deref(), Some(MISSING_FIELDS));
        assert!(!store.submitting);
    }

    #[test]
    fn test_error_messages_by_status() {
        let err = |status| ApiError::Api {
            status: Some(status),
            code: None,
            message: String::new(),
        };
        assert!(deposit_error_message(&err(409)).contains("no free compartment"));
        assert!(deposit_error_message(&err(404)).starts_with("Locker not found"));
        assert!(deposit_error_message(&err(400)).starts_with("Invalid details"));
        assert_eq!(deposit_error_message(&err(500)), "System error. Please try again.");
        assert_eq!(
            deposit_error_message(&ApiError::InvalidResponse),
            "System error. Please try again."
        );
    }

    #[test]
    fn test_reset() {
        let mut store = store();
        store.set_details("l-1", "0811111111", "0822222222").unwrap();
        store.reset();
        assert_eq!(store.step, DepositStep::Details);
        assert!(store.lockers.is_empty());
        assert!(store.locker_id.is_none());
    }
}
