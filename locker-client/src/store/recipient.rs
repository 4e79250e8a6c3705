//! Signed-in recipient: look up the active parcel, verify an OTP and collect it.

use tracing::info;

use crate::api::{otp, parcels};
use crate::error::{ApiError, FlowError, FlowResult};
use crate::http::HttpClient;
use crate::models::RecipientParcel;
use crate::validation;

pub struct RecipientStore {
    http: HttpClient,
    pub parcel: Option<RecipientParcel>,
    pub otp_ref: Option<String>,
    pub loading: bool,
}

impl RecipientStore {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            parcel: None,
            otp_ref: None,
            loading: false,
        }
    }

    /// Load the recipient's active parcel. Having none is not an error.
    pub async fn fetch_parcel(&mut self, recipient_id: &str) -> FlowResult<Option<&RecipientParcel>> {
        self.loading = true;
        let result = parcels::get_parcel_by_recipient(&self.http, recipient_id).await;
        self.loading = false;

        match result {
            Ok(parcel) => Ok(Some(&*self.parcel.insert(parcel))),
            Err(e) if e.is_not_found() => {
                self.parcel = None;
                Ok(None)
            }
            Err(e) => {
                self.parcel = None;
                Err(e.into())
            }
        }
    }

    pub async fn request_otp(&mut self) -> FlowResult<&str> {
        let parcel_id = self
            .parcel
            .as_ref()
            .map(|p| p.parcel_id.clone())
            .ok_or(FlowError::InvalidState("NO_PARCEL"))?;

        self.loading = true;
        let result = otp::request_parcel_otp(&self.http, &otp::OtpTarget::parcel(parcel_id)).await;
        self.loading = false;

        let otp_ref = Some(result?.otp_ref)
            .filter(|r| !r.is_empty())
            .ok_or(ApiError::InvalidResponse)?;
        Ok(self.otp_ref.insert(otp_ref).as_str())
    }

    pub async fn verify_otp(&mut self, otp_code: &str) -> FlowResult<()> {
        let otp_ref = self
            .otp_ref
            .clone()
            .ok_or(FlowError::InvalidState("NO_OTP_REF"))?;
        let otp_code = validation::otp_code(otp_code)?;

        self.loading = true;
        let result = otp::verify_parcel_otp(&self.http, &otp_ref, &otp_code).await;
        self.loading = false;

        Ok(result?)
    }

    /// Collect the parcel; clears the parcel and OTP reference on success
    pub async fn pickup(&mut self) -> FlowResult<()> {
        let (Some(parcel_id), Some(otp_ref)) = (
            self.parcel.as_ref().map(|p| p.parcel_id.clone()),
            self.otp_ref.clone(),
        ) else {
            return Err(FlowError::InvalidState("INVALID_STATE"));
        };

        self.loading = true;
        let result = otp::pickup_parcel(&self.http, &parcel_id, &otp_ref).await;
        self.loading = false;

        result?;
        info!("✅ Parcel {} collected", parcel_id);
        self.parcel = None;
        self.otp_ref = None;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.parcel = None;
        self.otp_ref = None;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn store() -> RecipientStore {
        RecipientStore::new(HttpClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap())
    }

    #[tokio::test]
    async fn test_preconditions() {
        let mut store = store();
        assert!(matches!(
            store.request_otp().await,
            Err(FlowError::InvalidState("NO_PARCEL"))
        ));
        assert!(matches!(
            store.verify_otp("123456").await,
            Err(FlowError::InvalidState("NO_OTP_REF"))
        ));

        store.parcel = Some(RecipientParcel {
            parcel_id: "p-1".to_string(),
            ..Default::default()
        });
        assert!(matches!(
            store.pickup().await,
            Err(FlowError::InvalidState("INVALID_STATE"))
        ));
        assert!(!store.loading);
    }

    #[test]
    fn test_reset() {
        let mut store = store();
        store.otp_ref = Some("ref".to_string());
        store.parcel = Some(RecipientParcel::default());
        store.reset();
        assert!(store.parcel.is_none());
        assert!(store.otp_ref.is_none());
    }
}
