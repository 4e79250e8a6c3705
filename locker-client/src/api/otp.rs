//! OTP calls bound to a known parcel or recipient (signed-in recipient flow).

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::models::RecipientParcel;

/// Who the OTP is issued for; at least one side must be set
#[derive(Debug, Clone, Default, Serialize)]
pub struct OtpTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parcel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
}

impl OtpTarget {
    pub fn parcel(parcel_id: impl Into<String>) -> Self {
        Self {
            parcel_id: Some(parcel_id.into()),
            recipient_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OtpIssued {
    #[serde(rename = "otp_ref", alias = "OTPRef", default)]
    pub otp_ref: String,
}

pub async fn request_parcel_otp(http: &HttpClient, target: &OtpTarget) -> ApiResult<OtpIssued> {
    http.post("/parcels/otp/request", target).await
}

/// Only success or failure matters here; whatever `data` the backend attaches
/// is ignored
pub async fn verify_parcel_otp(http: &HttpClient, otp_ref: &str, otp_code: &str) -> ApiResult<()> {
    #[derive(Serialize)]
    struct VerifyRequest<'a> {
        otp_ref: &'a str,
        otp_code: &'a str,
    }

    http.request_unit(
        Method::POST,
        "/parcels/otp/verify",
        Some(&VerifyRequest { otp_ref, otp_code }),
        &[],
    )
    .await
}

pub async fn pickup_parcel(http: &HttpClient, parcel_id: &str, otp_ref: &str) -> ApiResult<RecipientParcel> {
    #[derive(Serialize)]
    struct PickupRequest<'a> {
        parcel_id: &'a str,
        otp_ref: &'a str,
    }

    http.post("/parcels/pickup", &PickupRequest { parcel_id, otp_ref })
        .await
}
