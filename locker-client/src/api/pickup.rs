//! Phone-based pickup: request an OTP for a phone number, trade the OTP for a
//! pickup token, then list and confirm parcels with that token.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::http::{HttpClient, PICKUP_TOKEN_HEADER};
use crate::models::{PickupConfirmation, PickupParcel};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OtpRequested {
    #[serde(default)]
    pub otp_ref: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PickupTokenGrant {
    pub pickup_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

pub async fn request_otp(http: &HttpClient, phone: &str) -> ApiResult<OtpRequested> {
    #[derive(Serialize)]
    struct OtpRequest<'a> {
        phone: &'a str,
    }

    http.post("/pickup/otp/request", &OtpRequest { phone }).await
}

pub async fn verify_otp(
    http: &HttpClient,
    phone: &str,
    otp_ref: &str,
    otp_code: &str,
) -> ApiResult<PickupTokenGrant> {
    #[derive(Serialize)]
    struct VerifyRequest<'a> {
        phone: &'a str,
        otp_ref: &'a str,
        otp_code: &'a str,
    }

    http.post(
        "/pickup/otp/verify",
        &VerifyRequest {
            phone,
            otp_ref,
            otp_code,
        },
    )
    .await
}

pub async fn list_parcels(http: &HttpClient, pickup_token: &str) -> ApiResult<Vec<PickupParcel>> {
    http.request::<(), _>(
        Method::GET,
        "/pickup/parcels",
        None,
        &[(PICKUP_TOKEN_HEADER, pickup_token)],
    )
    .await
}

pub async fn confirm_pickup(
    http: &HttpClient,
    pickup_token: &str,
    parcel_id: &str,
) -> ApiResult<PickupConfirmation> {
    #[derive(Serialize)]
    struct ConfirmRequest<'a> {
        parcel_id: &'a str,
    }

    http.request(
        Method::POST,
        "/pickup/confirm",
        Some(&ConfirmRequest { parcel_id }),
        &[(PICKUP_TOKEN_HEADER, pickup_token)],
    )
    .await
}
