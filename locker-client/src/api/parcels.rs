//! Parcel lifecycle calls.
//!
//! The courier flow walks a parcel through
//! `CREATED -> RESERVED -> DEPOSITED -> PICKUP_READY`, one call per step.
//! The kiosk deposit collapses all of that into a single call where the
//! backend picks the compartment.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiResult;
use crate::http::{segment, HttpClient};
use crate::models::{CompartmentSize, KioskDeposit, ParcelDetail, ParcelFlow, RecipientParcel};

#[derive(Debug, Clone, Serialize)]
pub struct CreateParcel {
    pub locker_id: String,
    pub size: CompartmentSize,
    pub courier_id: String,
    pub recipient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KioskDepositRequest {
    pub locker_id: String,
    pub size: CompartmentSize,
    pub receiver_phone: String,
    pub sender_phone: String,
}

#[derive(Serialize)]
struct ParcelIdRequest<'a> {
    parcel_id: &'a str,
}

pub async fn deposit_at_kiosk(http: &HttpClient, request: &KioskDepositRequest) -> ApiResult<KioskDeposit> {
    http.post("/lockers/deposit", request).await
}

pub async fn create_parcel(http: &HttpClient, request: &CreateParcel) -> ApiResult<ParcelFlow> {
    http.post("/parcels/create", request).await
}

pub async fn reserve_parcel(http: &HttpClient, parcel_id: &str) -> ApiResult<ParcelFlow> {
    http.post("/parcels/reserve", &ParcelIdRequest { parcel_id })
        .await
}

pub async fn deposit_parcel(http: &HttpClient, parcel_id: &str) -> ApiResult<ParcelFlow> {
    http.post("/parcels/deposit", &ParcelIdRequest { parcel_id })
        .await
}

/// Mark a deposited parcel ready for pickup; `expires_at` overrides the
/// backend's default pickup window
pub async fn ready_parcel(
    http: &HttpClient,
    parcel_id: &str,
    expires_at: Option<DateTime<Utc>>,
) -> ApiResult<ParcelFlow> {
    #[derive(Serialize)]
    struct ReadyRequest<'a> {
        parcel_id: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        expires_at: Option<DateTime<Utc>>,
    }

    http.post(
        "/parcels/ready",
        &ReadyRequest {
            parcel_id,
            expires_at,
        },
    )
    .await
}

pub async fn get_parcel(http: &HttpClient, parcel_id: &str) -> ApiResult<ParcelDetail> {
    http.get(&format!("/parcels/{}", segment(parcel_id))).await
}

pub async fn get_parcel_by_recipient(http: &HttpClient, recipient_id: &str) -> ApiResult<RecipientParcel> {
    http.get(&format!("/parcels/by-recipient/{}", segment(recipient_id)))
        .await
}

/// Ask the backend to expire parcels whose pickup window has passed
pub async fn run_expire_job(http: &HttpClient) -> ApiResult<()> {
    http.post_unit("/parcels/expire").await
}
