mod common;

use serde_json::json;

use common::MockBackend;
use parcel_locker_client::models::ParcelStatus;
use parcel_locker_client::store::{PickupStep, PickupStore};
use parcel_locker_client::{ApiError, FlowError};

fn script_happy_path(mock: &MockBackend) {
    mock.ok(
        "POST /pickup/otp/request",
        json!({"otp_ref": "ref-1", "expires_at": "2026-10-16T10:05:00Z"}),
    );
    mock.ok(
        "POST /pickup/otp/verify",
        json!({"pickup_token": "pt-1", "expires_at": "2026-10-16T10:15:00Z"}),
    );
    mock.ok(
        "GET /pickup/parcels",
        json!([
            {"parcel_id": "p-1", "parcel_code": "PX-1", "locker_id": "l-1", "size": "S"},
            {"parcel_id": "p-2", "parcel_code": "PX-2", "locker_id": "l-1", "size": "L",
             "expires_at": "2026-10-18T00:00:00Z"}
        ]),
    );
    mock.ok(
        "POST /pickup/confirm",
        json!({"parcel_id": "p-2", "status": "PICKED_UP", "picked_up_at": "2026-10-16T10:07:00Z",
               "overdue_days": 2, "overdue_fee": 40}),
    );
}

#[tokio::test]
async fn test_phone_pickup_end_to_end() {
    let mock = MockBackend::start().await;
    script_happy_path(&mock);

    let mut store = PickupStore::new(mock.client());
    assert_eq!(store.request_otp("0812345678").await.unwrap(), "ref-1");
    assert_eq!(store.step, PickupStep::Otp);
    assert_eq!(store.phone.as_deref(), Some("0812345678"));

    let parcels = store.verify_otp("123456").await.unwrap();
    assert_eq!(parcels.len(), 2);
    assert_eq!(store.step, PickupStep::List);
    assert_eq!(store.pickup_token.as_deref(), Some("pt-1"));
    assert_eq!(
        mock.last("POST /pickup/otp/verify").unwrap().body,
        json!({"phone": "0812345678", "otp_ref": "ref-1", "otp_code": "123456"})
    );
    assert_eq!(
        mock.last("GET /pickup/parcels").unwrap().pickup_token.as_deref(),
        Some("pt-1")
    );

    store.select_parcel("p-2").unwrap();
    let confirmation = store.confirm_pickup().await.unwrap();
    assert_eq!(confirmation.status, ParcelStatus::PickedUp);
    assert_eq!(confirmation.overdue_days, 2);
    assert_eq!(confirmation.overdue_fee, 40);

    assert_eq!(store.step, PickupStep::Done);
    assert_eq!(store.parcels.len(), 1);
    assert_eq!(store.parcels[0].parcel_id, "p-1");
    assert_eq!(store.collected.as_ref().map(|p| p.parcel_code.as_str()), Some("PX-2"));

    let confirm = mock.last("POST /pickup/confirm").unwrap();
    assert_eq!(confirm.pickup_token.as_deref(), Some("pt-1"));
    assert_eq!(confirm.body, json!({"parcel_id": "p-2"}));
}

#[tokio::test]
async fn test_rate_limited_otp_request() {
    let mock = MockBackend::start().await;
    mock.fail("POST /pickup/otp/request", 429, "slow down", "TOO_MANY_REQUESTS");

    let mut store = PickupStore::new(mock.client());
    assert!(store.request_otp("0812345678").await.is_err());
    assert_eq!(store.step, PickupStep::Phone);
    assert!(store.otp_ref.is_none());
    assert!(!store.submitting);
    assert_eq!(
        store.error.as_deref(),
        Some("Too many requests. Please wait before requesting another code.")
    );
}

#[tokio::test]
async fn test_missing_otp_ref_is_an_error() {
    let mock = MockBackend::start().await;
    mock.ok("POST /pickup/otp/request", json!({"expires_at": "2026-10-16T10:05:00Z"}));

    let mut store = PickupStore::new(mock.client());
    let err = store.request_otp("0812345678").await.unwrap_err();
    assert!(matches!(err, FlowError::Api(ApiError::InvalidResponse)));
    assert_eq!(store.step, PickupStep::Phone);
}

#[tokio::test]
async fn test_expired_otp_keeps_otp_step() {
    let mock = MockBackend::start().await;
    mock.ok("POST /pickup/otp/request", json!({"otp_ref": "ref-1"}));
    mock.fail("POST /pickup/otp/verify", 410, "otp expired", "OTP_EXPIRED");

    let mut store = PickupStore::new(mock.client());
    store.request_otp("0812345678").await.unwrap();
    assert!(store.verify_otp("123456").await.is_err());

    assert_eq!(store.step, PickupStep::Otp);
    assert!(store.pickup_token.is_none());
    assert_eq!(
        store.error.as_deref(),
        Some("The code has expired. Request a new one.")
    );
    // The list is never requested without a token
    assert!(mock.last("GET /pickup/parcels").is_none());
}

#[tokio::test]
async fn test_invalid_phone_never_reaches_backend() {
    let mock = MockBackend::start().await;

    let mut store = PickupStore::new(mock.client());
    let err = store.request_otp("12-34").await.unwrap_err();
    assert!(matches!(err, FlowError::Validation(_)));
    assert!(mock.requests().is_empty());
}
