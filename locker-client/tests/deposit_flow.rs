mod common;

use serde_json::json;

use common::MockBackend;
use parcel_locker_client::models::{CompartmentSize, ParcelStatus};
use parcel_locker_client::store::{DepositStep, DepositStore};

fn lockers() -> serde_json::Value {
    json!([
        {"locker_id": "l-1", "locker_code": "A-01", "location_name": "Central"},
        {"locker_id": "l-2", "locker_code": "B-07", "location_name": "Airport"}
    ])
}

#[tokio::test]
async fn test_kiosk_deposit_happy_path() {
    let mock = MockBackend::start().await;
    mock.ok("GET /lockers/available", lockers());
    mock.ok(
        "POST /lockers/deposit",
        json!({"parcel_id": "p-1", "parcel_code": "PX-1", "pickup_code": "4821", "status": "DEPOSITED"}),
    );

    let mut store = DepositStore::new(mock.client());
    assert_eq!(store.load_lockers().await.unwrap().len(), 2);
    assert!(!store.loading);

    store.set_details("l-2", "0811111111", "0822222222").unwrap();
    assert_eq!(store.step, DepositStep::Size);
    assert_eq!(store.locker_label.as_deref(), Some("B-07 • Airport"));

    store.set_size(CompartmentSize::L);
    let result = store.confirm().await.unwrap();
    assert_eq!(result.parcel_code, "PX-1");
    assert_eq!(result.pickup_code.as_deref(), Some("4821"));
    assert_eq!(result.status, ParcelStatus::Deposited);
    assert_eq!(store.step, DepositStep::Open);
    assert!(!store.submitting);

    let body = mock.last("POST /lockers/deposit").unwrap().body;
    assert_eq!(
        body,
        json!({"locker_id": "l-2", "size": "L", "receiver_phone": "0811111111", "sender_phone": "0822222222"})
    );
}

#[tokio::test]
async fn test_kiosk_deposit_conflict_message() {
    let mock = MockBackend::start().await;
    mock.ok("GET /lockers/available", lockers());
    mock.fail("POST /lockers/deposit", 409, "no compartment", "NO_AVAILABLE_COMPARTMENT");

    let mut store = DepositStore::new(mock.client());
    store.load_lockers().await.unwrap();
    store.set_details("l-1", "0811111111", "0822222222").unwrap();
    store.set_size(CompartmentSize::S);

    assert!(store.confirm().await.is_err());
    assert_eq!(store.step, DepositStep::Size);
    assert!(store.result.is_none());
    assert!(!store.submitting);
    assert_eq!(
        store.error.as_deref(),
        Some("Locker unavailable or no free compartment of the selected size.")
    );
}

#[tokio::test]
async fn test_confirm_without_size_makes_no_call() {
    let mock = MockBackend::start().await;
    mock.ok("GET /lockers/available", lockers());

    let mut store = DepositStore::new(mock.client());
    store.load_lockers().await.unwrap();
    store.set_details("l-1", "0811111111", "0822222222").unwrap();

    assert!(store.confirm().await.is_err());
    assert_eq!(mock.keys(), vec!["GET /lockers/available"]);
}
