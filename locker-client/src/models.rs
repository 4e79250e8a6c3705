//! Domain types exchanged with the locker backend.
//!
//! Parcel payloads come from handlers that serialize Go structs directly
//! (`ID`, `LockerID`, ...) as well as from handlers that build snake_case maps,
//! so the parcel types accept both spellings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Account role, as stored on the backend user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Courier,
    Recipient,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Courier => "COURIER",
            Role::Recipient => "RECIPIENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "COURIER" => Ok(Role::Courier),
            "RECIPIENT" => Ok(Role::Recipient),
            _ => Err(ValidationError::Invalid {
                field: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// Compartment size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CompartmentSize {
    S,
    M,
    L,
}

impl CompartmentSize {
    pub const ALL: [CompartmentSize; 3] = [CompartmentSize::S, CompartmentSize::M, CompartmentSize::L];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompartmentSize::S => "S",
            CompartmentSize::M => "M",
            CompartmentSize::L => "L",
        }
    }
}

impl fmt::Display for CompartmentSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompartmentSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(CompartmentSize::S),
            "M" => Ok(CompartmentSize::M),
            "L" => Ok(CompartmentSize::L),
            _ => Err(ValidationError::Invalid {
                field: "size",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParcelStatus {
    Created,
    Reserved,
    Deposited,
    Stored,
    PickupReady,
    PickedUp,
    Cancelled,
    Expired,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParcelStatus::Created => "CREATED",
            ParcelStatus::Reserved => "RESERVED",
            ParcelStatus::Deposited => "DEPOSITED",
            ParcelStatus::Stored => "STORED",
            ParcelStatus::PickupReady => "PICKUP_READY",
            ParcelStatus::PickedUp => "PICKED_UP",
            ParcelStatus::Cancelled => "CANCELLED",
            ParcelStatus::Expired => "EXPIRED",
            ParcelStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockerStatus {
    Active,
    Maintenance,
    Disabled,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for LockerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LockerStatus::Active => "ACTIVE",
            LockerStatus::Maintenance => "MAINTENANCE",
            LockerStatus::Disabled => "DISABLED",
            LockerStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

impl FromStr for LockerStatus {
    type Err = ValidationError;

    /// Only statuses an admin may set are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(LockerStatus::Active),
            "MAINTENANCE" => Ok(LockerStatus::Maintenance),
            "DISABLED" => Ok(LockerStatus::Disabled),
            _ => Err(ValidationError::Invalid {
                field: "status",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompartmentStatus {
    Available,
    Reserved,
    Occupied,
    OutOfService,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for CompartmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompartmentStatus::Available => "AVAILABLE",
            CompartmentStatus::Reserved => "RESERVED",
            CompartmentStatus::Occupied => "OCCUPIED",
            CompartmentStatus::OutOfService => "OUT_OF_SERVICE",
            CompartmentStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: String,
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locker {
    pub locker_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    pub locker_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LockerStatus>,
}

/// Locker that currently accepts deposits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableLocker {
    pub locker_id: String,
    pub locker_code: String,
    #[serde(default)]
    pub location_name: String,
}

impl AvailableLocker {
    /// Display label, e.g. `A-01 • Central Station`
    pub fn label(&self) -> String {
        format!("{} • {}", self.locker_code, self.location_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compartment {
    pub compartment_id: String,
    pub compartment_no: u32,
    #[serde(default)]
    pub size: Option<CompartmentSize>,
    #[serde(default)]
    pub status: Option<CompartmentStatus>,
}

/// Row of a batch compartment creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentSpec {
    pub compartment_no: u32,
    pub size: CompartmentSize,
}

/// Parcel state returned by each step of the courier flow
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ParcelWire")]
pub struct ParcelFlow {
    pub parcel_id: String,
    pub locker_id: String,
    pub compartment_id: Option<String>,
    pub status: Option<ParcelStatus>,
    pub parcel_code: Option<String>,
}

/// Full parcel record as returned by `GET /parcels/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelDetail {
    pub parcel_id: String,
    #[serde(default)]
    pub parcel_code: Option<String>,
    #[serde(default)]
    pub status: ParcelStatus,
    pub locker_id: String,
    #[serde(default)]
    pub compartment_id: Option<String>,
    #[serde(default)]
    pub size: Option<CompartmentSize>,
    #[serde(default)]
    pub courier_id: Option<String>,
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub reserved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deposited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub picked_up_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Active parcel of a recipient
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ParcelWire")]
pub struct RecipientParcel {
    pub parcel_id: String,
    pub parcel_code: String,
    pub locker_id: String,
    pub compartment_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: ParcelStatus,
}

/// Parcel payload in either spelling. When a handler sends both, the Go
/// field name wins.
#[derive(Deserialize)]
struct ParcelWire {
    #[serde(rename = "ID")]
    go_id: Option<String>,
    #[serde(rename = "ParcelID")]
    go_parcel_id: Option<String>,
    parcel_id: Option<String>,
    #[serde(rename = "LockerID")]
    go_locker_id: Option<String>,
    locker_id: Option<String>,
    #[serde(rename = "CompartmentID")]
    go_compartment_id: Option<String>,
    compartment_id: Option<String>,
    #[serde(rename = "Status")]
    go_status: Option<ParcelStatus>,
    status: Option<ParcelStatus>,
    #[serde(rename = "ParcelCode")]
    go_parcel_code: Option<String>,
    parcel_code: Option<String>,
    #[serde(rename = "ExpiresAt")]
    go_expires_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<ParcelWire> for ParcelFlow {
    fn from(w: ParcelWire) -> Self {
        ParcelFlow {
            parcel_id: w.go_id.or(w.go_parcel_id).or(w.parcel_id).unwrap_or_default(),
            locker_id: w.go_locker_id.or(w.locker_id).unwrap_or_default(),
            compartment_id: w.go_compartment_id.or(w.compartment_id),
            status: w.go_status.or(w.status),
            parcel_code: w.go_parcel_code.or(w.parcel_code),
        }
    }
}

impl From<ParcelWire> for RecipientParcel {
    fn from(w: ParcelWire) -> Self {
        RecipientParcel {
            parcel_id: w.go_parcel_id.or(w.go_id).or(w.parcel_id).unwrap_or_default(),
            parcel_code: w.go_parcel_code.or(w.parcel_code).unwrap_or_default(),
            locker_id: w.go_locker_id.or(w.locker_id).unwrap_or_default(),
            compartment_id: w.go_compartment_id.or(w.compartment_id),
            expires_at: w.go_expires_at.or(w.expires_at),
            status: w.go_status.or(w.status).unwrap_or_default(),
        }
    }
}

/// Parcel waiting for a phone-verified recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupParcel {
    pub parcel_id: String,
    #[serde(default)]
    pub parcel_code: String,
    #[serde(default)]
    pub locker_id: String,
    #[serde(default)]
    pub compartment_id: Option<String>,
    #[serde(default)]
    pub size: Option<CompartmentSize>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of a one-shot kiosk deposit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KioskDeposit {
    pub parcel_id: String,
    pub parcel_code: String,
    #[serde(default)]
    pub pickup_code: Option<String>,
    #[serde(default)]
    pub status: ParcelStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupConfirmation {
    pub parcel_id: String,
    #[serde(default)]
    pub status: ParcelStatus,
    #[serde(default)]
    pub picked_up_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub overdue_days: u32,
    #[serde(default)]
    pub overdue_fee: u64,
}

/// Dashboard counters keyed by metric name (`total_lockers`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Overview {
    pub metrics: BTreeMap<String, i64>,
}

impl Overview {
    pub fn get(&self, metric: &str) -> Option<i64> {
        self.metrics.get(metric).copied()
    }
}

impl<'de> Deserialize<'de> for Overview {
    /// Accepts both `{"metrics": {...}}` and a flat map of counters
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Wrapped { metrics: BTreeMap<String, i64> },
            Flat(BTreeMap<String, i64>),
        }

        Ok(match Shape::deserialize(deserializer)? {
            Shape::Wrapped { metrics } | Shape::Flat(metrics) => Overview { metrics },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_size_parsing_is_case_insensitive() {
        assert_eq!("m".parse::<CompartmentSize>().unwrap(), CompartmentSize::M);
        assert_eq!(" L ".parse::<CompartmentSize>().unwrap(), CompartmentSize::L);
        assert!("XL".parse::<CompartmentSize>().is_err());
    }

    #[test]
    fn test_role_round_trip_wire_format() {
        let role: Role = serde_json::from_value(json!("COURIER")).unwrap();
        assert_eq!(role, Role::Courier);
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), json!("ADMIN"));
        assert_eq!("recipient".parse::<Role>().unwrap(), Role::Recipient);
    }

    #[test]
    fn test_unknown_statuses_are_preserved_as_unknown() {
        let status: ParcelStatus = serde_json::from_value(json!("LOST_IN_TRANSIT")).unwrap();
        assert_eq!(status, ParcelStatus::Unknown);
        let status: LockerStatus = serde_json::from_value(json!("RETIRED")).unwrap();
        assert_eq!(status, LockerStatus::Unknown);
        assert!("RETIRED".parse::<LockerStatus>().is_err());
    }

    #[test]
    fn test_parcel_flow_accepts_go_field_names() {
        let flow: ParcelFlow = serde_json::from_value(json!({
            "ID": "p-1",
            "LockerID": "l-1",
            "CompartmentID": "c-9",
            "Status": "RESERVED"
        }))
        .unwrap();
        assert_eq!(flow.parcel_id, "p-1");
        assert_eq!(flow.locker_id, "l-1");
        assert_eq!(flow.compartment_id.as_deref(), Some("c-9"));
        assert_eq!(flow.status, Some(ParcelStatus::Reserved));

        let flow: ParcelFlow = serde_json::from_value(json!({
            "parcel_id": "p-2",
            "status": "CREATED"
        }))
        .unwrap();
        assert_eq!(flow.parcel_id, "p-2");
        assert!(flow.compartment_id.is_none());
    }

    #[test]
    fn test_both_spellings_prefer_go_names() {
        let flow: ParcelFlow = serde_json::from_value(json!({
            "ID": "p-go",
            "parcel_id": "p-snake",
            "LockerID": "l-1",
            "locker_id": "l-2",
            "status": "DEPOSITED"
        }))
        .unwrap();
        assert_eq!(flow.parcel_id, "p-go");
        assert_eq!(flow.locker_id, "l-1");
        assert_eq!(flow.status, Some(ParcelStatus::Deposited));

        let parcel: RecipientParcel = serde_json::from_value(json!({
            "ParcelID": "p-go",
            "parcel_id": "p-snake",
            "ParcelCode": "PX-1",
            "parcel_code": "PX-2",
            "Status": "PICKUP_READY",
            "status": "EXPIRED"
        }))
        .unwrap();
        assert_eq!(parcel.parcel_id, "p-go");
        assert_eq!(parcel.parcel_code, "PX-1");
        assert_eq!(parcel.status, ParcelStatus::PickupReady);
    }

    #[test]
    fn test_recipient_parcel_null_compartment() {
        let parcel: RecipientParcel = serde_json::from_value(json!({
            "parcel_id": "p-1",
            "parcel_code": "483920",
            "locker_id": "l-1",
            "compartment_id": null,
            "expires_at": "2026-03-01T10:00:00Z",
            "status": "PICKUP_READY"
        }))
        .unwrap();
        assert!(parcel.compartment_id.is_none());
        assert_eq!(parcel.status, ParcelStatus::PickupReady);
        assert!(parcel.expires_at.is_some());
    }

    #[test]
    fn test_overview_shapes() {
        let flat: Overview =
            serde_json::from_value(json!({"total_lockers": 4, "parcels_active": 2})).unwrap();
        assert_eq!(flat.get("total_lockers"), Some(4));

        let wrapped: Overview =
            serde_json::from_value(json!({"metrics": {"total_lockers": 7}})).unwrap();
        assert_eq!(wrapped.get("total_lockers"), Some(7));
        assert_eq!(wrapped.get("missing"), None);
    }

    #[test]
    fn test_available_locker_label() {
        let locker = AvailableLocker {
            locker_id: "l-1".to_string(),
            locker_code: "A-01".to_string(),
            location_name: "Central".to_string(),
        };
        assert_eq!(locker.label(), "A-01 • Central");
    }
}
