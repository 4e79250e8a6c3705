use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::http::{segment, HttpClient};
use crate::models::{AvailableLocker, Locker, LockerStatus};

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateLocker {
    pub location_id: String,
    pub locker_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LockerStatusChange {
    pub locker_id: String,
    pub status: LockerStatus,
}

/// Lockers that currently accept deposits.
///
/// Older backends wrap the list as `{"lockers": [...]}`; both shapes are
/// accepted.
pub async fn list_available_lockers(http: &HttpClient) -> ApiResult<Vec<AvailableLocker>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AvailableResponse {
        List(Vec<AvailableLocker>),
        Wrapped {
            #[serde(default)]
            lockers: Vec<AvailableLocker>,
        },
    }

    let response: AvailableResponse = http.get("/lockers/available").await?;
    Ok(match response {
        AvailableResponse::List(lockers) | AvailableResponse::Wrapped { lockers } => lockers,
    })
}

pub async fn create_locker(http: &HttpClient, request: &CreateLocker) -> ApiResult<Locker> {
    http.post("/admin/lockers", request).await
}

pub async fn list_lockers(http: &HttpClient) -> ApiResult<Vec<Locker>> {
    http.get("/admin/lockers").await
}

pub async fn update_locker_status(
    http: &HttpClient,
    locker_id: &str,
    status: LockerStatus,
) -> ApiResult<LockerStatusChange> {
    #[derive(Serialize)]
    struct StatusRequest {
        status: LockerStatus,
    }

    let path = format!("/admin/lockers/{}/status", segment(locker_id));
    http.patch(&path, &StatusRequest { status }).await
}
