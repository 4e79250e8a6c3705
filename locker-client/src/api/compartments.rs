use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::http::{segment, HttpClient};
use crate::models::{Compartment, CompartmentSpec};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchCreated {
    #[serde(default)]
    pub locker_id: Option<String>,
    #[serde(alias = "created", default)]
    pub created_count: u32,
}

pub async fn create_compartments(
    http: &HttpClient,
    locker_id: &str,
    compartments: &[CompartmentSpec],
) -> ApiResult<BatchCreated> {
    #[derive(Serialize)]
    struct BatchRequest<'a> {
        compartments: &'a [CompartmentSpec],
    }

    let path = format!("/admin/lockers/{}/compartments", segment(locker_id));
    http.post(&path, &BatchRequest { compartments }).await
}

pub async fn list_compartments(http: &HttpClient, locker_id: &str) -> ApiResult<Vec<Compartment>> {
    let path = format!("/admin/lockers/{}/compartments", segment(locker_id));
    http.get(&path).await
}
