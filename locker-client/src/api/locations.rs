use serde::Serialize;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::models::Location;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateLocation {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

pub async fn create_location(http: &HttpClient, request: &CreateLocation) -> ApiResult<Location> {
    http.post("/admin/locations", request).await
}

pub async fn list_locations(http: &HttpClient) -> ApiResult<Vec<Location>> {
    http.get("/admin/locations").await
}
