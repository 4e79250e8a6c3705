use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::models::Overview;

pub async fn get_overview(http: &HttpClient) -> ApiResult<Overview> {
    http.get("/admin/overview").await
}
