use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::models::Role;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub role: Role,
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterResponse {
    pub user_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentUser {
    pub user_id: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
}

pub async fn login(http: &HttpClient, phone: &str, password: &str) -> ApiResult<LoginResponse> {
    #[derive(Serialize)]
    struct LoginRequest<'a> {
        phone: &'a str,
        password: &'a str,
    }

    http.post("/auth/login", &LoginRequest { phone, password })
        .await
}

pub async fn register(
    http: &HttpClient,
    phone: &str,
    password: &str,
    role: Role,
) -> ApiResult<RegisterResponse> {
    #[derive(Serialize)]
    struct RegisterRequest<'a> {
        phone: &'a str,
        password: &'a str,
        role: Role,
    }

    http.post(
        "/auth/register",
        &RegisterRequest {
            phone,
            password,
            role,
        },
    )
    .await
}

/// Resolve the user behind the bearer token currently held by `http`
pub async fn me(http: &HttpClient) -> ApiResult<CurrentUser> {
    http.get("/auth/me").await
}

pub async fn logout(http: &HttpClient) -> ApiResult<()> {
    http.post_unit("/auth/logout").await
}
