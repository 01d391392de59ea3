//! Auth Endpoints

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse};

/// Exchange credentials for a token
pub async fn login(client: &ApiClient, username: &str, password: &str) -> Result<String, ApiError> {
    let response: LoginResponse = client.post("/api/auth/login/", &LoginRequest { username, password }).await?;
    Ok(response.token)
}
