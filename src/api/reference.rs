//! Reference Data Endpoints

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Fund, Location};

pub async fn list_locations(client: &ApiClient) -> Result<Vec<Location>, ApiError> {
    client.get_list("/api/locations/", &[]).await
}

pub async fn list_funds(client: &ApiClient) -> Result<Vec<Fund>, ApiError> {
    client.get_list("/api/funds/", &[]).await
}
