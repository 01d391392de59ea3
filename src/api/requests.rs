//! Purchase Request Endpoints

use serde_json::json;

use super::{expand_path, ApiClient};
use crate::error::ApiError;
use crate::models::{BatchRequestPayload, BatchResult, NewRequest, Request, RequestAction, RequestStatus};

fn request_path(id: u32) -> String {
    expand_path("/api/requests/{id}/", &[("id", &id.to_string())])
}

pub async fn list_requests(client: &ApiClient, status: Option<RequestStatus>, search: &str) -> Result<Vec<Request>, ApiError> {
    let status = status.map(|s| s.as_str()).unwrap_or("");
    client.get_list("/api/requests/", &[("status", status), ("search", search.trim())]).await
}

pub async fn create_request(client: &ApiClient, request: &NewRequest) -> Result<Request, ApiError> {
    client.post("/api/requests/", request).await
}

pub async fn update_request(client: &ApiClient, id: u32, request: &NewRequest) -> Result<Request, ApiError> {
    client.put(&request_path(id), request).await
}

pub async fn delete_request(client: &ApiClient, id: u32) -> Result<(), ApiError> {
    client.delete(&request_path(id)).await
}

/// Run one workflow transition (approve, reject, ...)
pub async fn apply_request_action(client: &ApiClient, id: u32, action: RequestAction) -> Result<(), ApiError> {
    let path = expand_path("/api/requests/{id}/{action}/", &[("id", &id.to_string()), ("action", action.endpoint())]);
    client.post_empty(&path, &json!({})).await
}

/// Create many requests at once (import)
pub async fn submit_request_batch(client: &ApiClient, requests: &[NewRequest]) -> Result<usize, ApiError> {
    let body: serde_json::Value = client.post("/api/requests/batch/", &BatchRequestPayload { requests }).await?;
    let created = serde_json::from_value::<BatchResult>(body).map(|r| r.created).unwrap_or(0);
    Ok(if created == 0 { requests.len() } else { created })
}
