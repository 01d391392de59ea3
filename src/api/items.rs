//! Inventory Endpoints

use serde_json::json;
use web_sys::AbortSignal;

use super::{expand_path, ApiClient};
use crate::error::ApiError;
use crate::models::Item;

pub async fn search_items(client: &ApiClient, query: &str) -> Result<Vec<Item>, ApiError> {
    client.get_list("/api/items/", &[("search", query.trim())]).await
}

/// Barcode lookup; aborting the signal rejects with [`ApiError::Aborted`]
pub async fn lookup_items(client: &ApiClient, code: &str, signal: Option<&AbortSignal>) -> Result<Vec<Item>, ApiError> {
    client.get_list_with_signal("/api/items/", &[("search", code.trim())], signal).await
}

pub async fn get_item(client: &ApiClient, id: u32) -> Result<Item, ApiError> {
    client.get(&expand_path("/api/items/{id}/", &[("id", &id.to_string())]), &[]).await
}

pub async fn check_out_item(client: &ApiClient, id: u32) -> Result<(), ApiError> {
    client.post_empty(&expand_path("/api/items/{id}/checkout/", &[("id", &id.to_string())]), &json!({})).await
}
