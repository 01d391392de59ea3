//! Task Endpoints

use serde_json::json;

use super::{expand_path, ApiClient};
use crate::error::ApiError;
use crate::models::{NewOneTimeTask, NewRecurringTask, OneTimeTask, RecurringTask};

const RECURRING: &str = "/api/recurring-tasks/";
const ONE_TIME: &str = "/api/one-time-tasks/";

fn id_path(template: &str, id: u32) -> String {
    expand_path(template, &[("id", &id.to_string())])
}

// ========================
// Recurring
// ========================

pub async fn list_recurring_tasks(client: &ApiClient) -> Result<Vec<RecurringTask>, ApiError> {
    client.get_list(RECURRING, &[]).await
}

pub async fn create_recurring_task(client: &ApiClient, task: &NewRecurringTask) -> Result<RecurringTask, ApiError> {
    client.post(RECURRING, task).await
}

pub async fn update_recurring_task(client: &ApiClient, id: u32, task: &NewRecurringTask) -> Result<RecurringTask, ApiError> {
    client.put(&id_path("/api/recurring-tasks/{id}/", id), task).await
}

pub async fn delete_recurring_task(client: &ApiClient, id: u32) -> Result<(), ApiError> {
    client.delete(&id_path("/api/recurring-tasks/{id}/", id)).await
}

/// Advance the assignee on the server
pub async fn rotate_recurring_task(client: &ApiClient, id: u32) -> Result<(), ApiError> {
    client.post_empty(&id_path("/api/recurring-tasks/{id}/rotate/", id), &json!({})).await
}

// ========================
// One-time
// ========================

pub async fn list_one_time_tasks(client: &ApiClient) -> Result<Vec<OneTimeTask>, ApiError> {
    client.get_list(ONE_TIME, &[]).await
}

pub async fn create_one_time_task(client: &ApiClient, task: &NewOneTimeTask) -> Result<OneTimeTask, ApiError> {
    client.post(ONE_TIME, task).await
}

pub async fn complete_one_time_task(client: &ApiClient, id: u32) -> Result<(), ApiError> {
    client.post_empty(&id_path("/api/one-time-tasks/{id}/complete/", id), &json!({})).await
}

pub async fn delete_one_time_task(client: &ApiClient, id: u32) -> Result<(), ApiError> {
    client.delete(&id_path("/api/one-time-tasks/{id}/", id)).await
}
