//! Meeting Schedule Endpoints

use web_sys::{File, FormData};

use super::{expand_path, ApiClient};
use crate::error::ApiError;
use crate::models::{
    GenerateMeetingsRequest, GroupMeeting, MeetingConfiguration, MeetingMaterial, NewMeeting, PostponeRequest,
    Presenter, SwapPresenterRequest,
};

const MEETINGS: &str = "/api/schedule/group-meetings/";
const CONFIGURATION: &str = "/api/schedule/meeting-configuration/";

fn meeting_action(id: u32, action: &str) -> String {
    expand_path("/api/schedule/group-meetings/{id}/{action}/", &[("id", &id.to_string()), ("action", action)])
}

pub async fn list_meetings(client: &ApiClient) -> Result<Vec<GroupMeeting>, ApiError> {
    client.get_list(MEETINGS, &[]).await
}

pub async fn create_meeting(client: &ApiClient, meeting: &NewMeeting) -> Result<GroupMeeting, ApiError> {
    client.post(MEETINGS, meeting).await
}

pub async fn swap_presenter(client: &ApiClient, meeting_id: u32, swap: &SwapPresenterRequest) -> Result<(), ApiError> {
    client.post_empty(&meeting_action(meeting_id, "swap-presenter"), swap).await
}

pub async fn postpone_meeting(client: &ApiClient, meeting_id: u32, postpone: &PostponeRequest) -> Result<GroupMeeting, ApiError> {
    client.post(&meeting_action(meeting_id, "postpone"), postpone).await
}

/// Multipart upload under the `file` field
pub async fn upload_material(client: &ApiClient, meeting_id: u32, file: &File) -> Result<MeetingMaterial, ApiError> {
    let form = FormData::new().map_err(|e| ApiError::from_js(&e))?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|e| ApiError::from_js(&e))?;
    client.post_form(&meeting_action(meeting_id, "materials"), form).await
}

pub async fn generate_meetings(client: &ApiClient, range: &GenerateMeetingsRequest) -> Result<Vec<GroupMeeting>, ApiError> {
    let body = client.post::<_, serde_json::Value>("/api/schedule/group-meetings/generate/", range).await?;
    // Some deployments answer with a summary object instead of the list
    Ok(serde_json::from_value(body).unwrap_or_default())
}

pub async fn get_meeting_configuration(client: &ApiClient) -> Result<MeetingConfiguration, ApiError> {
    client.get(CONFIGURATION, &[]).await
}

pub async fn update_meeting_configuration(
    client: &ApiClient,
    configuration: &MeetingConfiguration,
) -> Result<MeetingConfiguration, ApiError> {
    client.put(CONFIGURATION, configuration).await
}

pub async fn list_presenters(client: &ApiClient) -> Result<Vec<Presenter>, ApiError> {
    client.get_list("/api/schedule/presenters/", &[]).await
}

pub async fn rotate_presenters(client: &ApiClient) -> Result<(), ApiError> {
    client.post_empty("/api/schedule/presenters/rotate/", &serde_json::json!({})).await
}
