//! Frontend Models
//!
//! Data structures matching backend JSON.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

// ========================
// Auth
// ========================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

// ========================
// Inventory
// ========================

/// Inventory item (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub barcode: Option<String>,
    pub catalog_number: Option<String>,
    pub vendor: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    /// Archived items are checked out / no longer on the shelf
    #[serde(default)]
    pub is_archived: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fund {
    pub id: u32,
    pub name: String,
    pub code: Option<String>,
    pub remaining_budget: Option<f64>,
}

// ========================
// Purchase Requests
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Ordered,
    Received,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 6] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Ordered,
        Self::Received,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Ordered => "ordered",
            Self::Received => "received",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Ordered => "Ordered",
            Self::Received => "Received",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Workflow transitions offered from this status
    pub fn actions(&self) -> &'static [RequestAction] {
        match self {
            Self::Pending => &[RequestAction::Approve, RequestAction::Reject, RequestAction::Cancel],
            Self::Approved => &[RequestAction::PlaceOrder, RequestAction::Cancel],
            Self::Ordered => &[RequestAction::MarkReceived],
            Self::Rejected | Self::Received | Self::Cancelled => &[],
        }
    }

    /// Only pending requests can still be edited
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Approve,
    Reject,
    PlaceOrder,
    MarkReceived,
    Cancel,
}

impl RequestAction {
    /// Path segment of the action endpoint
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::PlaceOrder => "place_order",
            Self::MarkReceived => "mark_received",
            Self::Cancel => "cancel",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Approve => "Approve",
            Self::Reject => "Reject",
            Self::PlaceOrder => "Place order",
            Self::MarkReceived => "Mark received",
            Self::Cancel => "Cancel",
        }
    }

    /// Actions that end a request's workflow ask before running
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Self::Reject | Self::Cancel)
    }
}

/// Purchase request (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: u32,
    pub item_name: String,
    pub catalog_number: Option<String>,
    pub vendor: Option<String>,
    pub quantity: u32,
    pub unit_price: Option<f64>,
    pub fund: Option<u32>,
    pub status: RequestStatus,
    pub notes: Option<String>,
    pub requested_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Request {
    pub fn total_cost(&self) -> Option<f64> {
        self.unit_price.map(|p| p * self.quantity as f64)
    }
}

/// Create/update payload for a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRequest {
    pub item_name: String,
    pub catalog_number: Option<String>,
    pub vendor: Option<String>,
    pub quantity: u32,
    pub unit_price: Option<f64>,
    pub fund: Option<u32>,
    pub notes: Option<String>,
}

impl From<&Request> for NewRequest {
    fn from(r: &Request) -> Self {
        Self {
            item_name: r.item_name.clone(),
            catalog_number: r.catalog_number.clone(),
            vendor: r.vendor.clone(),
            quantity: r.quantity,
            unit_price: r.unit_price,
            fund: r.fund,
            notes: r.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRequestPayload<'a> {
    pub requests: &'a [NewRequest],
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchResult {
    #[serde(default)]
    pub created: usize,
}

// ========================
// Group Meetings
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    ResearchUpdate,
    JournalClub,
    Special,
}

impl MeetingType {
    pub const ALL: [MeetingType; 3] = [Self::ResearchUpdate, Self::JournalClub, Self::Special];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResearchUpdate => "research_update",
            Self::JournalClub => "journal_club",
            Self::Special => "special",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ResearchUpdate => "Research update",
            Self::JournalClub => "Journal club",
            Self::Special => "Special",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    Scheduled,
    Completed,
    Cancelled,
    Postponed,
}

impl MeetingStatus {
    pub const ALL: [MeetingStatus; 4] = [Self::Scheduled, Self::Completed, Self::Cancelled, Self::Postponed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Postponed => "postponed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Postponed => "Postponed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presenter {
    pub id: u32,
    pub name: String,
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingMaterial {
    pub id: u32,
    pub name: String,
    pub url: String,
}

/// Group meeting (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMeeting {
    pub id: u32,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub meeting_type: MeetingType,
    pub status: MeetingStatus,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub presenters: Vec<Presenter>,
    #[serde(default)]
    pub materials: Vec<MeetingMaterial>,
}

impl GroupMeeting {
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(t) if !t.trim().is_empty() => t.clone(),
            _ => self.meeting_type.label().to_string(),
        }
    }

    pub fn presenter_names(&self) -> String {
        self.presenters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
    }

    /// Swap/postpone/upload only make sense before the meeting happens
    pub fn is_actionable(&self, today: NaiveDate) -> bool {
        matches!(self.status, MeetingStatus::Scheduled | MeetingStatus::Postponed) && self.date >= today
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMeeting {
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub meeting_type: MeetingType,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapPresenterRequest {
    pub presenter_id: u32,
    pub target_meeting_id: u32,
    pub target_presenter_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostponeRequest {
    pub new_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateMeetingsRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Recurring meeting settings (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingConfiguration {
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub research_update_presenters: u8,
    pub journal_club_presenters: u8,
    pub reminder_days_before: u8,
}

pub const WEEKDAYS: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

// ========================
// Tasks
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFrequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
}

impl TaskFrequency {
    pub const ALL: [TaskFrequency; 5] = [Self::Daily, Self::Weekly, Self::Biweekly, Self::Monthly, Self::Quarterly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Biweekly => "Every two weeks",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTask {
    pub id: u32,
    pub title: String,
    pub description: Option<String>,
    pub frequency: TaskFrequency,
    pub next_due: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub assignees: Vec<Presenter>,
    pub current_assignee: Option<Presenter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecurringTask {
    pub title: String,
    pub description: Option<String>,
    pub frequency: TaskFrequency,
    pub next_due: Option<NaiveDate>,
    pub is_active: bool,
    pub assignee_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneTimeTask {
    pub id: u32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assignee: Option<Presenter>,
    #[serde(default)]
    pub completed: bool,
}

impl OneTimeTask {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|d| d < today)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOneTimeTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assignee_id: Option<u32>,
}

// ========================
// List keys
// ========================

/// `<For>` key for a server record: its id plus a fingerprint of every
/// serialized field, so a refetched row with any changed value re-renders
pub fn row_key<T: Serialize>(id: u32, value: &T) -> (u32, String) {
    (id, serde_json::to_string(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_with_missing_optionals() {
        let json = r#"{"id": 3, "item_name": "Pipette tips", "quantity": 4, "unit_price": 12.5, "status": "approved"}"#;
        let request: Request = serde_json::from_str(json).unwrap();
        assert_eq!(request.status, RequestStatus::Approved);
        assert_eq!(request.total_cost(), Some(50.0));
        assert_eq!(request.vendor, None);
    }

    #[test]
    fn test_status_actions_follow_workflow() {
        assert_eq!(
            RequestStatus::Pending.actions(),
            &[RequestAction::Approve, RequestAction::Reject, RequestAction::Cancel]
        );
        assert_eq!(RequestStatus::Ordered.actions(), &[RequestAction::MarkReceived]);
        assert!(RequestStatus::Received.actions().is_empty());
        assert!(RequestStatus::Pending.is_editable());
        assert!(!RequestStatus::Approved.is_editable());
        assert!(RequestAction::Cancel.needs_confirmation());
        assert!(!RequestAction::Approve.needs_confirmation());
    }

    #[test]
    fn test_meeting_parses_dates_and_defaults() {
        let json = r#"{
            "id": 9, "date": "2026-11-02", "start_time": "14:00:00", "end_time": null,
            "location": "Room 301", "meeting_type": "journal_club", "status": "scheduled",
            "title": "", "description": null
        }"#;
        let meeting: GroupMeeting = serde_json::from_str(json).unwrap();
        assert_eq!(meeting.date, NaiveDate::from_ymd_opt(2026, 11, 2).unwrap());
        assert_eq!(meeting.display_title(), "Journal club");
        assert!(meeting.presenters.is_empty());
        assert!(meeting.is_actionable(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()));
        assert!(!meeting.is_actionable(NaiveDate::from_ymd_opt(2026, 11, 3).unwrap()));
    }

    #[test]
    fn test_enum_string_round_trip() {
        for s in RequestStatus::ALL {
            assert_eq!(RequestStatus::from_str(s.as_str()), Some(s));
        }
        for f in TaskFrequency::ALL {
            assert_eq!(TaskFrequency::from_str(f.as_str()), Some(f));
        }
        assert_eq!(MeetingType::from_str("journal_club"), Some(MeetingType::JournalClub));
        assert_eq!(MeetingStatus::from_str("nope"), None);
    }

    #[test]
    fn test_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let mut task = OneTimeTask {
            id: 1,
            title: "Order liquid nitrogen".into(),
            description: None,
            due_date: NaiveDate::from_ymd_opt(2026, 10, 15),
            assignee: None,
            completed: false,
        };
        assert!(task.is_overdue(today));
        task.completed = true;
        assert!(!task.is_overdue(today));
    }

    fn item(quantity: f64) -> Item {
        Item {
            id: 7,
            name: "Ethanol".into(),
            barcode: Some("4006381333931".into()),
            catalog_number: None,
            vendor: None,
            quantity,
            unit: Some("L".into()),
            location: None,
            expiration_date: None,
            is_archived: false,
        }
    }

    fn presenter(id: u32, name: &str) -> Presenter {
        Presenter { id, name: name.into(), email: None, is_active: true }
    }

    #[test]
    fn test_row_key_changes_with_quantity() {
        assert_eq!(row_key(7, &item(3.0)), row_key(7, &item(3.0)));
        assert_ne!(row_key(7, &item(3.0)), row_key(7, &item(2.0)));
    }

    #[test]
    fn test_row_key_changes_when_presenter_swapped() {
        let before = GroupMeeting {
            id: 4,
            date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            start_time: None,
            end_time: None,
            location: None,
            meeting_type: MeetingType::ResearchUpdate,
            status: MeetingStatus::Scheduled,
            title: None,
            description: None,
            presenters: vec![presenter(1, "Ada")],
            materials: vec![],
        };
        let after = GroupMeeting { presenters: vec![presenter(2, "Grace")], ..before.clone() };
        assert_eq!(before.presenters.len(), after.presenters.len());
        assert_ne!(row_key(before.id, &before), row_key(after.id, &after));
    }

    #[test]
    fn test_row_key_changes_with_edited_request() {
        let json = r#"{"id": 3, "item_name": "Tips", "quantity": 2, "status": "pending", "vendor": "Sigma"}"#;
        let request: Request = serde_json::from_str(json).unwrap();
        let edited = Request { vendor: Some("Fisher".into()), ..request.clone() };
        assert_ne!(row_key(request.id, &request), row_key(edited.id, &edited));
    }
}
