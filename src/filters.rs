//! List Filters
//!
//! Client-side search, filter and sort over loaded lists.

use chrono::{Local, NaiveDate};

use crate::models::{GroupMeeting, MeetingStatus, MeetingType, OneTimeTask, RecurringTask, Request, RequestStatus};

/// Local calendar date, the reference point for upcoming/past and overdue
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Every whitespace-separated term must occur in at least one field
pub fn matches_search(query: &str, fields: &[&str]) -> bool {
    let haystack: Vec<String> = fields.iter().map(|f| f.to_lowercase()).collect();
    query
        .to_lowercase()
        .split_whitespace()
        .all(|term| haystack.iter().any(|field| field.contains(term)))
}

// ========================
// Meetings
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    Upcoming,
    Past,
    All,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [Self::Upcoming, Self::Past, Self::All];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Past => "past",
            Self::All => "all",
        }
    }

    pub fn from_str(value: &str) -> Self {
        Self::ALL.into_iter().find(|r| r.as_str() == value).unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Past => "Past",
            Self::All => "All",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeetingFilter {
    pub search: String,
    pub range: TimeRange,
    pub meeting_type: Option<MeetingType>,
    pub status: Option<MeetingStatus>,
    pub order: SortOrder,
}

impl MeetingFilter {
    pub fn matches(&self, meeting: &GroupMeeting, today: NaiveDate) -> bool {
        let in_range = match self.range {
            TimeRange::Upcoming => meeting.date >= today,
            TimeRange::Past => meeting.date < today,
            TimeRange::All => true,
        };
        let presenters = meeting.presenter_names();
        in_range
            && self.meeting_type.map_or(true, |t| meeting.meeting_type == t)
            && self.status.map_or(true, |s| meeting.status == s)
            && matches_search(
                &self.search,
                &[
                    meeting.title.as_deref().unwrap_or(""),
                    meeting.meeting_type.label(),
                    &presenters,
                    meeting.location.as_deref().unwrap_or(""),
                ],
            )
    }
}

/// Filter then sort by date (and start time)
pub fn filter_meetings(meetings: &[GroupMeeting], filter: &MeetingFilter, today: NaiveDate) -> Vec<GroupMeeting> {
    let mut result: Vec<GroupMeeting> = meetings.iter().filter(|m| filter.matches(m, today)).cloned().collect();
    result.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
    if filter.order == SortOrder::Descending {
        result.reverse();
    }
    result
}

// ========================
// Requests
// ========================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestFilter {
    pub search: String,
    pub status: Option<RequestStatus>,
}

/// Filter, newest first
pub fn filter_requests(requests: &[Request], filter: &RequestFilter) -> Vec<Request> {
    let mut result: Vec<Request> = requests
        .iter()
        .filter(|r| filter.status.map_or(true, |s| r.status == s))
        .filter(|r| {
            matches_search(
                &filter.search,
                &[
                    &r.item_name,
                    r.vendor.as_deref().unwrap_or(""),
                    r.catalog_number.as_deref().unwrap_or(""),
                    r.requested_by.as_deref().unwrap_or(""),
                ],
            )
        })
        .cloned()
        .collect();
    result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    result
}

/// Sum of quantity × unit price; rows without a price count as zero
pub fn total_cost(requests: &[Request]) -> f64 {
    requests.iter().filter_map(Request::total_cost).sum()
}

// ========================
// Tasks
// ========================

pub fn filter_recurring_tasks(tasks: &[RecurringTask], search: &str, show_inactive: bool) -> Vec<RecurringTask> {
    let mut result: Vec<RecurringTask> = tasks
        .iter()
        .filter(|t| show_inactive || t.is_active)
        .filter(|t| {
            let assignee = t.current_assignee.as_ref().map(|p| p.name.as_str()).unwrap_or("");
            matches_search(search, &[&t.title, t.description.as_deref().unwrap_or(""), assignee])
        })
        .cloned()
        .collect();
    // Undated tasks go last
    result.sort_by_key(|t| (t.next_due.is_none(), t.next_due));
    result
}

pub fn filter_one_time_tasks(tasks: &[OneTimeTask], search: &str, show_completed: bool) -> Vec<OneTimeTask> {
    let mut result: Vec<OneTimeTask> = tasks
        .iter()
        .filter(|t| show_completed || !t.completed)
        .filter(|t| {
            let assignee = t.assignee.as_ref().map(|p| p.name.as_str()).unwrap_or("");
            matches_search(search, &[&t.title, t.description.as_deref().unwrap_or(""), assignee])
        })
        .cloned()
        .collect();
    result.sort_by_key(|t| (t.completed, t.due_date.is_none(), t.due_date));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Presenter;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn meeting(id: u32, day: u32, meeting_type: MeetingType, presenter: &str) -> GroupMeeting {
        GroupMeeting {
            id,
            date: date(day),
            start_time: None,
            end_time: None,
            location: Some("Room 301".into()),
            meeting_type,
            status: MeetingStatus::Scheduled,
            title: None,
            description: None,
            presenters: vec![Presenter { id, name: presenter.into(), email: None, is_active: true }],
            materials: vec![],
        }
    }

    fn request(id: u32, name: &str, status: RequestStatus, qty: u32, price: Option<f64>) -> Request {
        Request {
            id,
            item_name: name.into(),
            catalog_number: None,
            vendor: Some("Sigma".into()),
            quantity: qty,
            unit_price: price,
            fund: None,
            status,
            notes: None,
            requested_by: Some("Dana".into()),
            created_at: None,
        }
    }

    #[test]
    fn test_matches_search_terms() {
        assert!(matches_search("ethanol sigma", &["Ethanol 70%", "Sigma-Aldrich"]));
        assert!(!matches_search("ethanol fisher", &["Ethanol 70%", "Sigma-Aldrich"]));
        assert!(matches_search("   ", &["x"]));
    }

    #[test]
    fn test_filter_meetings_range_and_order() {
        let meetings = vec![
            meeting(1, 20, MeetingType::JournalClub, "Ana"),
            meeting(2, 10, MeetingType::ResearchUpdate, "Ben"),
            meeting(3, 30, MeetingType::ResearchUpdate, "Cleo"),
        ];
        let today = date(16);

        let upcoming = filter_meetings(&meetings, &MeetingFilter::default(), today);
        assert_eq!(upcoming.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 3]);

        let filter = MeetingFilter { range: TimeRange::All, order: SortOrder::Descending, ..Default::default() };
        let all = filter_meetings(&meetings, &filter, today);
        assert_eq!(all.iter().map(|m| m.id).collect::<Vec<_>>(), vec![3, 1, 2]);

        let past = MeetingFilter { range: TimeRange::Past, ..Default::default() };
        assert_eq!(filter_meetings(&meetings, &past, today).len(), 1);
    }

    #[test]
    fn test_filter_meetings_by_type_and_presenter() {
        let meetings = vec![
            meeting(1, 20, MeetingType::JournalClub, "Ana"),
            meeting(3, 30, MeetingType::ResearchUpdate, "Cleo"),
        ];
        let by_type = MeetingFilter { meeting_type: Some(MeetingType::ResearchUpdate), ..Default::default() };
        assert_eq!(filter_meetings(&meetings, &by_type, date(16))[0].id, 3);

        let by_name = MeetingFilter { search: "ana".into(), ..Default::default() };
        assert_eq!(filter_meetings(&meetings, &by_name, date(16))[0].id, 1);
    }

    #[test]
    fn test_filter_requests_newest_first() {
        let requests = vec![
            request(1, "Pipette tips", RequestStatus::Pending, 2, Some(10.0)),
            request(2, "Ethanol", RequestStatus::Approved, 1, None),
            request(3, "Gloves", RequestStatus::Pending, 5, Some(4.5)),
        ];
        let pending = filter_requests(&requests, &RequestFilter { status: Some(RequestStatus::Pending), ..Default::default() });
        assert_eq!(pending.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 1]);

        let search = filter_requests(&requests, &RequestFilter { search: "dana eth".into(), status: None });
        assert_eq!(search.len(), 1);
        assert_eq!(search[0].id, 2);
    }

    #[test]
    fn test_total_cost() {
        let requests = vec![
            request(1, "A", RequestStatus::Pending, 2, Some(10.0)),
            request(2, "B", RequestStatus::Pending, 3, None),
            request(3, "C", RequestStatus::Pending, 4, Some(2.5)),
        ];
        assert_eq!(total_cost(&requests), 30.0);
        assert_eq!(total_cost(&[]), 0.0);
    }

    #[test]
    fn test_one_time_tasks_hide_completed() {
        let task = |id, completed, due| OneTimeTask {
            id,
            title: format!("Task {}", id),
            description: None,
            due_date: due,
            assignee: None,
            completed,
        };
        let tasks = vec![task(1, true, Some(date(1))), task(2, false, None), task(3, false, Some(date(5)))];
        let open = filter_one_time_tasks(&tasks, "", false);
        assert_eq!(open.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!(filter_one_time_tasks(&tasks, "", true).len(), 3);
    }
}
