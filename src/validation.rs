//! Form Validation
//!
//! Field parsers and per-form validators. Each form collects raw input
//! strings into a `*Form` struct and gets back either a typed payload or
//! [`FieldErrors`] keyed by field name.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};

use crate::models::{
    Fund, GenerateMeetingsRequest, MeetingConfiguration, MeetingType, NewMeeting, NewOneTimeTask, NewRecurringTask,
    NewRequest, PostponeRequest, TaskFrequency,
};

/// Materials larger than this are refused before upload
pub const MAX_UPLOAD_BYTES: f64 = 50.0 * 1024.0 * 1024.0;

pub const MAX_PRESENTERS: u8 = 5;
pub const MAX_REMINDER_DAYS: u8 = 14;

/// Field name → message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        // First error per field wins
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<String> {
        self.0.get(field).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

// ========================
// Field Parsers
// ========================

pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn parse_positive_int(raw: &str) -> Result<u32, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Required".into());
    }
    // Spreadsheets hand back "3.0" for integer cells
    let normalized = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    match normalized.parse::<u32>() {
        Ok(0) => Err("Must be greater than zero".into()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("\"{}\" is not a whole number", trimmed)),
    }
}

/// Non-negative decimal; accepts a leading `$` and thousands commas
pub fn parse_price(raw: &str) -> Result<Option<f64>, String> {
    let cleaned: String = raw.trim().trim_start_matches('$').chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok(None);
    }
    match cleaned.parse::<f64>() {
        Ok(p) if !p.is_finite() => Err(format!("\"{}\" is not a price", raw.trim())),
        Ok(p) if p < 0.0 => Err("Must not be negative".into()),
        Ok(p) => Ok(Some(p)),
        Err(_) => Err(format!("\"{}\" is not a price", raw.trim())),
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Required".into());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| "Use YYYY-MM-DD".to_string())
}

pub fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(raw).map(Some)
    }
}

/// `HH:MM` as produced by `<input type="time">`, seconds optional
pub fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Required".into());
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| "Use HH:MM".to_string())
}

fn parse_bounded(raw: &str, max: u8) -> Result<u8, String> {
    match raw.trim().parse::<u8>() {
        Ok(n) if n <= max => Ok(n),
        _ => Err(format!("Enter a number from 0 to {}", max)),
    }
}

/// Match a fund by code or name, case-insensitively
pub fn find_fund<'a>(funds: &'a [Fund], raw: &str) -> Option<&'a Fund> {
    let needle = raw.trim().to_lowercase();
    funds.iter().find(|f| {
        f.name.to_lowercase() == needle || f.code.as_deref().is_some_and(|c| c.to_lowercase() == needle)
    })
}

pub fn validate_upload_size(size: f64) -> Result<(), String> {
    if size > MAX_UPLOAD_BYTES {
        Err(format!("File is {:.1} MB; the limit is 50 MB", size / (1024.0 * 1024.0)))
    } else {
        Ok(())
    }
}

// ========================
// Forms
// ========================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestForm {
    pub item_name: String,
    pub catalog_number: String,
    pub vendor: String,
    pub quantity: String,
    pub unit_price: String,
    /// Selected fund id, empty for none
    pub fund: String,
    pub notes: String,
}

pub fn validate_request(form: &RequestForm) -> Result<NewRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    if form.item_name.trim().is_empty() {
        errors.add("item_name", "Item name is required");
    }
    let quantity = parse_positive_int(&form.quantity).map_err(|e| errors.add("quantity", e)).unwrap_or(0);
    let unit_price = parse_price(&form.unit_price).map_err(|e| errors.add("unit_price", e)).unwrap_or(None);
    let fund = match form.fund.trim() {
        "" => None,
        id => id.parse::<u32>().map_err(|_| errors.add("fund", "Pick a fund from the list")).ok(),
    };
    errors.into_result(|| NewRequest {
        item_name: form.item_name.trim().to_string(),
        catalog_number: optional_text(&form.catalog_number),
        vendor: optional_text(&form.vendor),
        quantity,
        unit_price,
        fund,
        notes: optional_text(&form.notes),
    })
}

/// The new date must come after the meeting's current date
pub fn validate_postpone(current: NaiveDate, new_date: &str, reason: &str) -> Result<PostponeRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    let new_date = match parse_date(new_date) {
        Ok(d) if d <= current => {
            errors.add("new_date", format!("Pick a date after {}", current.format("%Y-%m-%d")));
            None
        }
        Ok(d) => Some(d),
        Err(e) => {
            errors.add("new_date", e);
            None
        }
    };
    match new_date {
        Some(new_date) if errors.is_empty() => Ok(PostponeRequest { new_date, reason: optional_text(reason) }),
        _ => Err(errors),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationForm {
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub research_update_presenters: String,
    pub journal_club_presenters: String,
    pub reminder_days_before: String,
}

impl From<&MeetingConfiguration> for ConfigurationForm {
    fn from(c: &MeetingConfiguration) -> Self {
        Self {
            day_of_week: c.day_of_week.to_string(),
            start_time: c.start_time.format("%H:%M").to_string(),
            end_time: c.end_time.format("%H:%M").to_string(),
            location: c.location.clone(),
            research_update_presenters: c.research_update_presenters.to_string(),
            journal_club_presenters: c.journal_club_presenters.to_string(),
            reminder_days_before: c.reminder_days_before.to_string(),
        }
    }
}

pub fn validate_configuration(form: &ConfigurationForm) -> Result<MeetingConfiguration, FieldErrors> {
    let mut errors = FieldErrors::new();
    let day_of_week = parse_bounded(&form.day_of_week, 6).map_err(|_| errors.add("day_of_week", "Pick a weekday")).ok();
    let start_time = parse_time(&form.start_time).map_err(|e| errors.add("start_time", e)).ok();
    let end_time = parse_time(&form.end_time).map_err(|e| errors.add("end_time", e)).ok();
    if let (Some(start), Some(end)) = (start_time, end_time) {
        if end <= start {
            errors.add("end_time", "End time must be after start time");
        }
    }
    if form.location.trim().is_empty() {
        errors.add("location", "Location is required");
    }
    let research = parse_bounded(&form.research_update_presenters, MAX_PRESENTERS)
        .map_err(|e| errors.add("research_update_presenters", e))
        .ok();
    let journal = parse_bounded(&form.journal_club_presenters, MAX_PRESENTERS)
        .map_err(|e| errors.add("journal_club_presenters", e))
        .ok();
    let reminder = parse_bounded(&form.reminder_days_before, MAX_REMINDER_DAYS)
        .map_err(|e| errors.add("reminder_days_before", e))
        .ok();

    match (day_of_week, start_time, end_time, research, journal, reminder) {
        (Some(day_of_week), Some(start_time), Some(end_time), Some(research), Some(journal), Some(reminder))
            if errors.is_empty() =>
        {
            Ok(MeetingConfiguration {
                day_of_week,
                start_time,
                end_time,
                location: form.location.trim().to_string(),
                research_update_presenters: research,
                journal_club_presenters: journal,
                reminder_days_before: reminder,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_generate(start: &str, end: &str) -> Result<GenerateMeetingsRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    let start_date = parse_date(start).map_err(|e| errors.add("start_date", e)).ok();
    let end_date = parse_date(end).map_err(|e| errors.add("end_date", e)).ok();
    match (start_date, end_date) {
        (Some(s), Some(e)) if e <= s => {
            errors.add("end_date", "End date must be after start date");
            Err(errors)
        }
        (Some(start_date), Some(end_date)) => Ok(GenerateMeetingsRequest { start_date, end_date }),
        _ => Err(errors),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingForm {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub meeting_type: String,
    pub title: String,
    pub description: String,
}

pub fn validate_meeting(form: &MeetingForm) -> Result<NewMeeting, FieldErrors> {
    let mut errors = FieldErrors::new();
    let date = parse_date(&form.date).map_err(|e| errors.add("date", e)).ok();
    let optional_time = |raw: &str| if raw.trim().is_empty() { Ok(None) } else { parse_time(raw).map(Some) };
    let start_time = optional_time(&form.start_time).map_err(|e| errors.add("start_time", e)).unwrap_or(None);
    let end_time = optional_time(&form.end_time).map_err(|e| errors.add("end_time", e)).unwrap_or(None);
    if let (Some(start), Some(end)) = (start_time, end_time) {
        if end <= start {
            errors.add("end_time", "End time must be after start time");
        }
    }
    let meeting_type = MeetingType::from_str(&form.meeting_type);
    if meeting_type.is_none() {
        errors.add("meeting_type", "Pick a meeting type");
    }
    match (date, meeting_type) {
        (Some(date), Some(meeting_type)) if errors.is_empty() => Ok(NewMeeting {
            date,
            start_time,
            end_time,
            location: optional_text(&form.location),
            meeting_type,
            title: optional_text(&form.title),
            description: optional_text(&form.description),
        }),
        _ => Err(errors),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurringTaskForm {
    pub title: String,
    pub description: String,
    pub frequency: String,
    pub next_due: String,
    pub is_active: bool,
    pub assignee_ids: Vec<u32>,
}

pub fn validate_recurring_task(form: &RecurringTaskForm) -> Result<NewRecurringTask, FieldErrors> {
    let mut errors = FieldErrors::new();
    if form.title.trim().is_empty() {
        errors.add("title", "Title is required");
    }
    let frequency = TaskFrequency::from_str(&form.frequency);
    if frequency.is_none() {
        errors.add("frequency", "Pick a frequency");
    }
    let next_due = parse_optional_date(&form.next_due).map_err(|e| errors.add("next_due", e)).unwrap_or(None);
    if form.assignee_ids.is_empty() {
        errors.add("assignees", "Pick at least one assignee");
    }
    match frequency {
        Some(frequency) if errors.is_empty() => Ok(NewRecurringTask {
            title: form.title.trim().to_string(),
            description: optional_text(&form.description),
            frequency,
            next_due,
            is_active: form.is_active,
            assignee_ids: form.assignee_ids.clone(),
        }),
        _ => Err(errors),
    }
}

pub fn validate_one_time_task(title: &str, description: &str, due_date: &str, assignee: &str) -> Result<NewOneTimeTask, FieldErrors> {
    let mut errors = FieldErrors::new();
    if title.trim().is_empty() {
        errors.add("title", "Title is required");
    }
    let due_date = parse_optional_date(due_date).map_err(|e| errors.add("due_date", e)).unwrap_or(None);
    let assignee_id = assignee.trim().parse::<u32>().ok();
    errors.into_result(|| NewOneTimeTask {
        title: title.trim().to_string(),
        description: optional_text(description),
        due_date,
        assignee_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_positive_int() {
        assert_eq!(parse_positive_int(" 12 "), Ok(12));
        assert_eq!(parse_positive_int("3.0"), Ok(3));
        assert!(parse_positive_int("0").is_err());
        assert!(parse_positive_int("-2").is_err());
        assert!(parse_positive_int("2.5").is_err());
        assert_eq!(parse_positive_int(""), Err("Required".to_string()));
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$1,249.50"), Ok(Some(1249.5)));
        assert_eq!(parse_price("0"), Ok(Some(0.0)));
        assert_eq!(parse_price("  "), Ok(None));
        assert!(parse_price("-1").is_err());
        assert!(parse_price("cheap").is_err());
        assert!(parse_price("NaN").is_err());
    }

    #[test]
    fn test_parse_time_accepts_seconds() {
        assert_eq!(parse_time("14:30"), Ok(NaiveTime::from_hms_opt(14, 30, 0).unwrap()));
        assert_eq!(parse_time("09:05:00"), Ok(NaiveTime::from_hms_opt(9, 5, 0).unwrap()));
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn test_validate_request_collects_errors() {
        let form = RequestForm { quantity: "0".into(), unit_price: "-3".into(), ..Default::default() };
        let errors = validate_request(&form).unwrap_err();
        assert!(errors.get("item_name").is_some());
        assert!(errors.get("quantity").is_some());
        assert!(errors.get("unit_price").is_some());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_validate_request_builds_payload() {
        let form = RequestForm {
            item_name: " Nitrile gloves ".into(),
            quantity: "10".into(),
            unit_price: "7.25".into(),
            fund: "4".into(),
            ..Default::default()
        };
        let request = validate_request(&form).unwrap();
        assert_eq!(request.item_name, "Nitrile gloves");
        assert_eq!(request.quantity, 10);
        assert_eq!(request.unit_price, Some(7.25));
        assert_eq!(request.fund, Some(4));
        assert_eq!(request.vendor, None);
    }

    #[test]
    fn test_postpone_requires_later_date() {
        let current = date(2026, 11, 2);
        assert!(validate_postpone(current, "2026-11-02", "").is_err());
        assert!(validate_postpone(current, "2026-10-30", "").is_err());
        let ok = validate_postpone(current, "2026-11-09", " sick ").unwrap();
        assert_eq!(ok.new_date, date(2026, 11, 9));
        assert_eq!(ok.reason.as_deref(), Some("sick"));
    }

    #[test]
    fn test_configuration_ranges() {
        let form = ConfigurationForm {
            day_of_week: "2".into(),
            start_time: "15:00".into(),
            end_time: "14:00".into(),
            location: "".into(),
            research_update_presenters: "6".into(),
            journal_club_presenters: "1".into(),
            reminder_days_before: "15".into(),
        };
        let errors = validate_configuration(&form).unwrap_err();
        assert!(errors.get("end_time").is_some());
        assert!(errors.get("location").is_some());
        assert!(errors.get("research_update_presenters").is_some());
        assert!(errors.get("reminder_days_before").is_some());
        assert!(errors.get("journal_club_presenters").is_none());
    }

    #[test]
    fn test_configuration_round_trips_through_form() {
        let config = MeetingConfiguration {
            day_of_week: 3,
            start_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
            location: "Seminar room".into(),
            research_update_presenters: 2,
            journal_club_presenters: 1,
            reminder_days_before: 3,
        };
        assert_eq!(validate_configuration(&ConfigurationForm::from(&config)), Ok(config));
    }

    #[test]
    fn test_generate_range() {
        assert!(validate_generate("2026-11-01", "2026-11-01").is_err());
        assert!(validate_generate("", "2026-11-01").is_err());
        let range = validate_generate("2026-11-01", "2026-12-31").unwrap();
        assert_eq!(range.end_date, date(2026, 12, 31));
    }

    #[test]
    fn test_upload_limit() {
        assert!(validate_upload_size(10.0 * 1024.0 * 1024.0).is_ok());
        assert!(validate_upload_size(MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_upload_size(MAX_UPLOAD_BYTES + 1.0).is_err());
    }

    #[test]
    fn test_find_fund_by_code_or_name() {
        let funds = vec![
            Fund { id: 1, name: "NIH R01".into(), code: Some("R01-22".into()), remaining_budget: None },
            Fund { id: 2, name: "Startup".into(), code: None, remaining_budget: None },
        ];
        assert_eq!(find_fund(&funds, "r01-22").map(|f| f.id), Some(1));
        assert_eq!(find_fund(&funds, " startup ").map(|f| f.id), Some(2));
        assert!(find_fund(&funds, "NSF").is_none());
    }

    #[test]
    fn test_recurring_task_needs_assignee() {
        let form = RecurringTaskForm { title: "Clean hood".into(), frequency: "weekly".into(), ..Default::default() };
        assert!(validate_recurring_task(&form).unwrap_err().get("assignees").is_some());
        let form = RecurringTaskForm { assignee_ids: vec![1, 2], is_active: true, ..form };
        assert_eq!(validate_recurring_task(&form).unwrap().frequency, TaskFrequency::Weekly);
    }

    #[test]
    fn test_meeting_form() {
        let form = MeetingForm { date: "2026-11-05".into(), meeting_type: "special".into(), ..Default::default() };
        let meeting = validate_meeting(&form).unwrap();
        assert_eq!(meeting.meeting_type, MeetingType::Special);
        assert_eq!(meeting.start_time, None);

        let bad = MeetingForm { meeting_type: "party".into(), ..Default::default() };
        let errors = validate_meeting(&bad).unwrap_err();
        assert!(errors.get("date").is_some());
        assert!(errors.get("meeting_type").is_some());
    }
}
