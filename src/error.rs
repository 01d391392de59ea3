//! API error types
//!
//! Every network call returns [`ApiError`]. HTTP error bodies in the
//! backend's JSON shape (`{"detail": ...}`, `{"field": ["msg"]}`) are
//! flattened into one readable message.

use serde_json::Value;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("{message}")]
    Http { status: u16, message: String },

    /// 401: the token is missing or expired
    #[error("Session expired, please sign in again")]
    Unauthorized,

    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Cancelled through an `AbortSignal`
    #[error("Request cancelled")]
    Aborted,

    #[error("Browser error: {0}")]
    Browser(String),
}

impl ApiError {
    /// Build from a failed response
    pub fn from_response(status: u16, status_text: &str, body: &str) -> Self {
        if status == 401 {
            return Self::Unauthorized;
        }
        let message = extract_error_message(body).unwrap_or_else(|| {
            if status_text.is_empty() {
                format!("Request failed with status {}", status)
            } else {
                format!("{} ({})", status_text, status)
            }
        });
        Self::Http { status, message }
    }

    /// Classify a rejected `fetch` promise
    pub fn from_js(value: &JsValue) -> Self {
        if let Some(err) = value.dyn_ref::<js_sys::Error>() {
            let name = String::from(err.name());
            let message = String::from(err.message());
            return match name.as_str() {
                "AbortError" => Self::Aborted,
                "TypeError" => Self::Network(message),
                _ => Self::Browser(format!("{}: {}", name, message)),
            };
        }
        Self::Browser(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }

    /// Whether offering "Retry" makes sense
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }
}

/// Pull a human readable message out of an error body
pub fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        // Plain text bodies are shown as-is unless they are an HTML error page
        Err(_) if !trimmed.starts_with('<') && trimmed.len() <= 200 => return Some(trimmed.to_string()),
        Err(_) => return None,
    };
    flatten_messages(&value).filter(|m| !m.is_empty())
}

fn flatten_messages(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(flatten_messages).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        Value::Object(map) => {
            if let Some(detail) = map.get("detail").and_then(flatten_messages) {
                return Some(detail);
            }
            if let Some(errors) = map.get("non_field_errors").and_then(flatten_messages) {
                return Some(errors);
            }
            let parts: Vec<String> = map
                .iter()
                .filter_map(|(field, v)| flatten_messages(v).map(|m| format!("{}: {}", field, m)))
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_message() {
        assert_eq!(extract_error_message(r#"{"detail": "Not found."}"#), Some("Not found.".to_string()));
    }

    #[test]
    fn test_field_errors_are_joined() {
        let body = r#"{"quantity": ["Must be positive."], "item_name": ["This field is required."]}"#;
        let message = extract_error_message(body).unwrap();
        assert!(message.contains("quantity: Must be positive."));
        assert!(message.contains("item_name: This field is required."));
    }

    #[test]
    fn test_non_field_errors_win_over_fields() {
        let body = r#"{"non_field_errors": ["Dates overlap"], "date": ["bad"]}"#;
        assert_eq!(extract_error_message(body), Some("Dates overlap".to_string()));
    }

    #[test]
    fn test_plain_and_html_bodies() {
        assert_eq!(extract_error_message("Bad gateway"), Some("Bad gateway".to_string()));
        assert_eq!(extract_error_message("<html><body>500</body></html>"), None);
        assert_eq!(extract_error_message("   "), None);
    }

    #[test]
    fn test_from_response() {
        assert_eq!(ApiError::from_response(401, "Unauthorized", ""), ApiError::Unauthorized);
        assert_eq!(
            ApiError::from_response(503, "Service Unavailable", ""),
            ApiError::Http { status: 503, message: "Service Unavailable (503)".to_string() }
        );
        assert_eq!(
            ApiError::from_response(400, "", r#"{"detail": "Invalid barcode"}"#).to_string(),
            "Invalid barcode"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(ApiError::Network("offline".into()).is_retryable());
        assert!(ApiError::Http { status: 502, message: String::new() }.is_retryable());
        assert!(!ApiError::Http { status: 400, message: String::new() }.is_retryable());
        assert!(!ApiError::Aborted.is_retryable());
    }
}
