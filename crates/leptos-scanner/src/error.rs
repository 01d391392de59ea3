//! Scanner error types

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Failure to acquire or drive the camera/decoder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("Camera permission was denied")]
    PermissionDenied,

    #[error("No usable camera was found")]
    CameraUnavailable,

    #[error("Barcode decoder unavailable: {0}")]
    DecoderUnavailable(String),

    #[error("Browser error: {0}")]
    Browser(String),
}

impl ScanError {
    /// Classify a `getUserMedia` rejection by its `DOMException` name
    pub fn from_dom_exception(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "SecurityError" | "PermissionDeniedError" => Self::PermissionDenied,
            "NotFoundError" | "DevicesNotFoundError" | "OverconstrainedError" | "NotReadableError" | "TrackStartError" => {
                Self::CameraUnavailable
            }
            _ => Self::Browser(format!("{}: {}", name, message)),
        }
    }

    pub(crate) fn from_js(value: &JsValue) -> Self {
        if let Some(exc) = value.dyn_ref::<web_sys::DomException>() {
            return Self::from_dom_exception(&exc.name(), &exc.message());
        }
        Self::Browser(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }

    /// Whether the UI should drop to manual entry instead of offering a retry
    pub fn falls_back_to_manual(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::CameraUnavailable | Self::DecoderUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_dom_exceptions() {
        assert_eq!(ScanError::from_dom_exception("NotAllowedError", "denied"), ScanError::PermissionDenied);
        assert_eq!(ScanError::from_dom_exception("NotFoundError", ""), ScanError::CameraUnavailable);
        assert_eq!(ScanError::from_dom_exception("OverconstrainedError", ""), ScanError::CameraUnavailable);
        assert_eq!(
            ScanError::from_dom_exception("AbortError", "stopped"),
            ScanError::Browser("AbortError: stopped".to_string())
        );
    }

    #[test]
    fn test_manual_fallback() {
        assert!(ScanError::PermissionDenied.falls_back_to_manual());
        assert!(ScanError::DecoderUnavailable("missing".into()).falls_back_to_manual());
        assert!(!ScanError::Browser("raf".into()).falls_back_to_manual());
    }
}
