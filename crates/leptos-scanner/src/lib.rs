//! Leptos Barcode Scanner
//!
//! Camera barcode scanning for Leptos.
//! A [`ScanSession`] owns the camera stream, the frame-polling loop and the
//! decoder, and releases all of them on every exit path: explicit close,
//! acceptance of a detection, drop, or disposal of the owning component.

mod camera;
mod error;
mod session;
mod symbology;

use leptos::prelude::*;

pub use camera::{negotiate_formats, CameraScanner, ScannerOptions, WebCamera};
pub use error::ScanError;
pub use session::{CameraBackend, Detection, FrameAction, ScanEvent, ScanPhase, ScanSession, RETRY_DELAY};
pub use symbology::{default_formats, gs1_check_digit, Symbology, SymbologyError};

/// Component-scoped handle to at most one open camera scanner
#[derive(Clone, Copy)]
pub struct ScannerHandle {
    scanner: StoredValue<Option<CameraScanner>, LocalStorage>,
    /// Bumped on every open/close so a slow `open` that loses the race is dropped
    generation: StoredValue<u64>,
    /// Mirrors whether `scanner` holds a camera, for views to track
    open: RwSignal<bool>,
}

/// Create a scanner handle whose camera is released when the current
/// reactive owner is cleaned up
pub fn use_camera_scanner() -> ScannerHandle {
    let handle = ScannerHandle::new();
    on_cleanup(move || handle.close());
    handle
}

impl ScannerHandle {
    fn new() -> Self {
        Self {
            scanner: StoredValue::new_local(None),
            generation: StoredValue::new(0),
            open: RwSignal::new(false),
        }
    }

    /// Open the camera on `video`, replacing any scanner already open.
    ///
    /// `on_error` runs if the camera could not be acquired and this open is
    /// still the latest one.
    pub fn open<F, E>(&self, video: web_sys::HtmlVideoElement, options: ScannerOptions, on_event: F, on_error: E)
    where
        F: Fn(ScanEvent) + 'static,
        E: FnOnce(ScanError) + 'static,
    {
        self.close();
        let Some(generation) = self.generation.try_update_value(|g| {
            *g += 1;
            *g
        }) else {
            return;
        };
        let handle = *self;
        leptos::task::spawn_local(async move {
            let result = CameraScanner::open(video, options, on_event).await;
            let current = handle.generation.try_with_value(|g| *g) == Some(generation);
            match result {
                Ok(scanner) if current => {
                    handle.scanner.try_update_value(move |slot| *slot = Some(scanner));
                    handle.open.try_set(true);
                }
                // Superseded by a close or a newer open: dropping releases the camera
                Ok(_) => log::debug!("[SCAN] discarding superseded camera"),
                Err(err) if current => on_error(err),
                Err(err) => log::debug!("[SCAN] superseded open failed: {}", err),
            }
        });
    }

    /// Release the camera if open and invalidate any open in flight
    pub fn close(&self) {
        self.generation.try_update_value(|g| *g += 1);
        self.open.try_set(false);
        if let Some(Some(scanner)) = self.scanner.try_update_value(|slot| slot.take()) {
            scanner.close();
        }
    }

    /// Whether a camera is currently held; tracked when read in a reactive scope
    pub fn is_open(&self) -> bool {
        self.open.try_get().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_notifies_readers() {
        let handle = ScannerHandle::new();
        let retry_visible = Memo::new(move |_| !handle.is_open());
        assert!(retry_visible.get());

        handle.open.set(true);
        assert!(!retry_visible.get());

        handle.close();
        assert!(retry_visible.get());
        assert_eq!(handle.generation.get_value(), 1);
    }
}
