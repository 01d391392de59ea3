//! Browser Camera Backend
//!
//! `getUserMedia` + `requestAnimationFrame` + `BarcodeDetector` (native or
//! polyfilled) behind the [`CameraBackend`] trait.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gloo_timers::callback::Timeout;
use serde::{Deserialize, Serialize};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack};

use crate::error::ScanError;
use crate::session::{CameraBackend, Detection, FrameAction, ScanEvent, ScanPhase, ScanSession};
use crate::symbology::{default_formats, Symbology};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = BarcodeDetector)]
    type BarcodeDetector;

    #[wasm_bindgen(constructor, catch)]
    fn new(options: &JsValue) -> Result<BarcodeDetector, JsValue>;

    #[wasm_bindgen(static_method_of = BarcodeDetector, js_name = getSupportedFormats, catch)]
    fn get_supported_formats() -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn detect(this: &BarcodeDetector, source: &HtmlVideoElement) -> Result<js_sys::Promise, JsValue>;
}

/// Options for opening the camera
#[derive(Clone, Debug)]
pub struct ScannerOptions {
    /// Symbologies to ask the decoder for
    pub formats: Vec<Symbology>,
    /// `facingMode` preference (`environment` = rear camera)
    pub facing_mode: &'static str,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            formats: default_formats(),
            facing_mode: "environment",
        }
    }
}

#[derive(Serialize)]
struct Ideal<T> {
    ideal: T,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoConstraints {
    facing_mode: Ideal<&'static str>,
    width: Ideal<u32>,
    height: Ideal<u32>,
}

#[derive(Serialize)]
struct Constraints {
    video: VideoConstraints,
    audio: bool,
}

#[derive(Serialize)]
struct DetectorOptions {
    formats: Vec<String>,
}

#[derive(Deserialize)]
struct RawDetection {
    #[serde(rename = "rawValue")]
    raw_value: String,
    format: String,
}

/// Keep the requested formats the decoder says it supports
pub fn negotiate_formats(requested: &[Symbology], supported: &[String]) -> Vec<String> {
    requested
        .iter()
        .map(|s| s.format_name().to_string())
        .filter(|name| supported.iter().any(|s| s == name))
        .collect()
}

type SharedSession = Rc<RefCell<ScanSession<WebCamera>>>;
type WeakSession = Weak<RefCell<ScanSession<WebCamera>>>;

/// [`CameraBackend`] for the browser
pub struct WebCamera {
    window: web_sys::Window,
    video: HtmlVideoElement,
    stream: Option<MediaStream>,
    detector: Rc<RefCell<Option<BarcodeDetector>>>,
    frame_cb: Option<Closure<dyn FnMut()>>,
    retry: Option<Timeout>,
    session: WeakSession,
    on_event: Rc<dyn Fn(ScanEvent)>,
}

impl WebCamera {
    fn detect_current_frame(&self) -> Result<js_sys::Promise, JsValue> {
        match self.detector.borrow().as_ref() {
            Some(detector) => detector.detect(&self.video),
            None => Err(JsValue::from_str("decoder not initialized")),
        }
    }
}

impl CameraBackend for WebCamera {
    type FrameHandle = i32;

    fn request_frame(&mut self) -> Result<i32, ScanError> {
        let cb = self
            .frame_cb
            .as_ref()
            .ok_or_else(|| ScanError::Browser("frame callback not bound".to_string()))?;
        self.window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .map_err(|e| ScanError::from_js(&e))
    }

    fn cancel_frame(&mut self, handle: i32) {
        let _ = self.window.cancel_animation_frame(handle);
    }

    fn decoder_ready(&self) -> bool {
        self.detector.borrow().is_some()
    }

    fn schedule_retry(&mut self, delay: Duration) {
        let session = self.session.clone();
        let on_event = self.on_event.clone();
        self.retry = Some(Timeout::new(delay.as_millis() as u32, move || {
            let Some(inner) = session.upgrade() else { return };
            let event = inner.borrow_mut().resume();
            drop(inner);
            if let Some(event) = event {
                emit_later(&on_event, event);
            }
        }));
    }

    fn cancel_retry(&mut self) {
        // Dropping a gloo Timeout clears it
        self.retry.take();
    }

    fn stop_tracks(&mut self) {
        if let Some(stream) = &self.stream {
            for track in stream.get_tracks().iter() {
                if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                    track.stop();
                }
            }
        }
    }

    fn detach_stream(&mut self) {
        self.video.set_src_object(None);
        self.stream = None;
    }

    fn release_decoder(&mut self) {
        self.detector.borrow_mut().take();
    }
}

/// An open camera scan. Dropping it releases the camera.
pub struct CameraScanner {
    session: SharedSession,
}

impl CameraScanner {
    /// Acquire the camera, attach it to `video` and start polling.
    ///
    /// Decoder initialization continues in the background; polling waits for
    /// it, and a failure is reported as `ScanEvent::Failed`.
    pub async fn open(
        video: HtmlVideoElement,
        options: ScannerOptions,
        on_event: impl Fn(ScanEvent) + 'static,
    ) -> Result<CameraScanner, ScanError> {
        let window = web_sys::window().ok_or(ScanError::CameraUnavailable)?;
        let devices = window.navigator().media_devices().map_err(|_| ScanError::CameraUnavailable)?;

        let constraints = serde_wasm_bindgen::to_value(&Constraints {
            video: VideoConstraints {
                facing_mode: Ideal { ideal: options.facing_mode },
                width: Ideal { ideal: 1280 },
                height: Ideal { ideal: 720 },
            },
            audio: false,
        })
        .map_err(|e| ScanError::Browser(e.to_string()))?
        .unchecked_into::<MediaStreamConstraints>();

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| ScanError::from_js(&e))?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(|e| ScanError::from_js(&e))?
            .dyn_into()
            .map_err(|_| ScanError::Browser("getUserMedia did not return a MediaStream".to_string()))?;

        video.set_muted(true);
        let _ = video.set_attribute("playsinline", "true");
        video.set_src_object(Some(&stream));
        if let Ok(play) = video.play() {
            spawn_local(async move {
                if let Err(e) = JsFuture::from(play).await {
                    log::warn!("[SCAN] video.play() rejected: {:?}", e);
                }
            });
        }

        let on_event: Rc<dyn Fn(ScanEvent)> = Rc::new(on_event);
        let detector = Rc::new(RefCell::new(None));
        let session: SharedSession = Rc::new(RefCell::new(ScanSession::new(WebCamera {
            window,
            video,
            stream: Some(stream),
            detector: detector.clone(),
            frame_cb: None,
            retry: None,
            session: Weak::new(),
            on_event: on_event.clone(),
        })));

        {
            let mut inner = session.borrow_mut();
            let backend = inner.backend_mut();
            backend.session = Rc::downgrade(&session);
            backend.frame_cb = Some(frame_callback(Rc::downgrade(&session), on_event.clone()));
        }
        let started = session.borrow_mut().start();
        started?;

        init_decoder(Rc::downgrade(&session), detector, options.formats, on_event);
        log::info!("[SCAN] camera opened");
        Ok(CameraScanner { session })
    }

    pub fn phase(&self) -> ScanPhase {
        self.session.borrow().phase()
    }

    /// Release the camera now. Idempotent.
    pub fn close(&self) {
        self.session.borrow_mut().close();
        log::debug!("[SCAN] camera closed");
    }
}

fn frame_callback(session: WeakSession, on_event: Rc<dyn Fn(ScanEvent)>) -> Closure<dyn FnMut()> {
    Closure::<dyn FnMut()>::new(move || {
        let Some(inner) = session.upgrade() else { return };
        let action = inner.borrow_mut().on_frame();
        match action {
            FrameAction::Detect => {
                let promise = inner.borrow().backend().detect_current_frame();
                run_detect(session.clone(), promise, on_event.clone());
            }
            FrameAction::Failed(err) => {
                drop(inner);
                emit_later(&on_event, ScanEvent::Failed(err));
            }
            FrameAction::Idle | FrameAction::Waiting => {}
        }
    })
}

/// Deliver an event from a fresh task. The handler may drop the scanner,
/// which owns the JS callback that is currently running.
fn emit_later(on_event: &Rc<dyn Fn(ScanEvent)>, event: ScanEvent) {
    let on_event = on_event.clone();
    spawn_local(async move { on_event(event) });
}

fn run_detect(session: WeakSession, promise: Result<js_sys::Promise, JsValue>, on_event: Rc<dyn Fn(ScanEvent)>) {
    spawn_local(async move {
        let outcome = match promise {
            Ok(p) => JsFuture::from(p).await,
            Err(e) => Err(e),
        };
        // Session dropped while the decoder ran: discard the result
        let Some(inner) = session.upgrade() else { return };
        let event = match outcome {
            Ok(value) => {
                let detections = parse_detections(value);
                inner.borrow_mut().on_detection(detections)
            }
            Err(e) => {
                log::debug!("[SCAN] detect failed: {:?}", e);
                inner.borrow_mut().on_detect_failed()
            }
        };
        drop(inner);
        if let Some(event) = event {
            on_event(event);
        }
    });
}

fn parse_detections(value: JsValue) -> Vec<Detection> {
    match serde_wasm_bindgen::from_value::<Vec<RawDetection>>(value) {
        Ok(raw) => raw
            .into_iter()
            .map(|d| Detection {
                symbology: Symbology::from_format(&d.format),
                raw_value: d.raw_value,
            })
            .collect(),
        Err(e) => {
            log::warn!("[SCAN] unexpected detect result: {}", e);
            Vec::new()
        }
    }
}

fn init_decoder(
    session: WeakSession,
    detector: Rc<RefCell<Option<BarcodeDetector>>>,
    requested: Vec<Symbology>,
    on_event: Rc<dyn Fn(ScanEvent)>,
) {
    spawn_local(async move {
        let result = create_detector(&requested).await;
        let Some(inner) = session.upgrade() else { return };
        if inner.borrow().is_closed() {
            return;
        }
        match result {
            Ok(d) => {
                *detector.borrow_mut() = Some(d);
                log::debug!("[SCAN] decoder ready");
            }
            Err(err) => {
                log::error!("[SCAN] {}", err);
                inner.borrow_mut().close();
                drop(inner);
                on_event(ScanEvent::Failed(err));
            }
        }
    });
}

async fn create_detector(requested: &[Symbology]) -> Result<BarcodeDetector, ScanError> {
    let unavailable = |e: JsValue| ScanError::DecoderUnavailable(e.as_string().unwrap_or_else(|| format!("{:?}", e)));

    let supported = JsFuture::from(BarcodeDetector::get_supported_formats().map_err(unavailable)?)
        .await
        .map_err(unavailable)?;
    let supported: Vec<String> = serde_wasm_bindgen::from_value(supported)
        .map_err(|e| ScanError::DecoderUnavailable(e.to_string()))?;

    let formats = negotiate_formats(requested, &supported);
    if formats.is_empty() {
        return Err(ScanError::DecoderUnavailable("no requested barcode format is supported".to_string()));
    }
    let options = serde_wasm_bindgen::to_value(&DetectorOptions { formats })
        .map_err(|e| ScanError::DecoderUnavailable(e.to_string()))?;
    BarcodeDetector::new(&options).map_err(unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_formats_keeps_supported_in_request_order() {
        let supported = vec!["qr_code".to_string(), "ean_13".to_string(), "aztec".to_string()];
        let requested = vec![Symbology::Ean13, Symbology::Code128, Symbology::QrCode];
        assert_eq!(negotiate_formats(&requested, &supported), vec!["ean_13", "qr_code"]);
        assert!(negotiate_formats(&requested, &[]).is_empty());
    }
}
