//! Scan Session State Machine
//!
//! Owns the camera resources for one scan and drives the frame-polling loop.
//! Platform work (animation frames, timers, media tracks, the decoder) goes
//! through [`CameraBackend`], so the loop itself has no browser dependency.

use std::time::Duration;

use crate::error::ScanError;
use crate::symbology::Symbology;

/// Pause after a rejected detection before polling resumes
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Platform resources a scan session drives
pub trait CameraBackend {
    /// Identifier of a scheduled frame callback
    type FrameHandle: Copy + PartialEq + std::fmt::Debug;

    /// Schedule the next poll on the platform's frame clock
    fn request_frame(&mut self) -> Result<Self::FrameHandle, ScanError>;
    /// Cancel a frame callback that has not fired yet
    fn cancel_frame(&mut self, handle: Self::FrameHandle);
    /// Whether the decoder finished initializing
    fn decoder_ready(&self) -> bool;
    /// Call back into [`ScanSession::resume`] after `delay`
    fn schedule_retry(&mut self, delay: Duration);
    fn cancel_retry(&mut self);
    fn stop_tracks(&mut self);
    fn detach_stream(&mut self);
    fn release_decoder(&mut self);
}

/// One decoded barcode
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detection {
    pub raw_value: String,
    pub symbology: Symbology,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanPhase {
    /// Created, loop not started
    Idle,
    /// Polling frames
    Scanning,
    /// Last detection failed validation, waiting for the retry timer
    Rejected,
    /// A valid detection was handed off; camera released
    Accepted,
    /// Closed by the caller; camera released
    Closed,
}

/// What the frame callback should do next
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameAction {
    /// Session is not scanning, nothing to do
    Idle,
    /// Decoder not ready yet, another frame was scheduled
    Waiting,
    /// Run the decoder on the current frame, then report to `on_detection`
    Detect,
    /// Scheduling the next frame failed; session closed
    Failed(ScanError),
}

/// Notifications for the UI
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanEvent {
    /// Detection failed validation; polling resumes after [`RETRY_DELAY`]
    Rejected { detection: Detection, reason: String },
    /// Polling restarted after a rejection
    Resumed,
    /// First valid detection; the session has stopped and released the camera
    Accepted(Detection),
    /// The camera or decoder failed
    Failed(ScanError),
}

/// Camera scan session over a [`CameraBackend`]
pub struct ScanSession<B: CameraBackend> {
    backend: B,
    phase: ScanPhase,
    pending_frame: Option<B::FrameHandle>,
    retry_pending: bool,
    released: bool,
}

impl<B: CameraBackend> ScanSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            phase: ScanPhase::Idle,
            pending_frame: None,
            retry_pending: false,
            released: false,
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.phase, ScanPhase::Closed)
    }

    pub fn pending_frame(&self) -> Option<B::FrameHandle> {
        self.pending_frame
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Start the polling loop
    pub fn start(&mut self) -> Result<(), ScanError> {
        if self.phase != ScanPhase::Idle {
            return Ok(());
        }
        self.phase = ScanPhase::Scanning;
        if let Err(err) = self.schedule_frame() {
            self.close();
            return Err(err);
        }
        Ok(())
    }

    fn schedule_frame(&mut self) -> Result<(), ScanError> {
        if let Some(old) = self.pending_frame.take() {
            self.backend.cancel_frame(old);
        }
        let handle = self.backend.request_frame()?;
        self.pending_frame = Some(handle);
        Ok(())
    }

    /// Called from the frame callback. The fired frame is no longer pending.
    pub fn on_frame(&mut self) -> FrameAction {
        self.pending_frame = None;
        if self.phase != ScanPhase::Scanning {
            return FrameAction::Idle;
        }
        if self.backend.decoder_ready() {
            return FrameAction::Detect;
        }
        match self.schedule_frame() {
            Ok(()) => FrameAction::Waiting,
            Err(err) => {
                self.close();
                FrameAction::Failed(err)
            }
        }
    }

    /// Report the decoder result for the frame requested by `FrameAction::Detect`
    pub fn on_detection(&mut self, detections: Vec<Detection>) -> Option<ScanEvent> {
        if self.phase != ScanPhase::Scanning {
            // Result of a detect call that outlived the loop
            return None;
        }
        let Some(detection) = detections.into_iter().find(|d| !d.raw_value.is_empty()) else {
            return self.schedule_frame().err().map(|err| {
                self.close();
                ScanEvent::Failed(err)
            });
        };

        if let Some(handle) = self.pending_frame.take() {
            self.backend.cancel_frame(handle);
        }

        match detection.symbology.validate(&detection.raw_value) {
            Err(err) => {
                log::debug!("[SCAN] rejected {} '{}': {}", detection.symbology.label(), detection.raw_value, err);
                self.phase = ScanPhase::Rejected;
                self.retry_pending = true;
                self.backend.schedule_retry(RETRY_DELAY);
                Some(ScanEvent::Rejected { detection, reason: err.to_string() })
            }
            Ok(()) => {
                log::info!("[SCAN] accepted {} '{}'", detection.symbology.label(), detection.raw_value);
                self.phase = ScanPhase::Accepted;
                self.release();
                Some(ScanEvent::Accepted(detection))
            }
        }
    }

    /// The decoder call failed for this frame; keep polling
    pub fn on_detect_failed(&mut self) -> Option<ScanEvent> {
        if self.phase != ScanPhase::Scanning {
            return None;
        }
        self.schedule_frame().err().map(|err| {
            self.close();
            ScanEvent::Failed(err)
        })
    }

    /// Retry timer fired: restart polling after a rejection
    pub fn resume(&mut self) -> Option<ScanEvent> {
        if self.phase != ScanPhase::Rejected {
            return None;
        }
        self.retry_pending = false;
        self.phase = ScanPhase::Scanning;
        match self.schedule_frame() {
            Ok(()) => Some(ScanEvent::Resumed),
            Err(err) => {
                self.close();
                Some(ScanEvent::Failed(err))
            }
        }
    }

    /// Stop scanning and release every camera resource. Idempotent.
    pub fn close(&mut self) {
        if self.phase == ScanPhase::Closed {
            return;
        }
        self.phase = ScanPhase::Closed;
        self.release();
    }

    fn release(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.backend.cancel_frame(handle);
        }
        if self.retry_pending {
            self.retry_pending = false;
            self.backend.cancel_retry();
        }
        if self.released {
            return;
        }
        self.released = true;
        self.backend.stop_tracks();
        self.backend.detach_stream();
        self.backend.release_decoder();
    }
}

impl<B: CameraBackend> Drop for ScanSession<B> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Default)]
    struct MockState {
        next_handle: u32,
        pending_frames: HashSet<u32>,
        active_tracks: usize,
        attached: bool,
        decoder_ready: bool,
        decoder_released: bool,
        retries: Vec<Duration>,
        retry_pending: bool,
        fail_frames: bool,
    }

    struct MockCamera {
        state: Rc<RefCell<MockState>>,
    }

    impl CameraBackend for MockCamera {
        type FrameHandle = u32;

        fn request_frame(&mut self) -> Result<u32, ScanError> {
            let mut s = self.state.borrow_mut();
            if s.fail_frames {
                return Err(ScanError::Browser("requestAnimationFrame failed".into()));
            }
            s.next_handle += 1;
            let handle = s.next_handle;
            s.pending_frames.insert(handle);
            Ok(handle)
        }

        fn cancel_frame(&mut self, handle: u32) {
            self.state.borrow_mut().pending_frames.remove(&handle);
        }

        fn decoder_ready(&self) -> bool {
            self.state.borrow().decoder_ready
        }

        fn schedule_retry(&mut self, delay: Duration) {
            let mut s = self.state.borrow_mut();
            s.retries.push(delay);
            s.retry_pending = true;
        }

        fn cancel_retry(&mut self) {
            self.state.borrow_mut().retry_pending = false;
        }

        fn stop_tracks(&mut self) {
            self.state.borrow_mut().active_tracks = 0;
        }

        fn detach_stream(&mut self) {
            self.state.borrow_mut().attached = false;
        }

        fn release_decoder(&mut self) {
            let mut s = self.state.borrow_mut();
            s.decoder_ready = false;
            s.decoder_released = true;
        }
    }

    fn open_session(decoder_ready: bool) -> (ScanSession<MockCamera>, Rc<RefCell<MockState>>) {
        let state = Rc::new(RefCell::new(MockState {
            active_tracks: 1,
            attached: true,
            decoder_ready,
            ..Default::default()
        }));
        let mut session = ScanSession::new(MockCamera { state: state.clone() });
        session.start().expect("start");
        (session, state)
    }

    /// Simulate the browser firing the pending frame callback
    fn fire_frame(session: &mut ScanSession<MockCamera>) -> FrameAction {
        let handle = session.pending_frame().expect("no frame pending");
        session.backend().state.borrow_mut().pending_frames.remove(&handle);
        session.on_frame()
    }

    fn detection(raw: &str, symbology: Symbology) -> Detection {
        Detection { raw_value: raw.to_string(), symbology }
    }

    #[test]
    fn test_waits_for_decoder() {
        let (mut session, state) = open_session(false);
        assert_eq!(state.borrow().pending_frames.len(), 1);

        assert_eq!(fire_frame(&mut session), FrameAction::Waiting);
        assert_eq!(state.borrow().pending_frames.len(), 1);

        state.borrow_mut().decoder_ready = true;
        assert_eq!(fire_frame(&mut session), FrameAction::Detect);
        assert!(state.borrow().pending_frames.is_empty());
    }

    #[test]
    fn test_empty_detection_keeps_polling() {
        let (mut session, state) = open_session(true);
        assert_eq!(fire_frame(&mut session), FrameAction::Detect);
        assert_eq!(session.on_detection(vec![]), None);
        assert_eq!(session.phase(), ScanPhase::Scanning);
        assert_eq!(state.borrow().pending_frames.len(), 1);
    }

    #[test]
    fn test_bad_checksum_rejected_then_resumes() {
        let (mut session, state) = open_session(true);
        fire_frame(&mut session);

        let event = session.on_detection(vec![detection("4006381333932", Symbology::Ean13)]);
        match event {
            Some(ScanEvent::Rejected { detection, reason }) => {
                assert_eq!(detection.raw_value, "4006381333932");
                assert!(reason.contains("check digit"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        assert_eq!(session.phase(), ScanPhase::Rejected);
        assert!(state.borrow().pending_frames.is_empty());
        assert_eq!(state.borrow().retries, vec![RETRY_DELAY]);
        assert_eq!(state.borrow().active_tracks, 1);

        assert_eq!(session.resume(), Some(ScanEvent::Resumed));
        assert_eq!(session.phase(), ScanPhase::Scanning);
        assert_eq!(state.borrow().pending_frames.len(), 1);
    }

    #[test]
    fn test_valid_detection_releases_camera() {
        let (mut session, state) = open_session(true);
        fire_frame(&mut session);

        let event = session.on_detection(vec![detection("4006381333931", Symbology::Ean13)]);
        assert_eq!(event, Some(ScanEvent::Accepted(detection("4006381333931", Symbology::Ean13))));
        assert_eq!(session.phase(), ScanPhase::Accepted);

        let s = state.borrow();
        assert_eq!(s.active_tracks, 0);
        assert!(s.pending_frames.is_empty());
        assert!(!s.attached);
        assert!(s.decoder_released);
    }

    #[test]
    fn test_close_releases_everything() {
        let (mut session, state) = open_session(true);
        session.close();
        session.close();

        let s = state.borrow();
        assert_eq!(s.active_tracks, 0);
        assert!(s.pending_frames.is_empty());
        assert!(!s.attached);
        assert!(s.decoder_released);
    }

    #[test]
    fn test_drop_releases_camera() {
        let (session, state) = open_session(false);
        drop(session);
        assert_eq!(state.borrow().active_tracks, 0);
        assert!(state.borrow().pending_frames.is_empty());
    }

    #[test]
    fn test_close_during_retry_cancels_timer() {
        let (mut session, state) = open_session(true);
        fire_frame(&mut session);
        session.on_detection(vec![detection("96385075", Symbology::Ean8)]);
        assert!(state.borrow().retry_pending);

        session.close();
        assert!(!state.borrow().retry_pending);

        // A timer that fires anyway must not restart the loop
        assert_eq!(session.resume(), None);
        assert!(state.borrow().pending_frames.is_empty());
    }

    #[test]
    fn test_stale_detection_after_close_is_ignored() {
        let (mut session, state) = open_session(true);
        fire_frame(&mut session);
        session.close();
        assert_eq!(session.on_detection(vec![detection("4006381333931", Symbology::Ean13)]), None);
        assert_eq!(session.on_detect_failed(), None);
        assert!(state.borrow().pending_frames.is_empty());
    }

    #[test]
    fn test_detect_failure_reschedules() {
        let (mut session, state) = open_session(true);
        fire_frame(&mut session);
        assert_eq!(session.on_detect_failed(), None);
        assert_eq!(state.borrow().pending_frames.len(), 1);
    }

    #[test]
    fn test_frame_failure_closes_session() {
        let (mut session, state) = open_session(false);
        state.borrow_mut().fail_frames = true;
        assert!(matches!(fire_frame(&mut session), FrameAction::Failed(ScanError::Browser(_))));
        assert!(session.is_closed());
        assert_eq!(state.borrow().active_tracks, 0);
    }
}
