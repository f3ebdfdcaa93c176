use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::classification::ClassificationResult;
use crate::models::config::ScannerConfig;
use crate::models::device::CameraDevice;
use crate::models::error::{AcquisitionError, CaptureError, ScannerError};
use crate::models::snapshot::{ScanDiagnostics, ScanSnapshot};
use crate::models::state::LifecycleState;
use crate::processing::classifier::Classifier;
use crate::processing::signal_extractor::SignalExtractor;
use crate::session::capture_session::CaptureSession;
use crate::session::monitor::ScanMonitor;
use crate::traits::frame_provider::FrameProvider;
use crate::traits::scan_delegate::ScanDelegate;

type AcquisitionResult<P> = Result<CaptureSession<P>, AcquisitionError>;

/// An acquisition running on the worker thread.
struct PendingAcquisition<P: FrameProvider> {
    cancelled: Arc<AtomicBool>,
    receiver: mpsc::Receiver<AcquisitionResult<P>>,
}

impl<P: FrameProvider> PendingAcquisition<P> {
    /// Mark cancelled and discard any result already delivered. A session
    /// that resolves later is released by the worker.
    fn cancel(self) {
        self.cancelled.store(true, Ordering::SeqCst);
        while let Ok(result) = self.receiver.try_recv() {
            if let Ok(session) = result {
                log::info!("Discarding session {} acquired after stop", session.id());
            }
        }
    }
}

/// Request for the next tick, consumed by the host's next frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TickHandle {
    id: u64,
}

/// Drives the capture → extract → classify → publish loop.
///
/// The host calls [`on_frame`](Self::on_frame) once per display refresh; each
/// call runs at most one tick, and each tick requests the next one. Camera
/// acquisition runs on a worker thread so `start` and `stop` never block.
///
/// ```text
/// start ─→ [acquire on worker] ─→ Scanning ─→ tick ─→ tick ─→ ... ─→ stop ─→ Idle
///                 ↓ failure
///               Error
/// ```
pub struct CaptureLifecycle<P: FrameProvider> {
    provider: Arc<P>,
    config: ScannerConfig,
    extractor: SignalExtractor,
    classifier: Classifier,
    state: LifecycleState,
    session: Option<CaptureSession<P>>,
    pending_acquisition: Option<PendingAcquisition<P>>,
    pending_tick: Option<TickHandle>,
    next_tick_id: u64,
    monitor: ScanMonitor,
    delegate: Option<Arc<dyn ScanDelegate>>,
    diagnostics: ScanDiagnostics,
}

impl<P: FrameProvider> CaptureLifecycle<P> {
    pub fn new(provider: Arc<P>, config: ScannerConfig) -> Result<Self, ScannerError> {
        config.validate().map_err(ScannerError::Configuration)?;
        Ok(Self {
            provider,
            config,
            extractor: SignalExtractor::new(),
            classifier: Classifier::new(),
            state: LifecycleState::Idle,
            session: None,
            pending_acquisition: None,
            pending_tick: None,
            next_tick_id: 0,
            monitor: ScanMonitor::new(),
            delegate: None,
            diagnostics: ScanDiagnostics::default(),
        })
    }

    /// Replace the classifier, e.g. with a seeded one.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn ScanDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn monitor(&self) -> ScanMonitor {
        self.monitor.clone()
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        self.monitor.snapshot()
    }

    pub fn current_result(&self) -> Option<ClassificationResult> {
        self.monitor.current_result()
    }

    pub fn diagnostics(&self) -> ScanDiagnostics {
        self.diagnostics.clone()
    }

    pub fn is_scanning(&self) -> bool {
        self.state.is_scanning()
    }

    /// Whether a camera request is still waiting on the device.
    pub fn is_acquiring(&self) -> bool {
        self.pending_acquisition.is_some()
    }

    pub fn has_pending_tick(&self) -> bool {
        self.pending_tick.is_some()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(CaptureSession::id)
    }

    pub fn available_devices(&self) -> Vec<CameraDevice> {
        if self.provider.is_available() {
            vec![self.provider.device_info()]
        } else {
            Vec::new()
        }
    }

    /// Request the camera. Valid from `Idle` or `Error`.
    ///
    /// Returns immediately; the outcome is applied by a later `on_frame` or
    /// `wait_for_acquisition`. Rejected while scanning or while a previous
    /// request is still pending.
    pub fn start(&mut self) -> Result<(), ScannerError> {
        if !self.state.can_start() || self.pending_acquisition.is_some() || self.session.is_some() {
            return Err(ScannerError::InvalidState(format!(
                "cannot start while {}",
                if self.pending_acquisition.is_some() {
                    "acquiring"
                } else {
                    self.state.name()
                }
            )));
        }

        let (sender, receiver) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));

        let provider = Arc::clone(&self.provider);
        let config = self.config.clone();
        let worker_cancelled = Arc::clone(&cancelled);

        let spawned = thread::Builder::new()
            .name("camera-acquire".into())
            .spawn(move || {
                let result = CaptureSession::open(provider, &config);
                if worker_cancelled.load(Ordering::SeqCst) {
                    if let Ok(session) = result {
                        log::info!("Releasing session {} acquired after stop", session.id());
                    }
                    return;
                }
                // If stop() dropped the receiver meanwhile, the session comes
                // back in the send error and is released on drop.
                if let Err(mpsc::SendError(Ok(session))) = sender.send(result) {
                    log::info!("Releasing undelivered session {}", session.id());
                }
            });

        if let Err(e) = spawned {
            let err = AcquisitionError::Backend(format!("failed to spawn acquisition thread: {}", e));
            self.fail_acquisition(err.clone());
            return Err(err.into());
        }

        log::info!(
            "Requesting {:?}-facing camera from {}",
            self.config.facing_mode,
            self.provider.device_info().name
        );
        self.pending_acquisition = Some(PendingAcquisition {
            cancelled,
            receiver,
        });
        Ok(())
    }

    /// Block until a pending acquisition resolves or `timeout` elapses.
    ///
    /// Returns `true` if nothing is pending anymore.
    pub fn wait_for_acquisition(&mut self, timeout: Duration) -> bool {
        let Some(pending) = self.pending_acquisition.as_ref() else {
            return true;
        };
        match pending.receiver.recv_timeout(timeout) {
            Ok(result) => {
                self.pending_acquisition = None;
                self.complete_acquisition(result);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                self.pending_acquisition = None;
                self.fail_acquisition(AcquisitionError::Backend(
                    "acquisition worker exited without a result".into(),
                ));
                true
            }
        }
    }

    /// Host frame callback. Applies a resolved acquisition, then runs at most
    /// one pending tick.
    pub fn on_frame(&mut self, now: DateTime<Utc>) {
        self.poll_acquisition();
        self.run_pending_tick(now);
    }

    /// Cancel everything and return to `Idle`. Valid from any state.
    pub fn stop(&mut self) {
        if let Some(tick) = self.pending_tick.take() {
            log::debug!("Cancelled tick {}", tick.id);
        }
        if let Some(pending) = self.pending_acquisition.take() {
            log::info!("Cancelling pending camera acquisition");
            pending.cancel();
        }
        self.release_session();
        self.monitor.publish(ScanSnapshot::for_state(&LifecycleState::Idle));
        self.set_state(LifecycleState::Idle);
    }

    /// Whether dropping this lifecycle must stop it.
    fn is_active(&self) -> bool {
        self.state.is_scanning()
            || self.session.is_some()
            || self.pending_acquisition.is_some()
            || self.pending_tick.is_some()
    }

    // --- Internal helpers ---

    fn poll_acquisition(&mut self) {
        let Some(pending) = self.pending_acquisition.as_ref() else {
            return;
        };
        match pending.receiver.try_recv() {
            Ok(result) => {
                self.pending_acquisition = None;
                self.complete_acquisition(result);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending_acquisition = None;
                self.fail_acquisition(AcquisitionError::Backend(
                    "acquisition worker exited without a result".into(),
                ));
            }
        }
    }

    fn complete_acquisition(&mut self, result: AcquisitionResult<P>) {
        match result {
            Ok(session) => {
                log::info!(
                    "Camera session {} opened on {} at {}",
                    session.id(),
                    session.device().name,
                    session.acquired_at().to_rfc3339()
                );
                self.session = Some(session);
                self.diagnostics.sessions_acquired += 1;
                self.monitor.publish(ScanSnapshot::for_state(&LifecycleState::Scanning));
                self.set_state(LifecycleState::Scanning);
                self.schedule_tick();
            }
            Err(e) => self.fail_acquisition(e),
        }
    }

    fn fail_acquisition(&mut self, error: AcquisitionError) {
        log::warn!("Camera acquisition failed: {}", error);
        self.diagnostics.acquisitions_failed += 1;
        self.enter_error(
            self.config.acquisition_error_message.clone(),
            ScannerError::Acquisition(error),
        );
    }

    fn enter_error(&mut self, message: String, error: ScannerError) {
        self.pending_tick = None;
        self.release_session();
        let state = LifecycleState::Error(message);
        self.monitor.publish(ScanSnapshot::for_state(&state));
        self.set_state(state);
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(&error);
        }
    }

    fn schedule_tick(&mut self) {
        self.next_tick_id += 1;
        self.pending_tick = Some(TickHandle {
            id: self.next_tick_id,
        });
    }

    fn run_pending_tick(&mut self, now: DateTime<Utc>) {
        let Some(tick) = self.pending_tick.take() else {
            return;
        };
        // Cancellation is re-checked here, not only when scheduling.
        if !self.state.is_scanning() {
            return;
        }
        let captured = match self.session.as_mut() {
            Some(session) => session.capture(),
            None => return,
        };

        match captured {
            Ok(frame) => {
                let signal = self.extractor.extract(&frame);
                let result = self.classifier.classify(&signal, now);
                log::trace!(
                    "Tick {}: {}x{} brightness={:.2} dispersion={:.2} -> {} ({}%)",
                    tick.id,
                    frame.width(),
                    frame.height(),
                    signal.brightness,
                    signal.dispersion,
                    result.label,
                    result.confidence
                );
                self.monitor.publish_result(result);
                self.diagnostics.ticks += 1;
                if let Some(ref delegate) = self.delegate {
                    delegate.on_result(&result);
                }
                self.schedule_tick();
            }
            Err(CaptureError::FrameUnavailable) => {
                log::debug!("Tick {}: no frame yet, skipping", tick.id);
                self.diagnostics.frames_skipped += 1;
                self.schedule_tick();
            }
            Err(CaptureError::DeviceLost(detail)) => {
                log::error!("Camera lost during tick {}: {}", tick.id, detail);
                self.enter_error(
                    format!("Camera disconnected: {}", detail),
                    ScannerError::Capture(CaptureError::DeviceLost(detail)),
                );
            }
        }
    }

    fn release_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            if session.release() {
                self.diagnostics.sessions_released += 1;
            }
        }
    }

    fn set_state(&mut self, new_state: LifecycleState) {
        if self.state == new_state {
            return;
        }
        log::debug!("Scanner state {} -> {}", self.state.name(), new_state.name());
        self.state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&self.state);
        }
    }
}

impl<P: FrameProvider> Drop for CaptureLifecycle<P> {
    fn drop(&mut self) {
        if self.is_active() {
            self.stop();
        }
    }
}
