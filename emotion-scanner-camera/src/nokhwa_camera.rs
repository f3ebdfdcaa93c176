//! Native webcam provider built on nokhwa.
//!
//! The camera is opened and read on a dedicated thread that keeps decoding
//! frames into a `FrameSlot`; `capture` clones the latest one. The platform
//! camera handle never leaves that thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;
use parking_lot::Mutex;

use emotion_scanner_core::models::config::ScannerConfig;
use emotion_scanner_core::models::device::{CameraDevice, FacingMode};
use emotion_scanner_core::models::error::{AcquisitionError, CaptureError};
use emotion_scanner_core::models::frame::Frame;
use emotion_scanner_core::traits::frame_provider::FrameProvider;

use crate::device_enumerator::{parse_index, CameraEnumerator};
use crate::permissions::{classify_open_error, request_camera_permission};
use crate::selection::select_device;
use crate::slot_stream::{FrameSlot, SlotStream};

/// Consecutive read failures before the device is reported lost.
const MAX_CONSECUTIVE_FAILURES: u32 = 30;
const RETRY_DELAY: Duration = Duration::from_millis(10);

/// Webcam capture through the platform's native API (V4L2, Media
/// Foundation, AVFoundation).
pub struct NokhwaCamera {
    pinned: Option<CameraDevice>,
    opened: Mutex<Option<CameraDevice>>,
}

impl NokhwaCamera {
    /// Pick a camera at acquisition time from the config's facing mode.
    pub fn default_device() -> Self {
        Self {
            pinned: None,
            opened: Mutex::new(None),
        }
    }

    /// Always open `device`, ignoring facing preferences.
    pub fn with_device(device: CameraDevice) -> Self {
        Self {
            pinned: Some(device),
            opened: Mutex::new(None),
        }
    }

    fn resolve_device(&self, config: &ScannerConfig) -> Result<CameraDevice, AcquisitionError> {
        if let Some(ref device) = self.pinned {
            return Ok(device.clone());
        }
        let devices = CameraEnumerator::new().list_cameras()?;
        select_device(&devices, config)
            .cloned()
            .ok_or(AcquisitionError::DeviceNotAvailable)
    }
}

impl FrameProvider for NokhwaCamera {
    type Stream = SlotStream;

    fn is_available(&self) -> bool {
        CameraEnumerator::new()
            .list_cameras()
            .map(|cameras| !cameras.is_empty())
            .unwrap_or(false)
    }

    fn acquire(&self, config: &ScannerConfig) -> Result<SlotStream, AcquisitionError> {
        request_camera_permission()?;

        let device = self.resolve_device(config)?;
        let index = parse_index(&device.id);
        let resolution = config.resolution;
        log::info!("Opening camera '{}' (id {})", device.name, device.id);

        let (ready_tx, ready_rx) = mpsc::channel();
        let stream = SlotStream::spawn("nokhwa-capture", move |running, slot| {
            capture_loop(index, resolution, running, slot, ready_tx);
        })
        .map_err(|e| AcquisitionError::Backend(format!("failed to spawn capture thread: {}", e)))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                *self.opened.lock() = Some(device);
                Ok(stream)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(AcquisitionError::Backend(
                "capture thread exited while opening the camera".into(),
            )),
        }
    }

    fn capture(&self, stream: &mut SlotStream) -> Result<Frame, CaptureError> {
        stream.latest()
    }

    fn release(&self, stream: &mut SlotStream) {
        stream.stop();
    }

    fn device_info(&self) -> CameraDevice {
        if let Some(device) = self.opened.lock().clone() {
            return device;
        }
        self.pinned.clone().unwrap_or_else(|| CameraDevice {
            id: "default".into(),
            name: "Default Camera".into(),
            facing: Some(FacingMode::User),
            is_default: true,
        })
    }
}

/// Body of the capture thread.
///
/// Sequence:
/// 1. Open the camera with the requested format
/// 2. Start the stream and report readiness (or the failure) to `acquire`
/// 3. Decode frames into the slot until `running` goes false
/// 4. Stop the stream
fn capture_loop(
    index: CameraIndex,
    resolution: Option<(u32, u32)>,
    running: Arc<AtomicBool>,
    slot: FrameSlot,
    ready: mpsc::Sender<Result<(), AcquisitionError>>,
) {
    let requested = match resolution {
        Some((width, height)) => RequestedFormat::new::<RgbFormat>(
            RequestedFormatType::HighestResolution(Resolution::new(width, height)),
        ),
        None => RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate),
    };

    let mut camera = match Camera::new(index, requested) {
        Ok(camera) => camera,
        Err(e) => {
            let _ = ready.send(Err(classify_open_error(&e.to_string())));
            return;
        }
    };

    if let Err(e) = camera.open_stream() {
        let _ = ready.send(Err(classify_open_error(&e.to_string())));
        return;
    }

    let native = camera.resolution();
    log::info!(
        "Camera stream open at {}x{}",
        native.width(),
        native.height()
    );
    let _ = ready.send(Ok(()));

    let mut failures: u32 = 0;
    while running.load(Ordering::SeqCst) {
        match camera
            .frame()
            .and_then(|buffer| buffer.decode_image::<RgbFormat>())
        {
            Ok(image) => {
                failures = 0;
                let (width, height) = (image.width(), image.height());
                match Frame::from_rgb(width, height, image.into_raw()) {
                    Ok(frame) => slot.store(frame),
                    Err(e) => log::warn!("Dropping malformed camera frame: {}", e),
                }
            }
            Err(e) => {
                failures += 1;
                log::debug!("Camera read failed ({} in a row): {}", failures, e);
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    log::error!("Camera stopped delivering frames: {}", e);
                    slot.mark_lost(e.to_string());
                    break;
                }
                thread::sleep(RETRY_DELAY);
            }
        }
    }

    if let Err(e) = camera.stop_stream() {
        log::warn!("Failed to stop camera stream: {}", e);
    }
}
