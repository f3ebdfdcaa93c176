//! Synthetic camera rendering a moving gradient.
//!
//! Behaves like a device: frames are produced on their own thread at a fixed
//! rate and `capture` only sees the latest one. Overall brightness swings
//! slowly so the scanner walks through every label.

use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use emotion_scanner_core::models::config::ScannerConfig;
use emotion_scanner_core::models::device::{CameraDevice, FacingMode};
use emotion_scanner_core::models::error::{AcquisitionError, CaptureError};
use emotion_scanner_core::models::frame::Frame;
use emotion_scanner_core::traits::frame_provider::FrameProvider;

use crate::slot_stream::SlotStream;

const DEFAULT_WIDTH: u32 = 160;
const DEFAULT_HEIGHT: u32 = 120;
const DEFAULT_FPS: u32 = 30;

/// Radians of brightness oscillation per rendered frame.
const PHASE_STEP: f64 = 0.02;

pub struct TestPatternCamera {
    width: u32,
    height: u32,
    fps: u32,
    denial: Option<AcquisitionError>,
}

impl TestPatternCamera {
    pub fn new(width: u32, height: u32, fps: u32) -> Self {
        Self {
            width,
            height,
            fps: fps.max(1),
            denial: None,
        }
    }

    /// A camera whose every acquisition fails with `error`.
    pub fn denying(error: AcquisitionError) -> Self {
        Self {
            denial: Some(error),
            ..Self::default()
        }
    }

    /// Render frame number `n`.
    ///
    /// Base level follows `sin(n * PHASE_STEP)`; a left-to-right ramp from
    /// half to full level adds dispersion.
    pub fn render(width: u32, height: u32, n: u64) -> Frame {
        let base = ((n as f64 * PHASE_STEP).sin() * 0.5 + 0.5) * 255.0;
        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        for _y in 0..height {
            for x in 0..width {
                let ramp = 0.5 + 0.5 * (x as f64 / width.max(1) as f64);
                let v = (base * ramp).round().clamp(0.0, 255.0) as u8;
                rgb.extend_from_slice(&[v, v, v]);
            }
        }
        match Frame::from_rgb(width, height, rgb) {
            Ok(frame) => frame,
            Err(_) => Frame::empty(),
        }
    }
}

impl Default for TestPatternCamera {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_FPS)
    }
}

impl FrameProvider for TestPatternCamera {
    type Stream = SlotStream;

    fn is_available(&self) -> bool {
        !matches!(self.denial, Some(AcquisitionError::DeviceNotAvailable))
    }

    fn acquire(&self, config: &ScannerConfig) -> Result<SlotStream, AcquisitionError> {
        if let Some(ref err) = self.denial {
            return Err(err.clone());
        }

        let (width, height) = config.resolution.unwrap_or((self.width, self.height));
        let interval = Duration::from_secs_f64(1.0 / self.fps as f64);

        SlotStream::spawn("test-pattern-capture", move |running, slot| {
            let mut n: u64 = 0;
            while running.load(Ordering::SeqCst) {
                slot.store(Self::render(width, height, n));
                n = n.wrapping_add(1);
                thread::sleep(interval);
            }
        })
        .map_err(|e| AcquisitionError::Backend(format!("failed to spawn test pattern thread: {}", e)))
    }

    fn capture(&self, stream: &mut SlotStream) -> Result<Frame, CaptureError> {
        stream.latest()
    }

    fn release(&self, stream: &mut SlotStream) {
        stream.stop();
    }

    fn device_info(&self) -> CameraDevice {
        CameraDevice {
            id: "test-pattern".into(),
            name: "Test Pattern".into(),
            facing: Some(FacingMode::User),
            is_default: true,
        }
    }
}
