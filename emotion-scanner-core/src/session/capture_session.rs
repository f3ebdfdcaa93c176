use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::config::ScannerConfig;
use crate::models::device::CameraDevice;
use crate::models::error::{AcquisitionError, CaptureError};
use crate::models::frame::Frame;
use crate::traits::frame_provider::FrameProvider;

/// An open camera stream.
///
/// Releases the device when dropped, so every exit path (stop, teardown,
/// a cancelled acquisition whose result is discarded) stops the tracks.
pub struct CaptureSession<P: FrameProvider> {
    id: Uuid,
    acquired_at: DateTime<Utc>,
    device: CameraDevice,
    provider: Arc<P>,
    stream: P::Stream,
    released: bool,
}

impl<P: FrameProvider> CaptureSession<P> {
    /// Acquire a stream from `provider`. Blocks until the device answers.
    pub fn open(provider: Arc<P>, config: &ScannerConfig) -> Result<Self, AcquisitionError> {
        let stream = provider.acquire(config)?;
        let device = provider.device_info();
        Ok(Self {
            id: Uuid::new_v4(),
            acquired_at: Utc::now(),
            device,
            provider,
            stream,
            released: false,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    pub fn device(&self) -> &CameraDevice {
        &self.device
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Latest frame from the stream.
    pub fn capture(&mut self) -> Result<Frame, CaptureError> {
        if self.released {
            return Err(CaptureError::DeviceLost("session already released".into()));
        }
        self.provider.capture(&mut self.stream)
    }

    /// Stop the stream. Returns `true` only for the call that released it.
    pub fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.provider.release(&mut self.stream);
        self.released = true;
        log::debug!("Released capture session {} on {}", self.id, self.device.name);
        true
    }
}

impl<P: FrameProvider> Drop for CaptureSession<P> {
    fn drop(&mut self) {
        self.release();
    }
}
