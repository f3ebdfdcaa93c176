use crate::models::config::ScannerConfig;
use crate::models::device::CameraDevice;
use crate::models::error::{AcquisitionError, CaptureError};
use crate::models::frame::Frame;

/// Interface for platform-specific camera sources.
///
/// Implemented by:
/// - `NokhwaCamera` (native webcams, `native` feature)
/// - `TestPatternCamera` (synthetic frames)
///
/// Providers are shared across threads: `acquire` runs on a worker thread
/// while `capture` and `release` run on the host's thread.
pub trait FrameProvider: Send + Sync + 'static {
    /// Open device handle. Owned by a `CaptureSession`.
    type Stream: Send + 'static;

    /// Whether a camera is present at all.
    fn is_available(&self) -> bool;

    /// Open a video stream, preferring `config.facing_mode`.
    ///
    /// May block on the permission prompt and device handshake.
    fn acquire(&self, config: &ScannerConfig) -> Result<Self::Stream, AcquisitionError>;

    /// Return the most recent image at native resolution.
    ///
    /// Must not block waiting for a new image.
    fn capture(&self, stream: &mut Self::Stream) -> Result<Frame, CaptureError>;

    /// Stop every underlying track. Safe to call more than once.
    fn release(&self, stream: &mut Self::Stream);

    /// Information about the camera backing this provider.
    fn device_info(&self) -> CameraDevice;
}
