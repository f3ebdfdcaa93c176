use thiserror::Error;

/// Failures while opening the camera stream.
///
/// Surfaced to the user as a persistent message. Never retried
/// automatically; the host recovers by calling `start` again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no camera device available")]
    DeviceNotAvailable,

    #[error("camera device busy")]
    DeviceBusy,

    #[error("camera backend error: {0}")]
    Backend(String),
}

/// Per-frame failures reported by a `FrameProvider`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// No image has been decoded yet. The tick is skipped, the loop continues.
    #[error("frame not available yet")]
    FrameUnavailable,

    /// The device went away mid-stream. Stops the tick loop.
    #[error("device lost: {0}")]
    DeviceLost(String),
}

/// Umbrella error for fallible scanner operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScannerError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    #[error("configuration failed: {0}")]
    Configuration(String),
}
