//! # emotion-scanner-camera
//!
//! Camera backends for emotion-scanner.
//!
//! Provides:
//! - `TestPatternCamera`: synthetic moving gradient, no hardware needed
//! - `NokhwaCamera`: native webcam via nokhwa (`native` feature)
//! - `CameraEnumerator`: camera listing via nokhwa (`native` feature)
//! - `permissions`: camera consent prompt (macOS, `native` feature)
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use emotion_scanner_camera::NokhwaCamera;
//! use emotion_scanner_core::{CaptureLifecycle, ScannerConfig};
//!
//! let camera = Arc::new(NokhwaCamera::default_device());
//! let mut scanner = CaptureLifecycle::new(camera, ScannerConfig::default())?;
//! scanner.start()?;
//! ```

pub mod permissions;
pub mod selection;
pub mod slot_stream;
pub mod test_pattern;

#[cfg(feature = "native")]
pub mod device_enumerator;
#[cfg(feature = "native")]
pub mod nokhwa_camera;

#[cfg(feature = "native")]
pub use device_enumerator::CameraEnumerator;
#[cfg(feature = "native")]
pub use nokhwa_camera::NokhwaCamera;
pub use slot_stream::{FrameSlot, SlotStream};
pub use test_pattern::TestPatternCamera;
