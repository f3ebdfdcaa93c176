//! # emotion-scanner-core
//!
//! Platform-agnostic core of the emotion scanner.
//!
//! Samples frames from a camera, reduces each one to a brightness signal,
//! maps the signal to a placeholder emotion label with a confidence, and
//! publishes the result for a presentation layer. Platform backends implement
//! the `FrameProvider` trait and plug into the generic `CaptureLifecycle`.
//!
//! ## Architecture
//!
//! ```text
//! emotion-scanner-core (this crate)
//! ├── traits/       ← FrameProvider, ScanDelegate
//! ├── models/       ← Frame, SignalVector, Label, LifecycleState, ScannerError, etc.
//! ├── processing/   ← SignalExtractor, Classifier
//! └── session/      ← CaptureSession, CaptureLifecycle, ScanMonitor
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::classification::ClassificationResult;
pub use models::config::ScannerConfig;
pub use models::device::{CameraDevice, FacingMode};
pub use models::error::{AcquisitionError, CaptureError, ScannerError};
pub use models::frame::Frame;
pub use models::label::Label;
pub use models::signal::SignalVector;
pub use models::snapshot::{ScanDiagnostics, ScanSnapshot};
pub use models::state::LifecycleState;
pub use processing::classifier::Classifier;
pub use processing::signal_extractor::SignalExtractor;
pub use session::capture_session::CaptureSession;
pub use session::lifecycle::CaptureLifecycle;
pub use session::monitor::ScanMonitor;
pub use traits::frame_provider::FrameProvider;
pub use traits::scan_delegate::ScanDelegate;
