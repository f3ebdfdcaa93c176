use crate::models::classification::ClassificationResult;
use crate::models::error::ScannerError;
use crate::models::state::LifecycleState;

/// Event delegate for scanner notifications.
///
/// Called on the host thread that drives `CaptureLifecycle`. Implementations
/// that feed a UI on another thread should forward the event.
pub trait ScanDelegate: Send + Sync {
    /// Called when the lifecycle state changes.
    fn on_state_changed(&self, state: &LifecycleState);

    /// Called once per tick with the freshly published result.
    fn on_result(&self, result: &ClassificationResult);

    /// Called when acquisition fails or the device is lost.
    fn on_error(&self, error: &ScannerError);
}
