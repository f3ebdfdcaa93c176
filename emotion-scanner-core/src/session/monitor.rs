use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::classification::ClassificationResult;
use crate::models::snapshot::ScanSnapshot;

/// Cloneable read-only view of the published scanner output.
///
/// The lifecycle is the only writer. Readers get a whole snapshot at once.
#[derive(Clone, Default)]
pub struct ScanMonitor {
    published: Arc<Mutex<ScanSnapshot>>,
}

impl ScanMonitor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        self.published.lock().clone()
    }

    pub fn is_scanning(&self) -> bool {
        self.published.lock().is_scanning
    }

    pub fn current_result(&self) -> Option<ClassificationResult> {
        self.published.lock().result()
    }

    pub(crate) fn publish(&self, snapshot: ScanSnapshot) {
        *self.published.lock() = snapshot;
    }

    pub(crate) fn publish_result(&self, result: ClassificationResult) {
        let mut s = self.published.lock();
        s.label = Some(result.label);
        s.confidence = result.confidence;
    }
}
