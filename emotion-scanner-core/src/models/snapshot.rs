use serde::Serialize;

use super::classification::ClassificationResult;
use super::label::Label;
use super::state::LifecycleState;

/// Read-only projection of scanner state for the presentation layer.
///
/// Published as one unit so an observer never sees a label from one tick
/// with the confidence of another.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSnapshot {
    pub is_scanning: bool,
    pub label: Option<Label>,
    pub confidence: u8,
    pub error_message: Option<String>,
}

impl ScanSnapshot {
    /// Snapshot for a state with no published result.
    pub fn for_state(state: &LifecycleState) -> Self {
        Self {
            is_scanning: state.is_scanning(),
            label: None,
            confidence: 0,
            error_message: state.error_message().map(str::to_owned),
        }
    }

    pub fn result(&self) -> Option<ClassificationResult> {
        self.label.map(|label| ClassificationResult {
            label,
            confidence: self.confidence,
        })
    }
}

/// Counters for debugging a scanner session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanDiagnostics {
    pub ticks: u64,
    pub frames_skipped: u64,
    pub sessions_acquired: u64,
    pub sessions_released: u64,
    pub acquisitions_failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_projection() {
        let snapshot = ScanSnapshot {
            is_scanning: true,
            label: Some(Label::Happy),
            confidence: 82,
            error_message: None,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["isScanning"], true);
        assert_eq!(json["label"], "Happy");
        assert_eq!(json["confidence"], 82);
        assert!(json["errorMessage"].is_null());
    }

    #[test]
    fn error_state_carries_message() {
        let snapshot = ScanSnapshot::for_state(&LifecycleState::Error("denied".into()));
        assert!(!snapshot.is_scanning);
        assert_eq!(snapshot.error_message.as_deref(), Some("denied"));
        assert!(snapshot.result().is_none());
    }
}
