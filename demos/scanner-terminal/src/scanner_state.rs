use std::sync::Arc;

use serde::Serialize;

use emotion_scanner_core::{
    CameraDevice, ClassificationResult, Label, LifecycleState, ScanDelegate, ScanSnapshot,
    ScannerError,
};

/// ScanDelegate that writes events to stdout as JSON lines.
pub struct TerminalDelegate {
    verbose_results: bool,
}

impl TerminalDelegate {
    pub fn new(verbose_results: bool) -> Arc<Self> {
        Arc::new(Self { verbose_results })
    }
}

// -- Event payloads --

#[derive(Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TerminalEvent<'a> {
    StateChanged {
        state: &'a str,
    },
    Result {
        label: Label,
        confidence: u8,
    },
    Error {
        message: String,
    },
    Snapshot {
        #[serde(flatten)]
        snapshot: &'a ScanSnapshot,
    },
    Devices {
        devices: Vec<DeviceInfo>,
    },
    Labels {
        labels: &'a [Label],
    },
}

pub fn emit(event: &TerminalEvent<'_>) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{}", line),
        Err(e) => log::error!("Failed to serialize event: {}", e),
    }
}

impl ScanDelegate for TerminalDelegate {
    fn on_state_changed(&self, state: &LifecycleState) {
        emit(&TerminalEvent::StateChanged { state: state.name() });
    }

    fn on_result(&self, result: &ClassificationResult) {
        if self.verbose_results {
            emit(&TerminalEvent::Result {
                label: result.label,
                confidence: result.confidence,
            });
        }
    }

    fn on_error(&self, error: &ScannerError) {
        emit(&TerminalEvent::Error {
            message: error.to_string(),
        });
    }
}

// -- Helper to convert CameraDevice to a serializable type --

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

impl From<CameraDevice> for DeviceInfo {
    fn from(device: CameraDevice) -> Self {
        Self {
            id: device.id,
            name: device.name,
            is_default: device.is_default,
        }
    }
}
