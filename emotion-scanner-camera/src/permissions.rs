//! Camera permission check.
//!
//! On macOS, AVFoundation needs explicit user consent before any device can be
//! opened; the first request shows the system prompt and blocks until the
//! user answers. Other platforms gate access when the device is opened, so the
//! check passes and a denial surfaces from `Camera::new` instead.

use emotion_scanner_core::models::error::AcquisitionError;

#[cfg(all(feature = "native", target_os = "macos"))]
const PROMPT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// Ask for camera access, waiting for the user's answer.
#[cfg(all(feature = "native", target_os = "macos"))]
pub fn request_camera_permission() -> Result<(), AcquisitionError> {
    use std::sync::mpsc;

    use parking_lot::Mutex;

    if nokhwa::nokhwa_check() {
        return Ok(());
    }

    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    nokhwa::nokhwa_initialize(move |granted| {
        let _ = tx.lock().send(granted);
    });

    match rx.recv_timeout(PROMPT_TIMEOUT) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AcquisitionError::PermissionDenied),
        Err(_) => {
            log::warn!("Camera permission prompt did not complete");
            Err(AcquisitionError::PermissionDenied)
        }
    }
}

/// Ask for camera access, waiting for the user's answer.
#[cfg(not(all(feature = "native", target_os = "macos")))]
pub fn request_camera_permission() -> Result<(), AcquisitionError> {
    Ok(())
}

/// Classify a backend error message into an acquisition failure.
pub fn classify_open_error(detail: &str) -> AcquisitionError {
    let lower = detail.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized") {
        AcquisitionError::PermissionDenied
    } else if lower.contains("busy") || lower.contains("in use") {
        AcquisitionError::DeviceBusy
    } else if lower.contains("no such device") || lower.contains("not found") {
        AcquisitionError::DeviceNotAvailable
    } else {
        AcquisitionError::Backend(detail.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_permission_errors() {
        assert_eq!(
            classify_open_error("Could not open device: Permission denied (os error 13)"),
            AcquisitionError::PermissionDenied
        );
    }

    #[test]
    fn maps_busy_errors() {
        assert_eq!(
            classify_open_error("Device or resource busy"),
            AcquisitionError::DeviceBusy
        );
    }

    #[test]
    fn maps_missing_device() {
        assert_eq!(
            classify_open_error("No such device (os error 19)"),
            AcquisitionError::DeviceNotAvailable
        );
    }

    #[test]
    fn keeps_unknown_detail() {
        assert_eq!(
            classify_open_error("format negotiation failed"),
            AcquisitionError::Backend("format negotiation failed".into())
        );
    }

    #[cfg(not(all(feature = "native", target_os = "macos")))]
    #[test]
    fn permission_check_passes_without_prompt() {
        assert!(request_camera_permission().is_ok());
    }
}
