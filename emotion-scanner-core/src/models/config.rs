use serde::{Deserialize, Serialize};

use super::device::FacingMode;

/// Default message shown when the camera cannot be opened.
pub const DEFAULT_ACQUISITION_MESSAGE: &str =
    "Unable to access camera. Please grant camera permissions.";

/// Configuration for a scanner lifecycle. Missing fields deserialize to
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Preferred camera facing (default: user-facing).
    pub facing_mode: FacingMode,

    /// Specific camera index, or None to pick by facing mode.
    pub device_index: Option<u32>,

    /// Requested capture resolution as (width, height), or None for the
    /// device's native format.
    pub resolution: Option<(u32, u32)>,

    /// Message published in the `Error` state after a failed acquisition.
    pub acquisition_error_message: String,
}

impl ScannerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let Some((width, height)) = self.resolution {
            if width == 0 || height == 0 {
                return Err(format!("invalid resolution: {}x{}", width, height));
            }
        }
        if self.acquisition_error_message.trim().is_empty() {
            return Err("acquisition error message must not be empty".into());
        }
        Ok(())
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::User,
            device_index: None,
            resolution: None,
            acquisition_error_message: DEFAULT_ACQUISITION_MESSAGE.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(ScannerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_resolution() {
        let config = ScannerConfig {
            resolution: Some((640, 0)),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_document_fills_defaults() {
        let config: ScannerConfig =
            serde_json::from_str(r#"{"facing_mode": "environment", "resolution": [640, 480]}"#)
                .unwrap();
        assert_eq!(config.facing_mode, FacingMode::Environment);
        assert_eq!(config.resolution, Some((640, 480)));
        assert_eq!(config.device_index, None);
        assert_eq!(config.acquisition_error_message, DEFAULT_ACQUISITION_MESSAGE);
    }

    #[test]
    fn rejects_blank_message() {
        let config = ScannerConfig {
            acquisition_error_message: "   ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
