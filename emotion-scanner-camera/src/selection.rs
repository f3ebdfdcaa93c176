//! Camera choice from a device list and a `ScannerConfig`.

use emotion_scanner_core::models::config::ScannerConfig;
use emotion_scanner_core::models::device::{CameraDevice, FacingMode};

/// Guess which way a camera points from its human-readable name.
///
/// Built-in laptop and desk webcams face the user; names mentioning the back
/// or rear face the environment.
pub fn guess_facing(name: &str) -> Option<FacingMode> {
    let lower = name.to_lowercase();
    if ["back", "rear", "environment", "world"]
        .iter()
        .any(|hint| lower.contains(hint))
    {
        return Some(FacingMode::Environment);
    }
    if ["front", "user", "facetime", "integrated", "built-in", "webcam"]
        .iter()
        .any(|hint| lower.contains(hint))
    {
        return Some(FacingMode::User);
    }
    None
}

/// Pick the device to open.
///
/// An explicit `device_index` wins when present in the list. Otherwise the
/// first device facing `config.facing_mode`, then the default device, then
/// the first one.
pub fn select_device<'a>(devices: &'a [CameraDevice], config: &ScannerConfig) -> Option<&'a CameraDevice> {
    if let Some(index) = config.device_index {
        let id = index.to_string();
        if let Some(device) = devices.iter().find(|d| d.id == id) {
            return Some(device);
        }
        log::warn!("Camera index {} not found, falling back to facing mode", index);
    }
    devices
        .iter()
        .find(|d| d.facing == Some(config.facing_mode))
        .or_else(|| devices.iter().find(|d| d.is_default))
        .or_else(|| devices.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, name: &str, is_default: bool) -> CameraDevice {
        CameraDevice {
            id: id.into(),
            name: name.into(),
            facing: guess_facing(name),
            is_default,
        }
    }

    #[test]
    fn guesses_common_names() {
        assert_eq!(guess_facing("FaceTime HD Camera"), Some(FacingMode::User));
        assert_eq!(guess_facing("Integrated Webcam"), Some(FacingMode::User));
        assert_eq!(guess_facing("Rear Camera"), Some(FacingMode::Environment));
        assert_eq!(guess_facing("USB2.0 PC CAMERA"), None);
    }

    #[test]
    fn prefers_user_facing() {
        let devices = vec![
            device("0", "Back Camera", true),
            device("1", "Front Camera", false),
        ];
        let chosen = select_device(&devices, &ScannerConfig::default()).unwrap();
        assert_eq!(chosen.id, "1");
    }

    #[test]
    fn explicit_index_wins() {
        let devices = vec![
            device("0", "Front Camera", true),
            device("1", "USB Capture", false),
        ];
        let config = ScannerConfig {
            device_index: Some(1),
            ..Default::default()
        };
        assert_eq!(select_device(&devices, &config).unwrap().id, "1");
    }

    #[test]
    fn missing_index_falls_back() {
        let devices = vec![device("0", "USB Capture", false), device("1", "Capture", true)];
        let config = ScannerConfig {
            device_index: Some(7),
            ..Default::default()
        };
        assert_eq!(select_device(&devices, &config).unwrap().id, "1");
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert!(select_device(&[], &ScannerConfig::default()).is_none());
    }
}
