//! Camera enumeration via nokhwa's native backend.

use nokhwa::utils::{ApiBackend, CameraIndex, CameraInfo};

use emotion_scanner_core::models::device::CameraDevice;
use emotion_scanner_core::models::error::AcquisitionError;

use crate::selection::guess_facing;

/// Lists cameras known to the platform capture API.
pub struct CameraEnumerator;

impl CameraEnumerator {
    pub fn new() -> Self {
        Self
    }

    /// Active cameras. The first one reported is treated as the default.
    pub fn list_cameras(&self) -> Result<Vec<CameraDevice>, AcquisitionError> {
        let infos = nokhwa::query(ApiBackend::Auto)
            .map_err(|e| AcquisitionError::Backend(format!("camera query failed: {}", e)))?;

        Ok(infos
            .iter()
            .enumerate()
            .map(|(i, info)| camera_device(info, i == 0))
            .collect())
    }
}

impl Default for CameraEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable string id for a camera index.
pub fn index_id(index: &CameraIndex) -> String {
    match index {
        CameraIndex::Index(i) => i.to_string(),
        CameraIndex::String(s) => s.clone(),
    }
}

/// Parse an id produced by `index_id` back into a camera index.
pub fn parse_index(id: &str) -> CameraIndex {
    match id.parse::<u32>() {
        Ok(i) => CameraIndex::Index(i),
        Err(_) => CameraIndex::String(id.to_string()),
    }
}

fn camera_device(info: &CameraInfo, is_default: bool) -> CameraDevice {
    let name = info.human_name();
    CameraDevice {
        id: index_id(info.index()),
        facing: guess_facing(&name),
        name,
        is_default,
    }
}
