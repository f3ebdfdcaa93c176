use serde::{Deserialize, Serialize};

/// Coarse statistics of one frame's per-pixel brightness.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalVector {
    /// Mean per-pixel channel average, 0.0–255.0.
    pub brightness: f64,
    /// Population standard deviation of the same average, >= 0.
    pub dispersion: f64,
}

impl SignalVector {
    pub fn new(brightness: f64, dispersion: f64) -> Self {
        Self {
            brightness,
            dispersion,
        }
    }
}
