use serde::{Deserialize, Serialize};

use super::label::Label;

/// Latest label and confidence. Published once per tick; only the most
/// recent value is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Label,
    /// Integer percentage, 0–100.
    pub confidence: u8,
}
