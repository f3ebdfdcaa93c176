use crate::models::frame::Frame;
use crate::models::signal::SignalVector;

/// Pure-math brightness statistics over a frame.
///
/// Every pixel is visited exactly twice: once for the mean, once for the
/// deviation around it. No subsampling.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalExtractor;

impl SignalExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Compute `(brightness, dispersion)` for `frame`.
    ///
    /// A frame with no pixels yields `(0.0, 0.0)`.
    pub fn extract(&self, frame: &Frame) -> SignalVector {
        let count = frame.pixel_count();
        if count == 0 {
            return SignalVector::default();
        }
        let n = count as f64;

        let brightness = frame.pixels().map(pixel_average).sum::<f64>() / n;

        let sum_sq: f64 = frame
            .pixels()
            .map(|px| {
                let diff = pixel_average(px) - brightness;
                diff * diff
            })
            .sum();
        let dispersion = (sum_sq / n).sqrt();

        SignalVector {
            brightness,
            dispersion,
        }
    }
}

/// Mean of the three channel intensities.
pub fn pixel_average(px: [u8; 3]) -> f64 {
    (px[0] as f64 + px[1] as f64 + px[2] as f64) / 3.0
}
