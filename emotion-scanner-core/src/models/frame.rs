use super::error::ScannerError;

/// One still image sampled from the live stream.
///
/// Pixels are packed RGB, row-major, 3 bytes per pixel. Frames are immutable
/// once built and live for a single classification cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl Frame {
    /// Wrap a packed RGB buffer.
    ///
    /// Fails if `rgb.len() != width * height * 3`. A zero width or height with
    /// an empty buffer is accepted: the device has not reported dimensions yet.
    pub fn from_rgb(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self, ScannerError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| ScannerError::InvalidFrame(format!("{}x{} overflows", width, height)))?;
        if rgb.len() != expected {
            return Err(ScannerError::InvalidFrame(format!(
                "{}x{} RGB frame needs {} bytes, got {}",
                width,
                height,
                expected,
                rgb.len()
            )));
        }
        Ok(Self { width, height, rgb })
    }

    /// Pack an RGBA buffer into RGB, dropping alpha.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, ScannerError> {
        if rgba.len() % 4 != 0 {
            return Err(ScannerError::InvalidFrame(format!(
                "RGBA buffer length {} is not a multiple of 4",
                rgba.len()
            )));
        }
        let rgb = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Self::from_rgb(width, height, rgb)
    }

    /// A frame where every pixel is the same colour.
    pub fn solid(width: u32, height: u32, color: [u8; 3]) -> Self {
        let count = width as usize * height as usize;
        let mut rgb = Vec::with_capacity(count * 3);
        for _ in 0..count {
            rgb.extend_from_slice(&color);
        }
        Self { width, height, rgb }
    }

    /// The degenerate 0×0 frame.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.rgb.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.rgb.is_empty()
    }

    /// Raw packed RGB bytes.
    pub fn as_rgb(&self) -> &[u8] {
        &self.rgb
    }

    /// Iterate pixels as `[r, g, b]`.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.rgb.chunks_exact(3).map(|px| [px[0], px[1], px[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_length() {
        let err = Frame::from_rgb(2, 2, vec![0; 11]).unwrap_err();
        assert!(matches!(err, ScannerError::InvalidFrame(_)));
    }

    #[test]
    fn accepts_zero_dimensions() {
        let frame = Frame::from_rgb(0, 480, Vec::new()).unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.pixel_count(), 0);
    }

    #[test]
    fn rgba_drops_alpha() {
        let frame = Frame::from_rgba(2, 1, &[1, 2, 3, 255, 4, 5, 6, 0]).unwrap();
        assert_eq!(frame.as_rgb(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(frame.pixels().collect::<Vec<_>>(), vec![[1, 2, 3], [4, 5, 6]]);
    }

    #[test]
    fn rgba_rejects_partial_pixel() {
        assert!(Frame::from_rgba(1, 1, &[1, 2, 3]).is_err());
    }

    #[test]
    fn solid_fills_every_pixel() {
        let frame = Frame::solid(3, 2, [10, 20, 30]);
        assert_eq!(frame.pixel_count(), 6);
        assert!(frame.pixels().all(|px| px == [10, 20, 30]));
    }
}
