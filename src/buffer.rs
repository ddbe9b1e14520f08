//! Owned RGBA pixel data handed from the decoder to the analyzer.

use image::RgbaImage;

use crate::error::Error;

/// A decoded image: dimensions plus row-major RGBA8 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the image has no pixels or
    /// `pixels.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, Error> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| Error::InvalidInput(format!("{width}x{height} overflows")))?;
        if expected == 0 {
            return Err(Error::InvalidInput(format!("{width}x{height} has no pixels")));
        }
        if pixels.len() != expected {
            return Err(Error::InvalidInput(format!(
                "{width}x{height} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Borrow the RGBA bytes (read-only).
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.pixels
    }
}

impl TryFrom<RgbaImage> for PixelBuffer {
    type Error = Error;

    fn try_from(img: RgbaImage) -> Result<Self, Self::Error> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_must_match_dimensions() {
        assert!(PixelBuffer::new(2, 1, vec![0; 8]).is_ok());
        assert!(matches!(
            PixelBuffer::new(2, 2, vec![0; 8]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            PixelBuffer::new(0, 5, Vec::new()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn converts_from_rgba_image() {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 4]));
        let buf = PixelBuffer::try_from(img).unwrap();
        assert_eq!((buf.width(), buf.height()), (3, 2));
        assert_eq!(&buf.as_slice()[..4], &[1, 2, 3, 4]);
    }
}
