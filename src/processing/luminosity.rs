//! Average color, weighted luma and overlay opacity for RGBA pixel data.
//!
//! Everything here is a pure function of its arguments: no logging, no shared
//! state, so images may be analyzed from any number of threads at once.

use serde::Serialize;

use crate::error::Error;

/// Overlay darkness used when nothing else is configured.
pub const DEFAULT_DARKNESS_COEFFICIENT: f64 = 1.85;

/// Bytes per RGBA pixel.
const CHANNELS: usize = 4;

/// Floored per-channel mean of an RGBA buffer. Alpha never contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AverageColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Everything derived from one buffer with one coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Analysis {
    pub average: AverageColor,
    pub luminosity: f64,
    pub overlay_opacity: f64,
}

/// Average the R, G and B channels of a row-major RGBA buffer.
///
/// Each channel average is `floor(sum / (len / 4))`, i.e. the channel sum over
/// the pixel count.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if `pixels` is empty or its length is not a
/// multiple of 4.
pub fn average_color(pixels: &[u8]) -> Result<AverageColor, Error> {
    if pixels.is_empty() {
        return Err(Error::InvalidInput("buffer is empty".into()));
    }
    if pixels.len() % CHANNELS != 0 {
        return Err(Error::InvalidInput(format!(
            "length {} is not a multiple of {CHANNELS}",
            pixels.len()
        )));
    }

    let mut sums = [0u64; 3];
    for px in pixels.chunks_exact(CHANNELS) {
        sums[0] += u64::from(px[0]);
        sums[1] += u64::from(px[1]);
        sums[2] += u64::from(px[2]);
    }

    let count = (pixels.len() / CHANNELS) as u64;
    // a mean of u8 samples never exceeds 255
    let channel = |sum: u64| (sum / count) as u8;
    Ok(AverageColor {
        r: channel(sums[0]),
        g: channel(sums[1]),
        b: channel(sums[2]),
    })
}

/// Normalized luma of `color` with weights 2:3:1 (R:G:B) over 6.
///
/// Always in `[0, 1]`. White maps to exactly `1.0`, black to exactly `0.0`.
#[must_use]
pub fn luminosity(color: AverageColor) -> f64 {
    let weighted =
        f64::from(color.r) * 2.0 + f64::from(color.g) * 3.0 + f64::from(color.b);
    (weighted / 6.0) / 255.0
}

/// Opacity of the darkening overlay for an image of the given `luminosity`.
///
/// Not clamped. A coefficient at or below 1, or a bright image with a low
/// coefficient, yields values above 1; presentation code treats those as fully
/// opaque.
#[must_use]
pub fn overlay_opacity(luminosity: f64, coefficient: f64) -> f64 {
    luminosity / coefficient
}

/// Runs the three steps above with a fixed darkness coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuminosityAnalyzer {
    coefficient: f64,
}

impl Default for LuminosityAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_DARKNESS_COEFFICIENT)
    }
}

impl LuminosityAnalyzer {
    /// The coefficient is taken as given; `(1, 4)` keeps opacity within `[0, 1]`.
    #[must_use]
    pub const fn new(coefficient: f64) -> Self {
        Self { coefficient }
    }

    #[must_use]
    pub const fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// # Errors
    /// Propagates [`Error::InvalidInput`] from [`average_color`].
    pub fn analyze(&self, pixels: &[u8]) -> Result<Analysis, Error> {
        let average = average_color(pixels)?;
        let luminosity = luminosity(average);
        Ok(Analysis {
            average,
            luminosity,
            overlay_opacity: overlay_opacity(luminosity, self.coefficient),
        })
    }
}
