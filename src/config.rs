use std::path::Path;

use anyhow::{Result, ensure};
use serde::Deserialize;
use tracing::warn;

use crate::error::Error;
use crate::processing::luminosity::{DEFAULT_DARKNESS_COEFFICIENT, LuminosityAnalyzer};
use crate::processing::overlay::DEFAULT_OVERLAY_COLOR;
use crate::scan::ScanOptions;

/// Coefficients inside this open interval keep overlay opacity within `[0, 1]`
/// without washing it out.
pub const SENSIBLE_COEFFICIENT_RANGE: (f64, f64) = (1.0, 4.0);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Divides luminosity to get overlay opacity.
    pub darkness_coefficient: f64,
    /// RGB of the darkening gradient.
    pub overlay_color: [u8; 3],
    /// Maximum number of images decoded and analyzed at once.
    pub max_concurrent_decodes: usize,
    /// Recurse into subdirectories of directory inputs.
    pub recursive: bool,
    /// Deepest directory level visited when recursing; `None` or `0` is unlimited.
    pub max_depth: Option<usize>,
    /// Rotate decoded images per their EXIF orientation before sampling.
    pub apply_exif_orientation: bool,
    /// Include the luminosity/opacity caption in reports.
    pub debug_caption: bool,
}

impl Configuration {
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is not a valid configuration document.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            self.darkness_coefficient.is_finite() && self.darkness_coefficient > 0.0,
            "darkness-coefficient must be a positive number"
        );
        ensure!(
            self.max_concurrent_decodes > 0,
            "max-concurrent-decodes must be greater than zero"
        );
        let (lo, hi) = SENSIBLE_COEFFICIENT_RANGE;
        if self.darkness_coefficient <= lo || self.darkness_coefficient >= hi {
            warn!(
                coefficient = self.darkness_coefficient,
                "darkness-coefficient outside ({lo}, {hi}); overlay opacity may leave [0, 1]"
            );
        }
        Ok(self)
    }

    #[must_use]
    pub const fn analyzer(&self) -> LuminosityAnalyzer {
        LuminosityAnalyzer::new(self.darkness_coefficient)
    }

    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            recursive: self.recursive,
            max_depth: self.max_depth,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            darkness_coefficient: DEFAULT_DARKNESS_COEFFICIENT,
            overlay_color: DEFAULT_OVERLAY_COLOR,
            max_concurrent_decodes: 4,
            recursive: true,
            max_depth: None,
            apply_exif_orientation: true,
            debug_caption: false,
        }
    }
}
