#![deny(unsafe_code)]

//! Darkening overlays for text on background images.
//!
//! An image is decoded to RGBA, its channels are averaged, the average is
//! reduced to a weighted luminosity in `[0, 1]`, and that luminosity divided by
//! a darkness coefficient becomes the opacity of a gradient painted over the
//! image.

pub mod buffer;
pub mod config;
pub mod error;
pub mod loader;
pub mod scan;
pub mod processing {
    pub mod luminosity;
    pub mod overlay;
}
pub mod tasks {
    pub mod analyze;
}

pub use error::Error;
pub use processing::luminosity::{
    Analysis, AverageColor, LuminosityAnalyzer, average_color, luminosity, overlay_opacity,
};
