//! Image decoding: file on disk to an RGBA [`PixelBuffer`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::RgbaImage;
use image::imageops;
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::error::Error;

/// Decode `path` to RGBA8, optionally rotating per its EXIF orientation so the
/// sampled pixels match what a browser would paint.
///
/// # Errors
/// Returns [`Error::Io`] or [`Error::Decode`] if the file cannot be read or
/// decoded, and [`Error::InvalidInput`] for images with no pixels.
pub fn load_pixels(path: &Path, apply_exif: bool) -> Result<PixelBuffer, Error> {
    let img = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?
        .to_rgba8();

    let img = if apply_exif {
        orient(img, read_orientation(path).unwrap_or(1))
    } else {
        img
    };
    debug!(path = %path.display(), width = img.width(), height = img.height(), "decoded");
    PixelBuffer::try_from(img)
}

// Unsupported orientation values fall through unchanged.
fn orient(img: RgbaImage, orientation: u16) -> RgbaImage {
    match orientation {
        2 => imageops::flip_horizontal(&img),
        3 => imageops::rotate180(&img),
        4 => imageops::flip_vertical(&img),
        5 => imageops::flip_horizontal(&imageops::rotate90(&img)),
        6 => imageops::rotate90(&img),
        7 => imageops::flip_horizontal(&imageops::rotate270(&img)),
        8 => imageops::rotate270(&img),
        _ => img,
    }
}

// Tags wider than u16 are corrupt and read as absent.
fn orientation_tag(raw: u32) -> Option<u16> {
    u16::try_from(raw).ok()
}

fn read_orientation(path: &Path) -> Option<u16> {
    let file = File::open(path).ok()?;
    let mut buf = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut buf).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    let o = orientation_tag(field.value.get_uint(0)?)?;
    debug!(path = %path.display(), orientation = o, "exif orientation");
    Some(o)
}
