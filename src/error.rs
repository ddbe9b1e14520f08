use thiserror::Error;

/// Library error type for luminosity analysis and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// A pixel buffer was empty or not a whole number of RGBA pixels.
    #[error("invalid pixel buffer: {0}")]
    InvalidInput(String),

    /// One or more input paths are missing or unreadable.
    #[error("invalid input path: {0}")]
    BadPath(String),

    /// The scan completed but found no images.
    #[error("no images found in the given inputs")]
    EmptyScan,

    /// The image could not be decoded.
    #[error(transparent)]
    Decode(#[from] image::ImageError),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}
