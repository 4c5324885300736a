//! Error types for pdf2word library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdf2word operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while enriching or replaying a layout.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed layout or span-dump JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A top-level input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputMissing(PathBuf),

    /// Error writing the output package.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Page geometry could not be applied.
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// An image asset could not be read or is in an unsupported format.
    #[error("Image error: {0}")]
    Image(String),

    /// A referenced asset is not present on disk.
    #[error("Asset not found: {}", .0.display())]
    Asset(PathBuf),

    /// An element could not be inserted into the output document.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Archive(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}
