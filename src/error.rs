//! Error types for the card-unmatte crate.

use std::path::PathBuf;

/// Errors that can occur while loading, converting, or saving card images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input file could not be opened.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path of the input file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The input file could not be parsed as an image.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        /// Path of the input file.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },

    /// The output image could not be encoded or written.
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        /// Path of the output file.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },

    /// An I/O error occurred while preparing output files or directories.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
