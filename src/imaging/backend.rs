//! Image processing backend trait and shared error type.
//!
//! The [`ImageBackend`] trait defines the two operations the rest of the
//! crate needs: identify a source image, and run one conversion command line.
//!
//! The production implementation is
//! [`MagickBackend`](super::magick_backend::MagickBackend): header reads with
//! the `image` crate, conversions through ImageMagick's `convert`.

use super::calculations::Dimensions;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
///
/// `Sync` so candidates can be generated from a rayon pool.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Execute one command line (program followed by its arguments).
    fn run(&self, argv: &[String]) -> Result<(), BackendError>;
}
