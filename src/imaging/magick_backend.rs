//! Production backend.
//!
//! | Operation | How |
//! |---|---|
//! | Identify | `image::image_dimensions` (header read, no decode) |
//! | Convert | ImageMagick `convert`, one process per command line |
//!
//! The conversion recipes lean on ImageMagick features with no pure-Rust
//! equivalent in the `image` crate (`-colors` quantisation, lossy WebP with
//! `webp:method=6`, progressive JPEG), so conversions shell out.

use super::backend::{BackendError, ImageBackend};
use super::calculations::Dimensions;
use std::path::Path;
use std::process::{Command, Stdio};

/// Source extensions the explorer accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

pub struct MagickBackend;

impl MagickBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MagickBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for MagickBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to identify {}: {}", path.display(), e))
        })?;
        Ok(Dimensions::new(width, height))
    }

    fn run(&self, argv: &[String]) -> Result<(), BackendError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| BackendError::ProcessingFailed("empty command line".into()))?;

        tracing::debug!(command = %argv.join(" "), "running");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(BackendError::CommandFailed {
                program: program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
