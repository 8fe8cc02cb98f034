//! Command templates and variant file naming.
//!
//! Conversion recipes are written as plain ImageMagick command lines with
//! `{name}` placeholders:
//!
//! ```text
//! convert -strip -resize {w}x{h} -colors {q} {src_img} {resized_img}
//! ```
//!
//! The line is split on whitespace *before* substitution, so a value
//! containing spaces (a path, say) stays one argument.

use super::backend::{BackendError, ImageBackend};
use super::calculations::Dimensions;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<Dimensions> {
    backend.identify(path)
}

/// Placeholder values for a command template.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars(BTreeMap<String, String>);

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable.
    pub fn set(mut self, name: &str, value: impl Display) -> Self {
        self.0.insert(format!("{{{name}}}"), value.to_string());
        self
    }

    /// Add the `w`, `h` pair for a target size.
    pub fn with_size(self, size: Dimensions) -> Self {
        self.set("w", size.width).set("h", size.height)
    }
}

/// Split `template` on whitespace and substitute placeholders in each token.
///
/// Unknown placeholders are left in place.
///
/// # Examples
/// ```
/// # use media_squeeze::imaging::{TemplateVars, render_command};
/// let vars = TemplateVars::new().set("q", 80).set("src_img", "my photo.png");
/// let argv = render_command("convert -quality {q} {src_img}", &vars);
/// assert_eq!(argv, ["convert", "-quality", "80", "my photo.png"]);
/// ```
pub fn render_command(template: &str, vars: &TemplateVars) -> Vec<String> {
    template
        .split_whitespace()
        .map(|token| {
            vars.0
                .iter()
                .fold(token.to_string(), |acc, (key, value)| acc.replace(key, value))
        })
        .collect()
}

/// Suffix WordPress appends to a resized variant: `-{w}x{h}.{ext}`.
pub fn name_decoration(size: Dimensions, ext: &str) -> String {
    format!("-{}x{}.{}", size.width, size.height, ext)
}

/// File name of a resized variant: `{stem}-{w}x{h}.{ext}`.
pub fn resized_file_name(stem: &str, size: Dimensions, ext: &str) -> String {
    format!("{}{}", stem, name_decoration(size, ext))
}
