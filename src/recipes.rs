//! Conversion recipes: the permutations a source image is pushed through.
//!
//! Each recipe pairs an output format and level with a resize strategy and
//! the ImageMagick command templates that implement it:
//!
//! | Format | Level | Variants |
//! |---|---|---|
//! | PNG | palette size (`-colors`) | `inc_resize`, `aft_resize` |
//! | JPEG | `-quality` | `inc_resize` |
//! | WebP | `-quality` | `inc_resize` |
//!
//! With `fullsize_only` every format gets a single `no_resize` recipe per
//! level instead. PNG to PNG is lossless, so quantising after the resize
//! (`aft_resize`) recovers an efficient resize even from an already
//! quantised source.
//!
//! Template variables are described in [`crate::imaging::operations`].

use crate::config::{FormatsConfig, QualityConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpg,
    Webp,
}

impl OutputFormat {
    /// File extension, which is also the candidate directory prefix.
    pub fn ext(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Webp => "webp",
        }
    }

    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ext())
    }
}

/// How resized variants are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeStrategy {
    /// Full-size image only.
    NoResize,
    /// Resize and compress in a single pass.
    IncResize,
    /// Resize losslessly to a temporary file, then compress.
    AftResize,
}

impl ResizeStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoResize => "no_resize",
            Self::IncResize => "inc_resize",
            Self::AftResize => "aft_resize",
        }
    }
}

const PNG_FULL: &str = "convert -strip -colors {q} {src_img} {dest_img}";
const PNG_INC: &str = "convert -strip -resize {w}x{h} -colors {q} {src_img} {resized_img}";
const PNG_AFT_RESIZE: &str = "convert -strip -resize {w}x{h} {src_img} {tmp_img}";
const PNG_AFT_QUANTISE: &str = "convert -strip -colors {q} {tmp_img} {resized_img}";

const JPG_FULL: &str =
    "convert -strip -interlace Plane -gaussian-blur 0.05 -quality {q} {src_img} {dest_img}";
const JPG_INC: &str = "convert -strip -resize {w}x{h} -interlace Plane -gaussian-blur 0.05 \
                       -quality {q} {src_img} {resized_img}";

const WEBP_FULL: &str = "convert -strip -define webp:method=6 -quality {q} {src_img} {dest_img}";
const WEBP_INC: &str = "convert -strip -resize {w}x{h} -define webp:method=6 -quality {q} \
                        {src_img} {resized_img}";

/// One compression profile to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub format: OutputFormat,
    /// Palette size for PNG, quality for JPEG/WebP.
    pub level: u32,
    pub strategy: ResizeStrategy,
    /// Produces the full-size image.
    pub unscaled: &'static str,
    /// Run in order for every derived size.
    pub scaling: Vec<&'static str>,
}

impl Recipe {
    fn new(format: OutputFormat, level: u32, strategy: ResizeStrategy) -> Self {
        use OutputFormat::*;
        use ResizeStrategy::*;

        let (unscaled, scaling) = match (format, strategy) {
            (_, NoResize) => (full_template(format), vec![]),
            (Png, IncResize) => (PNG_FULL, vec![PNG_INC]),
            (Png, AftResize) => (PNG_FULL, vec![PNG_AFT_RESIZE, PNG_AFT_QUANTISE]),
            (Jpg, _) => (JPG_FULL, vec![JPG_INC]),
            (Webp, _) => (WEBP_FULL, vec![WEBP_INC]),
        };
        Self {
            format,
            level,
            strategy,
            unscaled,
            scaling,
        }
    }

    /// Candidate directory name, e.g. `webp_q70_inc_resize`.
    ///
    /// The format extension always comes first, up to the first underscore.
    pub fn dir_name(&self) -> String {
        format!(
            "{}_q{}_{}",
            self.format.ext(),
            self.level,
            self.strategy.as_str()
        )
    }
}

fn full_template(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Png => PNG_FULL,
        OutputFormat::Jpg => JPG_FULL,
        OutputFormat::Webp => WEBP_FULL,
    }
}

/// Expand the configured formats and levels into recipes.
pub fn build_recipes(formats: &FormatsConfig, quality: &QualityConfig) -> Vec<Recipe> {
    let mut recipes = Vec::new();
    for format in formats.enabled() {
        let strategies: &[ResizeStrategy] = match (formats.fullsize_only, format) {
            (true, _) => &[ResizeStrategy::NoResize],
            (false, OutputFormat::Png) => &[ResizeStrategy::IncResize, ResizeStrategy::AftResize],
            (false, _) => &[ResizeStrategy::IncResize],
        };
        for &level in quality.levels(format) {
            for &strategy in strategies {
                recipes.push(Recipe::new(format, level, strategy));
            }
        }
    }
    recipes
}
