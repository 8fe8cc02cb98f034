//! Image sizes and image processing.
//!
//! | Operation | Where |
//! |---|---|
//! | **Size derivation** | [`derive_sizes`], pure with WordPress-exact rounding |
//! | **Identify** | `image::image_dimensions` |
//! | **Convert** | ImageMagick `convert` via [`MagickBackend`] |
//!
//! The module is split into:
//! - **Breakpoints**: the named boxes WordPress resizes against
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Backend**: [`ImageBackend`] trait + [`MagickBackend`]
//! - **Operations**: command templates and variant naming

pub mod backend;
mod breakpoints;
mod calculations;
pub mod magick_backend;
pub mod operations;

pub use backend::{BackendError, ImageBackend};
pub use breakpoints::{BoundingBox, MEDIUM_LARGE_WIDTH, PlatformVersion, SizeTable};
pub use calculations::{
    DerivedSizes, Dimensions, ParseDimensionsError, crop_thumbnail, derive_sizes, fix_height,
    fix_width, round_half_up, scale_to_fit,
};
pub use magick_backend::{MagickBackend, SUPPORTED_EXTENSIONS};
pub use operations::{
    TemplateVars, get_dimensions, name_decoration, render_command, resized_file_name,
};
