//! # Media Squeeze
//!
//! Finds the smallest acceptable encoding for an image already uploaded to
//! WordPress. WordPress keeps the original plus a resized copy for every
//! registered size; this crate predicts exactly which sizes it made, rebuilds
//! each of them under many compression profiles, and lets you pick the
//! profile whose output is smallest while still looking right.
//!
//! # Architecture: Three Steps
//!
//! ```text
//! 1. Derive    source image  →  sizes         (pure, WordPress-exact rounding)
//! 2. Explore   source + sizes → tmp/<recipe>/ (one directory per profile)
//! 3. Select    candidates    →  plan          (review, choose, discard others)
//! ```
//!
//! Step 1 is pure arithmetic and fully unit tested. Step 2 shells out to
//! ImageMagick through the [`imaging::ImageBackend`] trait so tests can swap
//! in a recording mock. Step 3 reads answers from any `BufRead`, so the
//! prompt loop is testable without a terminal.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Size derivation, breakpoint table, command templates, ImageMagick backend |
//! | [`recipes`] | Expands enabled formats and quality levels into conversion recipes |
//! | [`explore`] | Source validation and parallel candidate generation |
//! | [`select`] | Candidate summary, review list, choice prompt, cleanup |
//! | [`publish`] | Maps the chosen candidate's files onto WordPress file names |
//! | [`config`] | `media-squeeze.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Integer Rounding
//!
//! WordPress computes `round(a * b / c)` in PHP, which rounds halves away
//! from zero. A float product can land just below an exact half and round
//! down, so every scaled dimension is an exact rational rounded with
//! [`imaging::round_half_up`].
//!
//! ## Explicit Platform Version
//!
//! WordPress 5.3 added the 1536 and 2048 boxes and a 2560 "big image"
//! threshold. The size table carries a [`imaging::PlatformVersion`] rather
//! than inferring the breakpoints from anywhere else, so sizes for a legacy
//! site are derived with `platform = "legacy"`.
//!
//! ## Nothing Leaves the Machine
//!
//! Uploading is left to whatever already moves files to the server. The
//! [`publish`] step only produces the list of local files and the remote
//! names they replace.

pub mod config;
pub mod explore;
pub mod imaging;
pub mod output;
pub mod publish;
pub mod recipes;
pub mod select;

#[cfg(test)]
pub(crate) mod test_helpers;
