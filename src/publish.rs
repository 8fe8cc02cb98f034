//! Replacement plan for the chosen candidate.
//!
//! WordPress names its resized copies `<stem>-<w>x<h>.<ext>` next to the
//! uploaded original. Replacing an image means overwriting each of those
//! files with the matching file from the chosen candidate directory:
//!
//! ```text
//! webp_q70_inc_resize/dawn.webp            → dawn.webp
//! webp_q70_inc_resize/dawn-300x169.webp    → dawn-300x169.webp
//! webp_q70_inc_resize/dawn-768x432.webp    → dawn-768x432.webp
//! ```
//!
//! The thumbnail is left alone. Transferring the files is out of scope; the
//! plan only names what goes where.

use crate::explore::{Candidate, Source};
use crate::imaging::{Dimensions, resized_file_name};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Candidate file missing: {0}")]
    MissingFile(PathBuf),
}

/// One resized file and the platform file it overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub local: PathBuf,
    pub remote_name: String,
    pub size: Dimensions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementPlan {
    /// Full-size file, uploaded as the new original.
    pub original: PathBuf,
    pub replacements: Vec<Replacement>,
}

impl ReplacementPlan {
    /// Files to transfer, original included.
    pub fn file_count(&self) -> usize {
        1 + self.replacements.len()
    }

    /// Bytes to transfer, read from the local files.
    pub fn total_bytes(&self) -> Result<u64, PublishError> {
        let mut total = std::fs::metadata(&self.original)?.len();
        for r in &self.replacements {
            total += std::fs::metadata(&r.local)?.len();
        }
        Ok(total)
    }
}

/// Plan the upload of `candidate`, overwriting files named after `remote_stem`.
///
/// Fails if any file the plan refers to is missing locally.
pub fn plan_replacement(
    candidate: &Candidate,
    source: &Source,
    remote_stem: &str,
) -> Result<ReplacementPlan, PublishError> {
    let original = require(candidate.full_size_path(&source.stem))?;
    let ext = candidate.format.ext();

    let replacements = candidate
        .resized_sizes(&source.derived)
        .iter()
        .map(|&size| {
            Ok(Replacement {
                local: require(candidate.resized_path(&source.stem, size))?,
                remote_name: resized_file_name(remote_stem, size, ext),
                size,
            })
        })
        .collect::<Result<Vec<_>, PublishError>>()?;

    Ok(ReplacementPlan {
        original,
        replacements,
    })
}

fn require(path: PathBuf) -> Result<PathBuf, PublishError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(PublishError::MissingFile(path))
    }
}
