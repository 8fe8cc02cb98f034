//! Candidate generation.
//!
//! Takes a source image, derives the sizes WordPress will generate for it,
//! and runs every [`Recipe`] to produce one candidate directory per
//! compression profile.
//!
//! ## Output Structure
//!
//! ```text
//! tmp/
//! ├── candidates.json                # written by the CLI after exploring
//! ├── png_q255_inc_resize/
//! │   ├── dawn.png                   # full size, recompressed
//! │   ├── dawn-300x169.png           # one per derived size
//! │   ├── dawn-768x432.png
//! │   └── dawn-1024x576.png
//! ├── webp_q70_inc_resize/
//! │   └── ...
//! └── ...
//! ```
//!
//! The thumbnail is never produced: WordPress's own zoom crop is kept.
//!
//! ## Parallel Processing
//!
//! Recipes are independent (each owns its directory and temporary files), so
//! they run in parallel on the global rayon pool.

use crate::imaging::{
    BackendError, DerivedSizes, Dimensions, ImageBackend, SUPPORTED_EXTENSIONS, SizeTable,
    TemplateVars, derive_sizes, get_dimensions, render_command, resized_file_name,
};
use crate::recipes::{OutputFormat, Recipe, ResizeStrategy};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExploreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("\"{given}\" not found. Looking for: \"{resolved}\"")]
    SourceNotFound { given: PathBuf, resolved: PathBuf },
    #[error("Unknown image file type: \"{0}\"")]
    UnsupportedType(PathBuf),
    #[error("File name is not valid UTF-8: {0}")]
    InvalidFileName(PathBuf),
}

/// An inspected source image and the sizes derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct Source {
    pub path: PathBuf,
    /// File name without extension; candidate files reuse it.
    pub stem: String,
    pub dimensions: Dimensions,
    pub derived: DerivedSizes,
}

/// Check that `path` is an existing image of a supported type.
pub fn validate_source(path: &Path) -> Result<(), ExploreError> {
    if !path.is_file() {
        return Err(ExploreError::SourceNotFound {
            given: path.to_path_buf(),
            resolved: std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
        });
    }
    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
    if !supported {
        return Err(ExploreError::UnsupportedType(path.to_path_buf()));
    }
    Ok(())
}

/// Validate, identify, and derive platform sizes for a source image.
pub fn inspect_source(
    backend: &impl ImageBackend,
    path: &Path,
    table: &SizeTable,
) -> Result<Source, ExploreError> {
    validate_source(path)?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ExploreError::InvalidFileName(path.to_path_buf()))?
        .to_string();
    let dimensions = get_dimensions(backend, path)?;
    let derived = derive_sizes(dimensions, table);
    tracing::info!(
        source = %path.display(),
        %dimensions,
        sizes = derived.sizes.len(),
        "inspected source"
    );
    Ok(Source {
        path: path.to_path_buf(),
        stem,
        dimensions,
        derived,
    })
}

/// One compression profile, materialised on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Directory name, e.g. `webp_q70_inc_resize`.
    pub name: String,
    pub dir: PathBuf,
    pub format: OutputFormat,
    pub level: u32,
    pub strategy: ResizeStrategy,
    /// Bytes of all files in the directory.
    pub total_bytes: u64,
}

impl Candidate {
    /// Path of the recompressed full-size image.
    pub fn full_size_path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", stem, self.format.ext()))
    }

    /// Path of a resized variant.
    pub fn resized_path(&self, stem: &str, size: Dimensions) -> PathBuf {
        self.dir.join(resized_file_name(stem, size, self.format.ext()))
    }

    /// The derived sizes this candidate has files for.
    ///
    /// `no_resize` candidates hold the full-size image only.
    pub fn resized_sizes<'a>(&self, derived: &'a DerivedSizes) -> &'a [Dimensions] {
        match self.strategy {
            ResizeStrategy::NoResize => &[],
            ResizeStrategy::IncResize | ResizeStrategy::AftResize => &derived.sizes,
        }
    }

    /// Sort key: smallest first, directory as tie-break.
    fn sort_key(&self) -> (u64, &Path) {
        (self.total_bytes, self.dir.as_path())
    }
}

/// Sort candidates smallest first.
pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

/// Progress events emitted while exploring.
#[derive(Debug, Clone)]
pub enum ExploreEvent {
    CandidateStarted {
        name: String,
    },
    CandidateFinished {
        name: String,
        files: usize,
        total_bytes: u64,
    },
}

/// Everything an exploration produced.
#[derive(Debug, Clone, Serialize)]
pub struct Exploration {
    pub source: Source,
    pub work_dir: PathBuf,
    /// Sorted smallest first.
    pub candidates: Vec<Candidate>,
}

/// Run every recipe against `source`, creating one candidate directory each.
pub fn explore(
    backend: &impl ImageBackend,
    source: Source,
    recipes: &[Recipe],
    work_dir: &Path,
    events: Option<Sender<ExploreEvent>>,
) -> Result<Exploration, ExploreError> {
    std::fs::create_dir_all(work_dir)?;

    let mut candidates = recipes
        .par_iter()
        .map(|recipe| {
            let name = recipe.dir_name();
            if let Some(tx) = &events {
                tx.send(ExploreEvent::CandidateStarted { name: name.clone() })
                    .ok();
            }
            let candidate = materialize(backend, &source, recipe, &work_dir.join(&name))?;
            let files = std::fs::read_dir(&candidate.dir)?.count();
            tracing::info!(candidate = %name, bytes = candidate.total_bytes, "candidate ready");
            if let Some(tx) = &events {
                tx.send(ExploreEvent::CandidateFinished {
                    name,
                    files,
                    total_bytes: candidate.total_bytes,
                })
                .ok();
            }
            Ok(candidate)
        })
        .collect::<Result<Vec<_>, ExploreError>>()?;

    sort_candidates(&mut candidates);

    Ok(Exploration {
        source,
        work_dir: work_dir.to_path_buf(),
        candidates,
    })
}

/// Run one recipe into `dir`.
fn materialize(
    backend: &impl ImageBackend,
    source: &Source,
    recipe: &Recipe,
    dir: &Path,
) -> Result<Candidate, ExploreError> {
    // Files left by an earlier run would be counted in total_bytes.
    match std::fs::remove_dir_all(dir) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
        _ => {}
    }
    std::fs::create_dir_all(dir)?;

    let ext = recipe.format.ext();
    let tmp_img = dir.join("tmp.png");
    let tmp_img2 = dir.join("tmp2.png");
    let vars = TemplateVars::new()
        .set("q", recipe.level)
        .set("src_img", source.path.display())
        .set("tmp_img", tmp_img.display())
        .set("tmp_img2", tmp_img2.display())
        .set("dest_img", dir.join(format!("{}.{}", source.stem, ext)).display());

    backend.run(&render_command(recipe.unscaled, &vars))?;

    for &size in &source.derived.sizes {
        let resized = dir.join(resized_file_name(&source.stem, size, ext));
        let size_vars = vars
            .clone()
            .with_size(size)
            .set("resized_img", resized.display());
        for template in &recipe.scaling {
            backend.run(&render_command(template, &size_vars))?;
        }
    }

    for tmp in [&tmp_img, &tmp_img2] {
        remove_if_exists(tmp)?;
    }

    Ok(Candidate {
        name: recipe.dir_name(),
        dir: dir.to_path_buf(),
        format: recipe.format,
        level: recipe.level,
        strategy: recipe.strategy,
        total_bytes: count_bytes_in_dir(dir)?,
    })
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Total size of the regular files directly inside `dir`.
pub fn count_bytes_in_dir(dir: &Path) -> std::io::Result<u64> {
    let mut total = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if meta.is_file() {
            total += meta.len();
        }
    }
    Ok(total)
}
