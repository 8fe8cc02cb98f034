//! Shared test utilities.
//!
//! Builders for candidates and explorations that tests in `select`,
//! `publish` and `output` use without running any conversions.

use std::path::Path;

use crate::explore::{Candidate, Exploration, Source};
use crate::imaging::{Dimensions, SizeTable, derive_sizes};
use crate::recipes::{OutputFormat, ResizeStrategy};

/// Create an (empty) candidate directory `root/name` and describe it.
///
/// Format, level and strategy are read back from the directory name, so
/// `name` must look like `webp_q70_inc_resize`. Panics otherwise.
pub fn candidate_in(root: &Path, name: &str, total_bytes: u64) -> Candidate {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();

    let format = name
        .split('_')
        .next()
        .and_then(OutputFormat::from_ext)
        .unwrap_or_else(|| panic!("candidate name '{name}' has no format prefix"));
    let mut parts = name.splitn(3, '_').skip(1);
    let level = parts
        .next()
        .and_then(|q| q.strip_prefix('q'))
        .and_then(|q| q.parse().ok())
        .unwrap_or_else(|| panic!("candidate name '{name}' has no q<level> part"));
    let strategy = match parts.next() {
        Some("no_resize") => ResizeStrategy::NoResize,
        Some("aft_resize") => ResizeStrategy::AftResize,
        _ => ResizeStrategy::IncResize,
    };

    Candidate {
        name: name.to_string(),
        dir,
        format,
        level,
        strategy,
        total_bytes,
    }
}

/// An exploration of a `foobar.png` source with the default size table.
pub fn exploration_of(dimensions: Dimensions, candidates: Vec<Candidate>) -> Exploration {
    let work_dir = candidates
        .first()
        .and_then(|c| c.dir.parent())
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Exploration {
        source: Source {
            path: "src/foobar.png".into(),
            stem: "foobar".to_string(),
            dimensions,
            derived: derive_sizes(dimensions, &SizeTable::default()),
        },
        work_dir,
        candidates,
    }
}
