//! CLI output formatting for every command.
//!
//! Output leads with what the user is deciding about (sizes, candidates and
//! their byte counts) with paths as indented context underneath.
//!
//! # Output Format
//!
//! ## Sizes
//!
//! ```text
//! dawn.png (1080x424)
//!     thumbnail: 150x150
//!     300x118, 768x302, 1024x402
//! ```
//!
//! ## Explore
//!
//! ```text
//! dawn.png (1080x424) → 18 candidates in tmp/
//!     png_q255_inc_resize: 4 files, 612KB
//!     webp_q70_inc_resize: 4 files, 41KB
//! ```
//!
//! ## Review
//!
//! ```text
//!  0  41KB webp_q70_inc_resize: 1080x424 > 300x118
//!     tmp/webp_q70_inc_resize/dawn.webp
//!     tmp/webp_q70_inc_resize/dawn-300x118.webp
//! ```
//!
//! ## Plan
//!
//! ```text
//! Replace with webp_q70_inc_resize (4 files, 41KB)
//!     tmp/webp_q70_inc_resize/dawn.webp → original
//!     tmp/webp_q70_inc_resize/dawn-300x118.webp → dawn-300x118.webp
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::explore::{Candidate, ExploreEvent, Source};
use crate::imaging::{DerivedSizes, Dimensions};
use crate::publish::ReplacementPlan;
use crate::select::{ReviewEntry, kilobytes};
use std::path::{Path, PathBuf};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn join_sizes(sizes: &[Dimensions]) -> String {
    sizes
        .iter()
        .map(Dimensions::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Sizes
// ============================================================================

/// Format the sizes derived for a source.
///
/// `label` names the source (file name, or the typed `WxH`). With `combined`
/// the thumbnail is folded into one sorted list.
pub fn format_sizes(
    label: &str,
    dimensions: Dimensions,
    derived: &DerivedSizes,
    combined: bool,
) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", label, dimensions)];

    if combined {
        let all = derived.combined();
        if all.is_empty() {
            lines.push(format!("{}(none)", indent(1)));
        } else {
            lines.push(format!("{}{}", indent(1), join_sizes(&all)));
        }
        return lines;
    }

    match derived.thumbnail {
        Some(thumb) => lines.push(format!("{}thumbnail: {}", indent(1), thumb)),
        None => lines.push(format!("{}thumbnail: none", indent(1))),
    }
    if derived.sizes.is_empty() {
        lines.push(format!("{}no resized sizes", indent(1)));
    } else {
        lines.push(format!("{}{}", indent(1), join_sizes(&derived.sizes)));
    }
    lines
}

pub fn print_sizes(label: &str, dimensions: Dimensions, derived: &DerivedSizes, combined: bool) {
    for line in format_sizes(label, dimensions, derived, combined) {
        println!("{}", line);
    }
}

// ============================================================================
// Explore
// ============================================================================

/// Header printed before candidates are generated.
pub fn format_explore_header(source: &Source, recipe_count: usize, work_dir: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({}) \u{2192} {} candidates in {}/",
        display_name(&source.path),
        source.dimensions,
        recipe_count,
        work_dir.display()
    )];
    if !source.derived.sizes.is_empty() {
        lines.push(format!(
            "{}sizes: {}",
            indent(1),
            join_sizes(&source.derived.sizes)
        ));
    }
    lines
}

/// Format a single exploration progress event.
///
/// Only finished candidates are shown; starts are logged at debug level.
pub fn format_explore_event(event: &ExploreEvent) -> Vec<String> {
    match event {
        ExploreEvent::CandidateStarted { .. } => Vec::new(),
        ExploreEvent::CandidateFinished {
            name,
            files,
            total_bytes,
        } => {
            let noun = if *files == 1 { "file" } else { "files" };
            vec![format!(
                "{}{}: {} {}, {}KB",
                indent(1),
                name,
                files,
                noun,
                kilobytes(*total_bytes)
            )]
        }
    }
}

// ============================================================================
// Review
// ============================================================================

/// Format the review list: one heading per candidate, files indented.
pub fn format_review(entries: &[ReviewEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        lines.push(format!("{:>2}  {}", i, entry.heading));
        for file in &entry.files {
            lines.push(format!("{}{}", indent(1), file.display()));
        }
    }
    lines
}

pub fn print_review(entries: &[ReviewEntry]) {
    for line in format_review(entries) {
        println!("{}", line);
    }
}

// ============================================================================
// Cleanup and plan
// ============================================================================

/// Summarise what happened to the candidates that were not chosen.
pub fn format_discarded(removed: &[PathBuf], work_dir: &Path) -> Vec<String> {
    match removed.len() {
        0 => vec![format!("Kept all candidates in {}/", work_dir.display())],
        1 => vec!["Removed 1 candidate directory".to_string()],
        n => vec![format!("Removed {} candidate directories", n)],
    }
}

/// Format the replacement plan for the chosen candidate.
///
/// `bytes` is what the plan transfers, see [`ReplacementPlan::total_bytes`].
pub fn format_plan(candidate: &Candidate, plan: &ReplacementPlan, bytes: u64) -> Vec<String> {
    let mut lines = vec![format!(
        "Replace with {} ({} files, {}KB)",
        candidate.name,
        plan.file_count(),
        kilobytes(bytes)
    )];
    lines.push(format!(
        "{}{} \u{2192} original",
        indent(1),
        plan.original.display()
    ));
    for r in &plan.replacements {
        lines.push(format!(
            "{}{} \u{2192} {}",
            indent(1),
            r.local.display(),
            r.remote_name
        ));
    }
    lines
}

pub fn print_plan(candidate: &Candidate, plan: &ReplacementPlan, bytes: u64) {
    for line in format_plan(candidate, plan, bytes) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{SizeTable, derive_sizes};
    use crate::publish::Replacement;
    use crate::test_helpers::{candidate_in, exploration_of};
    use tempfile::TempDir;

    fn derived(w: u32, h: u32) -> DerivedSizes {
        derive_sizes(Dimensions::new(w, h), &SizeTable::default())
    }

    // =========================================================================
    // Sizes
    // =========================================================================

    #[test]
    fn sizes_separate_thumbnail() {
        let lines = format_sizes("dawn.png", Dimensions::new(1080, 424), &derived(1080, 424), false);
        assert_eq!(
            lines,
            vec![
                "dawn.png (1080x424)",
                "    thumbnail: 150x150",
                "    300x118, 768x302, 1024x402",
            ]
        );
    }

    #[test]
    fn sizes_combined() {
        let lines = format_sizes("300x400", Dimensions::new(300, 400), &derived(300, 400), true);
        assert_eq!(lines, vec!["300x400 (300x400)", "    150x150, 225x300"]);
    }

    #[test]
    fn sizes_tiny_source() {
        let d = derived(100, 100);
        assert_eq!(
            format_sizes("x", Dimensions::new(100, 100), &d, false),
            vec!["x (100x100)", "    thumbnail: none", "    no resized sizes"]
        );
        assert_eq!(
            format_sizes("x", Dimensions::new(100, 100), &d, true),
            vec!["x (100x100)", "    (none)"]
        );
    }

    // =========================================================================
    // Explore
    // =========================================================================

    #[test]
    fn explore_header_names_source_and_sizes() {
        let exploration = exploration_of(Dimensions::new(1080, 424), vec![]);
        let lines = format_explore_header(&exploration.source, 18, Path::new("tmp"));
        assert_eq!(
            lines,
            vec![
                "foobar.png (1080x424) \u{2192} 18 candidates in tmp/",
                "    sizes: 300x118, 768x302, 1024x402",
            ]
        );
    }

    #[test]
    fn explore_started_is_silent() {
        let event = ExploreEvent::CandidateStarted {
            name: "png_q16_aft_resize".to_string(),
        };
        assert!(format_explore_event(&event).is_empty());
    }

    #[test]
    fn explore_finished_shows_files_and_size() {
        let event = ExploreEvent::CandidateFinished {
            name: "webp_q70_inc_resize".to_string(),
            files: 4,
            total_bytes: 41 * 1024,
        };
        assert_eq!(
            format_explore_event(&event),
            vec!["    webp_q70_inc_resize: 4 files, 41KB"]
        );

        let single = ExploreEvent::CandidateFinished {
            name: "jpg_q80_no_resize".to_string(),
            files: 1,
            total_bytes: 2048,
        };
        assert_eq!(
            format_explore_event(&single),
            vec!["    jpg_q80_no_resize: 1 file, 2KB"]
        );
    }

    // =========================================================================
    // Review, cleanup and plan
    // =========================================================================

    #[test]
    fn review_indexes_entries() {
        let entries = vec![
            ReviewEntry {
                heading: "4KB webp_q50_inc_resize: 200x300".to_string(),
                files: vec![PathBuf::from("tmp/webp_q50_inc_resize/a.webp")],
            },
            ReviewEntry {
                heading: "21KB jpg_q50_inc_resize: 200x300".to_string(),
                files: vec![PathBuf::from("tmp/jpg_q50_inc_resize/a.jpg")],
            },
        ];
        assert_eq!(
            format_review(&entries),
            vec![
                " 0  4KB webp_q50_inc_resize: 200x300",
                "    tmp/webp_q50_inc_resize/a.webp",
                " 1  21KB jpg_q50_inc_resize: 200x300",
                "    tmp/jpg_q50_inc_resize/a.jpg",
            ]
        );
    }

    #[test]
    fn discarded_summary() {
        let work = Path::new("tmp");
        assert_eq!(format_discarded(&[], work), vec!["Kept all candidates in tmp/"]);
        assert_eq!(
            format_discarded(&[PathBuf::from("tmp/a")], work),
            vec!["Removed 1 candidate directory"]
        );
        assert_eq!(
            format_discarded(&[PathBuf::from("tmp/a"), PathBuf::from("tmp/b")], work),
            vec!["Removed 2 candidate directories"]
        );
    }

    #[test]
    fn plan_lists_original_then_sizes() {
        let tmp = TempDir::new().unwrap();
        let candidate = candidate_in(tmp.path(), "webp_q70_inc_resize", 50 * 1024);
        let plan = ReplacementPlan {
            original: PathBuf::from("c/foobar.webp"),
            replacements: vec![Replacement {
                local: PathBuf::from("c/foobar-300x118.webp"),
                remote_name: "dawn-300x118.webp".to_string(),
                size: Dimensions::new(300, 118),
            }],
        };

        assert_eq!(
            format_plan(&candidate, &plan, 41 * 1024),
            vec![
                "Replace with webp_q70_inc_resize (2 files, 41KB)",
                "    c/foobar.webp \u{2192} original",
                "    c/foobar-300x118.webp \u{2192} dawn-300x118.webp",
            ]
        );
    }
}
