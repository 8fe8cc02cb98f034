//! Reviewing candidates and choosing one.
//!
//! Candidates are listed smallest first; the user picks one by index. Each
//! entry in the review list names a couple of representative files (the
//! full-size image and the smallest resized variant) so the candidates can
//! be compared side by side in an image viewer before choosing.

use crate::explore::{Candidate, Exploration};
use crate::imaging::round_half_up;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No candidates to choose from")]
    NoCandidates,
    #[error("Input closed before a candidate was chosen")]
    InputClosed,
    #[error("Candidate {0} does not exist")]
    OutOfRange(usize),
}

/// Bytes to whole kilobytes, rounded half-up.
pub fn kilobytes(bytes: u64) -> u64 {
    round_half_up(bytes, 1024)
}

/// One summary line per candidate: `" 0: 12KB, webp_q50_inc_resize"`.
pub fn summary_lines(candidates: &[Candidate]) -> Vec<String> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:>2}: {}KB, {}", i, kilobytes(c.total_bytes), c.name))
        .collect()
}

/// A candidate with the files worth looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    /// e.g. `"41KB webp_q70_inc_resize: 1080x424 > 300x118"`
    pub heading: String,
    /// Full-size image, then the smallest resized variant if any.
    pub files: Vec<PathBuf>,
}

/// Build the review list for an exploration, in candidate order.
pub fn review_entries(exploration: &Exploration) -> Vec<ReviewEntry> {
    let source = &exploration.source;

    exploration
        .candidates
        .iter()
        .map(|candidate| {
            let mut heading = format!(
                "{}KB {}: {}",
                kilobytes(candidate.total_bytes),
                candidate.name,
                source.dimensions
            );
            let mut files = vec![candidate.full_size_path(&source.stem)];
            if let Some(&size) = candidate.resized_sizes(&source.derived).first() {
                heading.push_str(&format!(" > {size}"));
                files.push(candidate.resized_path(&source.stem, size));
            }
            ReviewEntry { heading, files }
        })
        .collect()
}

/// Prompt on `output` until `input` yields a valid candidate index.
///
/// The summary is reprinted after every invalid answer.
pub fn choose_candidate(
    candidates: &[Candidate],
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<usize, SelectError> {
    if candidates.is_empty() {
        return Err(SelectError::NoCandidates);
    }
    let last = candidates.len() - 1;

    loop {
        for line in summary_lines(candidates) {
            writeln!(output, "{line}")?;
        }
        write!(output, "Choose [0-{last}]: ")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Err(SelectError::InputClosed);
        }
        match answer.trim().parse::<usize>() {
            Ok(choice) if choice <= last => return Ok(choice),
            _ => tracing::debug!(answer = answer.trim(), "invalid choice"),
        }
    }
}

/// Delete every candidate directory except `keep`.
///
/// Returns the directories removed.
pub fn discard_others(candidates: &[Candidate], keep: usize) -> Result<Vec<PathBuf>, SelectError> {
    let chosen = candidates.get(keep).ok_or(SelectError::OutOfRange(keep))?;
    let mut removed = Vec::new();
    for candidate in candidates {
        if candidate.dir == chosen.dir {
            continue;
        }
        if candidate.dir.exists() {
            std::fs::remove_dir_all(&candidate.dir)?;
            removed.push(candidate.dir.clone());
        } else {
            tracing::warn!(dir = %candidate.dir.display(), "candidate directory already gone");
        }
    }
    Ok(removed)
}
