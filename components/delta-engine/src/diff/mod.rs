//! Line and word diffing.
//!
//! This module provides a trait-based line diff so the delta builder can be
//! fed by any algorithm, plus the tokenizers used for line and word diffs.

pub mod myers;

pub use myers::MyersDiff;

use crate::domain::LineEdit;

/// A single diff operation. Every variant is located on both sides so that
/// changed regions can be turned into line edits directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOp {
    /// Tokens that are unchanged between both sequences.
    Equal {
        /// Start index in the old sequence (inclusive).
        old_start: usize,
        /// End index in the old sequence (exclusive).
        old_end: usize,
        /// Start index in the new sequence (inclusive).
        new_start: usize,
        /// End index in the new sequence (exclusive).
        new_end: usize,
    },
    /// Tokens only present in the new sequence.
    Insert {
        /// Position in the old sequence the tokens are inserted at.
        old_index: usize,
        /// Start index in the new sequence (inclusive).
        new_start: usize,
        /// End index in the new sequence (exclusive).
        new_end: usize,
    },
    /// Tokens only present in the old sequence.
    Delete {
        /// Start index in the old sequence (inclusive).
        old_start: usize,
        /// End index in the old sequence (exclusive).
        old_end: usize,
        /// Position in the new sequence the tokens were removed at.
        new_index: usize,
    },
    /// Tokens that were replaced by other tokens.
    Replace {
        /// Start index in the old sequence (inclusive).
        old_start: usize,
        /// End index in the old sequence (exclusive).
        old_end: usize,
        /// Start index in the new sequence (inclusive).
        new_start: usize,
        /// End index in the new sequence (exclusive).
        new_end: usize,
    },
}

impl DiffOp {
    /// Builds the change operation covering the given ranges.
    ///
    /// Returns `None` when both ranges are empty.
    #[must_use]
    pub const fn change(old: (usize, usize), new: (usize, usize)) -> Option<Self> {
        let old_empty = old.0 == old.1;
        let new_empty = new.0 == new.1;
        match (old_empty, new_empty) {
            (true, true) => None,
            (true, false) => Some(Self::Insert {
                old_index: old.0,
                new_start: new.0,
                new_end: new.1,
            }),
            (false, true) => Some(Self::Delete {
                old_start: old.0,
                old_end: old.1,
                new_index: new.0,
            }),
            (false, false) => Some(Self::Replace {
                old_start: old.0,
                old_end: old.1,
                new_start: new.0,
                new_end: new.1,
            }),
        }
    }

    /// Returns the range covered in the old sequence. Inserts cover an empty range.
    #[must_use]
    pub const fn old_range(&self) -> (usize, usize) {
        match *self {
            Self::Equal {
                old_start, old_end, ..
            }
            | Self::Delete {
                old_start, old_end, ..
            }
            | Self::Replace {
                old_start, old_end, ..
            } => (old_start, old_end),
            Self::Insert { old_index, .. } => (old_index, old_index),
        }
    }

    /// Returns the range covered in the new sequence. Deletes cover an empty range.
    #[must_use]
    pub const fn new_range(&self) -> (usize, usize) {
        match *self {
            Self::Equal {
                new_start, new_end, ..
            }
            | Self::Insert {
                new_start, new_end, ..
            }
            | Self::Replace {
                new_start, new_end, ..
            } => (new_start, new_end),
            Self::Delete { new_index, .. } => (new_index, new_index),
        }
    }

    /// Returns true if this operation represents a change (not equal).
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Equal { .. })
    }

    /// Returns the size of the operation in the old sequence.
    #[must_use]
    pub const fn old_len(&self) -> usize {
        let (start, end) = self.old_range();
        end - start
    }

    /// Returns the size of the operation in the new sequence.
    #[must_use]
    pub const fn new_len(&self) -> usize {
        let (start, end) = self.new_range();
        end - start
    }

    /// Converts a change operation into a line edit. Equal runs yield `None`.
    #[must_use]
    pub const fn to_line_edit(&self) -> Option<LineEdit> {
        if !self.is_change() {
            return None;
        }
        let (old_start, old_end) = self.old_range();
        let (new_start, new_end) = self.new_range();
        Some(LineEdit::new(old_start, old_end, new_start, new_end))
    }
}

/// Trait for diff algorithms.
///
/// Implementations can use different algorithms (Myers, patience, histogram, etc.)
/// while the delta builder keeps a consistent interface. The `Send + Sync`
/// bounds allow one algorithm instance to be shared by several diffs.
pub trait DiffAlgorithm: Send + Sync {
    /// Computes the diff between two token sequences.
    ///
    /// Returns operations in document order that transform `base` into `target`.
    fn diff(&self, base: &[&str], target: &[&str]) -> Vec<DiffOp>;
}

/// Splits text into lines, each keeping its `\n`. A trailing line without a
/// terminator is kept as its own entry.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Splits text into word tokens, each ending after a space or a newline.
#[must_use]
pub fn split_words(text: &str) -> Vec<&str> {
    text.split_inclusive([' ', '\n']).collect()
}

/// Runs a line diff between two texts and returns the changed regions.
#[must_use]
pub fn line_edits(algorithm: &dyn DiffAlgorithm, old: &str, new: &str) -> Vec<LineEdit> {
    algorithm
        .diff(&split_lines(old), &split_lines(new))
        .iter()
        .filter_map(DiffOp::to_line_edit)
        .collect()
}
