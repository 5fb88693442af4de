//! Line edits produced by a line diff.

use serde::{Deserialize, Serialize};

/// A changed line region: `[old_start, old_end)` of the old text was replaced
/// by `[new_start, new_end)` of the new text. Line indices are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineEdit {
    /// First old line of the region.
    pub old_start: usize,
    /// Old line after the region.
    pub old_end: usize,
    /// First new line of the region.
    pub new_start: usize,
    /// New line after the region.
    pub new_end: usize,
}

impl LineEdit {
    /// Creates a new line edit.
    #[must_use]
    pub const fn new(old_start: usize, old_end: usize, new_start: usize, new_end: usize) -> Self {
        Self {
            old_start,
            old_end,
            new_start,
            new_end,
        }
    }

    /// Number of old lines covered.
    #[must_use]
    pub const fn old_len(&self) -> usize {
        self.old_end - self.old_start
    }

    /// Number of new lines covered.
    #[must_use]
    pub const fn new_len(&self) -> usize {
        self.new_end - self.new_start
    }

    /// Checks if the edit removes nothing and adds nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.old_start == self.old_end && self.new_start == self.new_end
    }
}
