//! Side selectors for two-way diffs and three-way merges.

use serde::{Deserialize, Serialize};

/// One of the two texts compared by a file diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeSide {
    /// The original text. In a merge this is the shared base.
    Old,
    /// The changed text.
    New,
}

impl ChangeSide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Old => Self::New,
            Self::New => Self::Old,
        }
    }
}

/// One of the two diffs paired by a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictSide {
    /// The local changes diffed against the fork point.
    Yours,
    /// The incoming changes diffed against the fork point.
    Theirs,
}

impl ConflictSide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Yours => Self::Theirs,
            Self::Theirs => Self::Yours,
        }
    }
}
