//! Delta change type and status state machine.

use serde::{Deserialize, Serialize};

use crate::error::DiffError;

/// Kind of change a delta represents. Fixed when the delta is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    /// Unchanged region between two changes.
    Same,
    /// Lines only present on the new side.
    Add,
    /// Lines only present on the old side.
    Delete,
    /// Lines replaced by other lines.
    Modify,
}

impl ChangeType {
    /// Derives the type of a changed region from the sizes of its line ranges.
    #[must_use]
    pub const fn from_line_counts(old_lines: usize, new_lines: usize) -> Self {
        if old_lines == 0 {
            Self::Add
        } else if new_lines == 0 {
            Self::Delete
        } else {
            Self::Modify
        }
    }
}

/// Decision status of a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeStatus {
    /// Awaiting a decision.
    Pending,
    /// The change was taken over.
    Accepted,
    /// The change was explicitly declined.
    Discarded,
    /// A live edit touched the region; it no longer maps to one coherent change.
    Undefined,
}

impl ChangeStatus {
    /// Checks if an accept or discard may still be requested.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Checks if a decision has been made or invalidated.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !self.is_pending()
    }

    /// Validates that a transition from this status to the target is allowed.
    ///
    /// Returning to `Pending` is only possible through a whole-diff reset, which
    /// rebuilds the deltas instead of transitioning them.
    ///
    /// # Errors
    /// Returns `DiffError::InvalidState` carrying `index` if the transition is invalid.
    pub fn validate_transition(&self, target: &Self, index: usize) -> Result<(), DiffError> {
        let valid = matches!(
            (self, target),
            (Self::Pending, Self::Accepted | Self::Discarded)
                | (
                    Self::Pending | Self::Accepted | Self::Discarded,
                    Self::Undefined
                )
        );

        if valid {
            Ok(())
        } else {
            Err(DiffError::InvalidState {
                index,
                status: *self,
            })
        }
    }
}
