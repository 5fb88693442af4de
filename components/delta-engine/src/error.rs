//! Error types for delta operations.

use thiserror::Error;

use crate::domain::{ChangeStatus, ConflictSide};

/// Errors raised by the diff, reconciliation and merge operations.
///
/// Every operation that returns one of these leaves the model exactly as it
/// was before the call.
#[derive(Debug, Error)]
pub enum DiffError {
    /// The delta is not in a state that allows the requested operation.
    #[error("Delta {index} cannot be changed while {status:?}")]
    InvalidState {
        /// Index of the delta in its file diff.
        index: usize,
        /// Status the delta was in.
        status: ChangeStatus,
    },

    /// An accepted change overlaps an incompatible pending change on the other side.
    #[error("Delta {index} of {side:?} conflicts with delta {other_index} of the other side")]
    Conflict {
        /// Side the accept was requested on.
        side: ConflictSide,
        /// Index of the delta being accepted.
        index: usize,
        /// Index of the conflicting delta on the other side.
        other_index: usize,
    },

    /// A text edit lies outside the current text or splits a character.
    #[error("Bad location: offset {offset} + length {length} in text of {text_len} bytes")]
    BadLocation {
        /// Byte offset of the edit.
        offset: usize,
        /// Number of bytes the edit removes.
        length: usize,
        /// Length of the text the edit was aimed at.
        text_len: usize,
    },

    /// The supplied line edits are not ascending, overlap, or exceed the texts.
    #[error("Invalid edit list: {0}")]
    InvalidEditList(String),

    /// The two diffs of a merge do not share the same base text.
    #[error("Merge sides have different base texts ({yours_len} and {theirs_len} bytes)")]
    BaseMismatch {
        /// Length of the base text on the yours side.
        yours_len: usize,
        /// Length of the base text on the theirs side.
        theirs_len: usize,
    },

    /// No delta exists at the given index.
    #[error("No delta at index {0}")]
    NoSuchDelta(usize),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Inline configuration could not be parsed.
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The tracing subscriber could not be installed.
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

/// Convenience alias for engine results.
pub type Result<T> = std::result::Result<T, DiffError>;
