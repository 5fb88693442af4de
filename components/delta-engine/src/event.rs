//! Text change events emitted when a delta is applied.

use serde::{Deserialize, Serialize};

use crate::domain::ChangeSide;
use crate::error::{DiffError, Result};

/// One replacement performed on a side's text: `length` bytes at `offset`
/// were replaced by `text`.
///
/// Editors mirror accepted deltas by replaying these events on their own
/// buffers, and the merge layer forwards them to the sibling diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaTextChangeEvent {
    /// Side whose text changed.
    pub side: ChangeSide,
    /// Byte offset of the replaced region.
    pub offset: usize,
    /// Number of bytes removed.
    pub length: usize,
    /// Text inserted at `offset`.
    pub text: String,
}

impl DeltaTextChangeEvent {
    /// Creates an event.
    pub fn new(side: ChangeSide, offset: usize, length: usize, text: impl Into<String>) -> Self {
        Self {
            side,
            offset,
            length,
            text: text.into(),
        }
    }

    /// Replays the replacement on `buffer`.
    ///
    /// # Errors
    /// Returns `DiffError::BadLocation` if the region is outside `buffer` or
    /// splits a character. The buffer is left untouched in that case.
    pub fn apply_to(&self, buffer: &mut String) -> Result<()> {
        check_location(buffer, self.offset, self.length)?;
        buffer.replace_range(self.offset..self.offset + self.length, &self.text);
        Ok(())
    }
}

/// Checks that `[offset, offset + length)` lies in `text` on character boundaries.
pub(crate) fn check_location(text: &str, offset: usize, length: usize) -> Result<()> {
    let end = offset.checked_add(length);
    match end {
        Some(end)
            if end <= text.len() && text.is_char_boundary(offset) && text.is_char_boundary(end) =>
        {
            Ok(())
        }
        _ => Err(DiffError::BadLocation {
            offset,
            length,
            text_len: text.len(),
        }),
    }
}
