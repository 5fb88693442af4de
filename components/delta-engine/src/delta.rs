//! Change deltas: the regions a file diff is partitioned into.

use serde::{Deserialize, Serialize};

use crate::domain::{ChangeSide, ChangeStatus, ChangeType};
use crate::error::Result;
use crate::line_part::{LinePartChangeDelta, TextSpan, clamped_slice};

/// Location of a delta on one side: a half-open line range and a half-open
/// byte range into that side's full text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SideRange {
    /// First line of the region.
    pub start_line: usize,
    /// Line after the region.
    pub end_line: usize,
    /// First byte of the region.
    pub start: usize,
    /// Byte after the region.
    pub end: usize,
}

impl SideRange {
    /// Creates a side range.
    #[must_use]
    pub const fn new(start_line: usize, end_line: usize, start: usize, end: usize) -> Self {
        Self {
            start_line,
            end_line,
            start,
            end,
        }
    }

    /// Returns the byte range as a span.
    #[must_use]
    pub const fn span(&self) -> TextSpan {
        TextSpan::new(self.start, self.end)
    }

    /// Checks if the region covers no text.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Moves the whole region by `text` bytes and `lines` lines.
    pub(crate) fn shift(&mut self, lines: isize, text: isize) {
        self.start_line = self.start_line.saturating_add_signed(lines);
        self.end_line = self.end_line.saturating_add_signed(lines);
        self.start = self.start.saturating_add_signed(text);
        self.end = self.end.saturating_add_signed(text);
    }
}

/// One contiguous changed or unchanged region between two texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDelta {
    change_type: ChangeType,
    status: ChangeStatus,
    old: SideRange,
    new: SideRange,
    line_parts: Vec<LinePartChangeDelta>,
}

impl ChangeDelta {
    /// Creates a pending delta.
    #[must_use]
    pub const fn new(
        change_type: ChangeType,
        old: SideRange,
        new: SideRange,
        line_parts: Vec<LinePartChangeDelta>,
    ) -> Self {
        Self {
            change_type,
            status: ChangeStatus::Pending,
            old,
            new,
            line_parts,
        }
    }

    /// Returns the kind of change.
    #[must_use]
    pub const fn change_type(&self) -> ChangeType {
        self.change_type
    }

    /// Returns the decision status.
    #[must_use]
    pub const fn status(&self) -> ChangeStatus {
        self.status
    }

    /// Returns the location on the given side.
    #[must_use]
    pub const fn range(&self, side: ChangeSide) -> &SideRange {
        match side {
            ChangeSide::Old => &self.old,
            ChangeSide::New => &self.new,
        }
    }

    pub(crate) fn range_mut(&mut self, side: ChangeSide) -> &mut SideRange {
        match side {
            ChangeSide::Old => &mut self.old,
            ChangeSide::New => &mut self.new,
        }
    }

    /// First line on the given side.
    #[must_use]
    pub const fn start_line(&self, side: ChangeSide) -> usize {
        self.range(side).start_line
    }

    /// Line after the region on the given side.
    #[must_use]
    pub const fn end_line(&self, side: ChangeSide) -> usize {
        self.range(side).end_line
    }

    /// First byte on the given side.
    #[must_use]
    pub const fn start_index(&self, side: ChangeSide) -> usize {
        self.range(side).start
    }

    /// Byte after the region on the given side.
    #[must_use]
    pub const fn end_index(&self, side: ChangeSide) -> usize {
        self.range(side).end
    }

    /// Word-level parts of a modified region. Empty for other change types
    /// and once the delta has been applied.
    #[must_use]
    pub fn line_parts(&self) -> &[LinePartChangeDelta] {
        &self.line_parts
    }

    pub(crate) fn line_parts_mut(&mut self) -> &mut Vec<LinePartChangeDelta> {
        &mut self.line_parts
    }

    /// Returns the delta's text on the given side out of that side's full text.
    #[must_use]
    pub fn text<'a>(&self, side: ChangeSide, full_text: &'a str) -> &'a str {
        clamped_slice(full_text, self.range(side).span())
    }

    /// Checks if this delta is an actual change rather than a filler.
    #[must_use]
    pub fn is_change(&self) -> bool {
        self.change_type != ChangeType::Same
    }

    /// Checks if this delta is a change still awaiting a decision.
    #[must_use]
    pub fn is_pending_change(&self) -> bool {
        self.is_change() && self.status.is_pending()
    }

    /// Checks if both deltas replace the same old region with the same text.
    /// `text` and `other_text` are the new-side texts the deltas index into.
    #[must_use]
    pub fn is_same_change(&self, text: &str, other: &Self, other_text: &str) -> bool {
        self.old.start == other.old.start
            && self.old.end == other.old.end
            && self.text(ChangeSide::New, text) == other.text(ChangeSide::New, other_text)
    }

    /// Checks if the old-side regions of two deltas share at least one byte.
    /// Empty regions, such as two insertions at one position, never overlap.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        other.old.start < self.old.end && other.old.end > self.old.start
    }

    /// Moves the delta and its line parts on one side.
    pub(crate) fn shift(&mut self, side: ChangeSide, lines: isize, text: isize) {
        self.range_mut(side).shift(lines, text);
        for part in &mut self.line_parts {
            let span = part.span_mut(side);
            span.start = span.start.saturating_add_signed(text);
            span.end = span.end.saturating_add_signed(text);
        }
    }

    /// Moves to `target` after validating the transition.
    pub(crate) fn transition(&mut self, target: ChangeStatus, index: usize) -> Result<()> {
        self.status.validate_transition(&target, index)?;
        self.status = target;
        Ok(())
    }

    /// Marks the delta undefined. Reachable from every status.
    pub(crate) fn invalidate(&mut self) {
        self.status = ChangeStatus::Undefined;
    }
}
