//! Conversion of line edits into a tiled delta list.
//!
//! A line edit only names line numbers. The builder resolves them to byte
//! offsets on both sides, types each changed region, computes word-level
//! parts for modified regions and fills the gaps with `Same` deltas so the
//! resulting list covers both texts without holes or overlaps.

use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::delta::{ChangeDelta, SideRange};
use crate::domain::{ChangeType, LineEdit};
use crate::error::{DiffError, Result};
use crate::line_part::{TextSpan, compute_line_parts};

/// Byte range of each line of a text. The terminator belongs to its line;
/// the last line has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    lines: Vec<TextSpan>,
}

impl LineIndex {
    /// Indexes `text`. There is always at least one (possibly empty) line.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;
        for piece in text.split('\n') {
            lines.push(TextSpan::new(start, start + piece.len() + 1));
            start += piece.len() + 1;
        }
        if let Some(last) = lines.last_mut() {
            last.end -= 1;
        }
        Self { lines }
    }

    /// Number of indexed lines, including a trailing empty one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Checks if no line is indexed. A `LineIndex` holds at least one line,
    /// so this is false for every index built from a text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Start offset of `line`. Lines past the end start one byte after the
    /// last line, where the missing final terminator would be.
    #[must_use]
    pub fn start_of(&self, line: usize) -> usize {
        match self.lines.get(line) {
            Some(span) => span.start,
            None => self.lines.last().map_or(0, |span| span.end + 1),
        }
    }

    /// End offset of the half-open line range `[start, end)`.
    #[must_use]
    pub fn end_of(&self, start: usize, end: usize) -> usize {
        if start == end {
            return self.start_of(start);
        }
        let last = (end - 1).min(self.lines.len() - 1);
        self.lines[last].end
    }
}

/// Number of lines of `text`, counting a final line without terminator.
#[must_use]
pub fn line_count(text: &str) -> usize {
    text.split_inclusive('\n').count()
}

/// Number of lines a text region spans once placed into a document.
pub(crate) fn line_span(region: &str) -> usize {
    let newlines = region.matches('\n').count();
    if region.is_empty() || region.ends_with('\n') {
        newlines
    } else {
        newlines + 1
    }
}

/// Builds the delta list for `old` and `new` from the line edits that
/// transform one into the other.
///
/// # Errors
/// Returns `DiffError::InvalidEditList` if the edits are out of order,
/// overlap, are inverted, or reference lines beyond either text.
#[instrument(skip(old, new, edits, config), fields(edit_count = edits.len()))]
pub fn build_deltas(
    old: &str,
    new: &str,
    edits: &[LineEdit],
    config: &EngineConfig,
) -> Result<Vec<ChangeDelta>> {
    validate_edits(edits, line_count(old), line_count(new))?;

    let old_index = LineIndex::new(old);
    let new_index = LineIndex::new(new);
    let mut deltas = Vec::with_capacity(edits.len() * 2 + 1);
    let mut previous = (SideRange::default(), SideRange::default());

    for edit in edits {
        let old_range = SideRange::new(
            edit.old_start,
            edit.old_end,
            old_index.start_of(edit.old_start),
            old_index.end_of(edit.old_start, edit.old_end),
        );
        let new_range = SideRange::new(
            edit.new_start,
            edit.new_end,
            new_index.start_of(edit.new_start),
            new_index.end_of(edit.new_start, edit.new_end),
        );
        push_filler(&mut deltas, &previous, &old_range, &new_range);

        let change_type = ChangeType::from_line_counts(edit.old_len(), edit.new_len());
        let line_parts = if change_type == ChangeType::Modify {
            compute_line_parts(
                old,
                new,
                old_range.span(),
                new_range.span(),
                edit.old_len() + edit.new_len(),
                config.word_diff_line_threshold,
            )
        } else {
            Vec::new()
        };
        deltas.push(ChangeDelta::new(change_type, old_range, new_range, line_parts));
        previous = (old_range, new_range);
    }

    let old_end = SideRange::new(line_count(old), 0, old.len(), 0);
    let new_end = SideRange::new(line_count(new), 0, new.len(), 0);
    push_filler(&mut deltas, &previous, &old_end, &new_end);

    debug!(deltas = deltas.len(), "Built delta list");
    Ok(deltas)
}

/// Pushes the `Same` delta between the end of `previous` and the start of
/// `next`, unless that gap is empty on both sides.
fn push_filler(
    deltas: &mut Vec<ChangeDelta>,
    previous: &(SideRange, SideRange),
    next_old: &SideRange,
    next_new: &SideRange,
) {
    let (prev_old, prev_new) = previous;
    let has_gap = next_old.start_line > prev_old.end_line
        || next_new.start_line > prev_new.end_line
        || next_old.start > prev_old.end
        || next_new.start > prev_new.end;
    if !has_gap {
        return;
    }
    deltas.push(ChangeDelta::new(
        ChangeType::Same,
        SideRange::new(
            prev_old.end_line,
            next_old.start_line,
            prev_old.end,
            next_old.start,
        ),
        SideRange::new(
            prev_new.end_line,
            next_new.start_line,
            prev_new.end,
            next_new.start,
        ),
        Vec::new(),
    ));
}

fn validate_edits(edits: &[LineEdit], old_lines: usize, new_lines: usize) -> Result<()> {
    let mut previous: Option<&LineEdit> = None;
    for (index, edit) in edits.iter().enumerate() {
        if edit.old_start > edit.old_end || edit.new_start > edit.new_end {
            return Err(DiffError::InvalidEditList(format!(
                "edit {index} has an inverted range: {edit:?}"
            )));
        }
        if edit.is_empty() {
            return Err(DiffError::InvalidEditList(format!(
                "edit {index} changes nothing: {edit:?}"
            )));
        }
        if edit.old_end > old_lines || edit.new_end > new_lines {
            return Err(DiffError::InvalidEditList(format!(
                "edit {index} exceeds the texts ({old_lines} old lines, {new_lines} new lines): {edit:?}"
            )));
        }
        if let Some(prev) = previous
            && (edit.old_start < prev.old_end || edit.new_start < prev.new_end)
        {
            return Err(DiffError::InvalidEditList(format!(
                "edit {index} is out of order or overlaps its predecessor: {edit:?}"
            )));
        }
        previous = Some(edit);
    }
    Ok(())
}
