//! Word-level sub-deltas of modified regions.

use serde::{Deserialize, Serialize};

use crate::diff::{DiffAlgorithm, DiffOp, MyersDiff, split_lines, split_words};
use crate::domain::{ChangeSide, ChangeType};

/// Half-open byte range into one side's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextSpan {
    /// First byte of the range.
    pub start: usize,
    /// Byte after the range.
    pub end: usize,
}

impl TextSpan {
    /// Creates a span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Checks if the span covers nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if two spans collide: they share at least one byte, or both are
    /// the same empty position. Symmetric.
    #[must_use]
    pub const fn conflicts_with(&self, other: &Self) -> bool {
        (other.start < self.end && other.end > self.start)
            || (other.start == self.end && other.end == self.start)
    }
}

/// A word-level change inside a modified delta. Ranges are absolute offsets
/// into the full texts and move together with their delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePartChangeDelta {
    change_type: ChangeType,
    old: TextSpan,
    new: TextSpan,
}

impl LinePartChangeDelta {
    /// Creates a line part.
    #[must_use]
    pub const fn new(change_type: ChangeType, old: TextSpan, new: TextSpan) -> Self {
        Self {
            change_type,
            old,
            new,
        }
    }

    /// Returns the kind of change.
    #[must_use]
    pub const fn change_type(&self) -> ChangeType {
        self.change_type
    }

    /// Returns the range on the given side.
    #[must_use]
    pub const fn span(&self, side: ChangeSide) -> TextSpan {
        match side {
            ChangeSide::Old => self.old,
            ChangeSide::New => self.new,
        }
    }

    pub(crate) fn span_mut(&mut self, side: ChangeSide) -> &mut TextSpan {
        match side {
            ChangeSide::Old => &mut self.old,
            ChangeSide::New => &mut self.new,
        }
    }

    /// Returns this part's text out of the side's full text.
    #[must_use]
    pub fn text<'a>(&self, side: ChangeSide, full_text: &'a str) -> &'a str {
        clamped_slice(full_text, self.span(side))
    }

    /// Checks if the two parts collide on the given side.
    #[must_use]
    pub const fn conflicts_with(&self, other: &Self, side: ChangeSide) -> bool {
        self.span(side).conflicts_with(&other.span(side))
    }
}

/// Slices `text` by `span`, cutting the span at the end of the text.
pub(crate) fn clamped_slice(text: &str, span: TextSpan) -> &str {
    let len = text.len();
    text.get(span.start.min(len)..span.end.min(len)).unwrap_or("")
}

/// Computes the word-level parts between the old and new text of a modified
/// region. `old_span`/`new_span` locate the region in the full texts;
/// `line_count` is the combined number of lines on both sides.
///
/// Regions with `line_count >= line_threshold` are tokenized by lines
/// instead of words to bound the cost of the token diff.
pub(crate) fn compute_line_parts(
    old_text: &str,
    new_text: &str,
    old_span: TextSpan,
    new_span: TextSpan,
    line_count: usize,
    line_threshold: usize,
) -> Vec<LinePartChangeDelta> {
    let old_region = clamped_slice(old_text, old_span);
    let new_region = clamped_slice(new_text, new_span);
    let tokenize: fn(&str) -> Vec<&str> = if line_count < line_threshold {
        split_words
    } else {
        split_lines
    };
    let (old_tokens, new_tokens) = (tokenize(old_region), tokenize(new_region));
    let old_offsets = token_offsets(&old_tokens, old_span.start);
    let new_offsets = token_offsets(&new_tokens, new_span.start);

    MyersDiff::new()
        .diff(&old_tokens, &new_tokens)
        .iter()
        .filter_map(|op| {
            let change_type = match op {
                DiffOp::Equal { .. } => return None,
                DiffOp::Insert { .. } => ChangeType::Add,
                DiffOp::Delete { .. } => ChangeType::Delete,
                DiffOp::Replace { .. } => ChangeType::Modify,
            };
            let (old_start, old_end) = op.old_range();
            let (new_start, new_end) = op.new_range();
            Some(LinePartChangeDelta::new(
                change_type,
                TextSpan::new(old_offsets[old_start], old_offsets[old_end]),
                TextSpan::new(new_offsets[new_start], new_offsets[new_end]),
            ))
        })
        .collect()
}

/// Absolute start offset of every token, plus the end of the last one.
fn token_offsets(tokens: &[&str], base: usize) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(tokens.len() + 1);
    offsets.push(base);
    for token in tokens {
        let last = offsets[offsets.len() - 1];
        offsets.push(last + token.len());
    }
    offsets
}
