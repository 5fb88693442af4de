//! Keeping delta boundaries consistent with text edits.
//!
//! An edit replaces `length` bytes at `offset` with new text. It is split
//! into a deletion phase, which shrinks or moves every delta the removed
//! bytes touch, and an insertion phase, which grows exactly one delta by the
//! inserted text. Line parts are remapped afterwards in one pass.

use tracing::debug;

use super::{FileDiff, count_newlines, signed};
use crate::domain::ChangeSide;
use crate::error::Result;
use crate::event::check_location;
use crate::line_part::{TextSpan, clamped_slice};

/// Who made an edit, which decides how touched deltas are invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditMode {
    /// A user typed into the text. Every touched change becomes undefined.
    Live,
    /// An edit forwarded from the sibling diff of a merge. Pending changes
    /// whose line parts the edit does not hit stay pending.
    Merge,
    /// An edit forwarded from a change taken over conflicting changes of this
    /// diff. Touched deltas keep their status.
    Override,
    /// Text appended after an accepted change of the sibling diff. A pure
    /// insertion at a delta boundary joins the delta ending there.
    Append,
}

impl FileDiff {
    /// Applies an edit to `side` and reconciles every delta with it.
    pub(crate) fn process(
        &mut self,
        side: ChangeSide,
        offset: usize,
        length: usize,
        inserted: &str,
        mode: EditMode,
    ) -> Result<()> {
        check_location(self.texts.get(side), offset, length)?;

        let edit_end = offset + length;
        let edit = TextSpan::new(offset, edit_end);
        let inserted_len = inserted.len();
        let inserted_lines = count_newlines(inserted);
        let compatible: Vec<bool> = self
            .deltas
            .iter()
            .map(|delta| {
                delta.is_change()
                    && !delta.line_parts().is_empty()
                    && delta
                        .line_parts()
                        .iter()
                        .all(|part| !part.span(side).conflicts_with(&edit))
            })
            .collect();
        let mut touched = vec![false; self.deltas.len()];
        let mut affected = None;

        if length > 0 {
            let text = self.texts.get(side);
            let removed_lines = count_newlines(clamped_slice(text, edit));
            for (index, delta) in self.deltas.iter_mut().enumerate() {
                let range = delta.range_mut(side);
                if range.end <= offset {
                    continue;
                }
                if range.start >= edit_end {
                    range.shift(-signed(removed_lines), -signed(length));
                    continue;
                }
                let before = count_newlines(clamped_slice(text, TextSpan::new(offset, range.start)));
                let inside = count_newlines(clamped_slice(
                    text,
                    TextSpan::new(range.start.max(offset), range.end.min(edit_end)),
                ));
                range.start_line -= before;
                range.end_line -= before + inside;
                range.start = range.start.min(offset);
                range.end = if range.end > edit_end {
                    range.end - length
                } else {
                    offset
                };
                if range.start == range.end {
                    range.end_line = range.start_line;
                }
                touched[index] = true;
                affected = Some(index);
            }
        }

        if inserted_len > 0 && !self.deltas.is_empty() {
            let mut target = self
                .deltas
                .iter()
                .enumerate()
                .position(|(index, delta)| {
                    let end = delta.end_index(side);
                    offset < end || (affected == Some(index) && offset == end)
                })
                .unwrap_or(self.deltas.len() - 1);

            let snap_back = match mode {
                EditMode::Merge => self.deltas[target].is_pending_change(),
                EditMode::Append => true,
                EditMode::Live | EditMode::Override => false,
            };
            if snap_back && length == 0 && offset == self.deltas[target].start_index(side) {
                let mut candidate = target;
                while candidate > 0 && self.deltas[candidate - 1].end_index(side) == offset {
                    candidate -= 1;
                    if mode == EditMode::Append || !self.deltas[candidate].is_pending_change() {
                        target = candidate;
                        break;
                    }
                }
            }

            let grown = self.deltas[target].range_mut(side);
            grown.end += inserted_len;
            grown.end_line += inserted_lines;
            touched[target] = true;
            for later in self.deltas.iter_mut().skip(target + 1) {
                later
                    .range_mut(side)
                    .shift(signed(inserted_lines), signed(inserted_len));
            }
        }

        for delta in &mut self.deltas {
            for part in delta.line_parts_mut() {
                let span = part.span_mut(side);
                *span = map_span(*span, edit, inserted_len);
            }
        }

        for (index, delta) in self.deltas.iter_mut().enumerate() {
            if !touched[index] {
                continue;
            }
            match mode {
                EditMode::Live if delta.is_change() => delta.invalidate(),
                EditMode::Merge | EditMode::Append
                    if delta.is_pending_change() && !compatible[index] =>
                {
                    delta.invalidate();
                }
                EditMode::Live | EditMode::Merge | EditMode::Append | EditMode::Override => {}
            }
        }

        self.texts
            .get_mut(side)
            .replace_range(offset..edit_end, inserted);
        debug!(
            ?side,
            offset,
            length,
            inserted = inserted_len,
            ?mode,
            touched = touched.iter().filter(|hit| **hit).count(),
            "Reconciled text edit"
        );
        Ok(())
    }
}

/// Maps a line part span through an edit that replaced `edit` with
/// `inserted` bytes. Positions inside the removed region collapse to its
/// start; a non-empty span reaching into it keeps the inserted text.
fn map_span(span: TextSpan, edit: TextSpan, inserted: usize) -> TextSpan {
    let map_point = |point: usize| {
        if point < edit.start {
            point
        } else if point >= edit.end {
            point - edit.len() + inserted
        } else {
            edit.start
        }
    };
    let start = map_point(span.start);
    if span.is_empty() {
        return TextSpan::new(start, start);
    }
    let end = if span.end <= edit.start {
        span.end
    } else if span.end >= edit.end {
        span.end - edit.len() + inserted
    } else {
        edit.start + inserted
    };
    TextSpan::new(start, end)
}
