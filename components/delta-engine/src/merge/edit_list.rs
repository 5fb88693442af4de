//! Aligning the edit lists of a merge before deltas are built.
//!
//! When the two sides edit overlapping base lines, both edits are widened to
//! the union of their base ranges. The deltas built from the adjusted lists
//! then line up one to one on the base, which keeps the conflict pairs
//! simple.

use tracing::trace;

use crate::domain::LineEdit;

/// Widens every pair of edits that overlap on the base and then folds
/// adjacent edits within each list together.
pub fn adjust_edit_list_for_merge(yours: &mut Vec<LineEdit>, theirs: &mut Vec<LineEdit>) {
    for main in 0..yours.len() {
        for other in 0..theirs.len() {
            if overlaps(&yours[main], &theirs[other]) {
                yours[main] = widen(&yours[main], &theirs[other]);
                theirs[other] = widen(&theirs[other], &yours[main]);
            }
        }
    }
    compress(yours);
    compress(theirs);
    trace!(
        yours = yours.len(),
        theirs = theirs.len(),
        "Adjusted edit lists for merge"
    );
}

/// Base-side overlap. Edits covering the identical base range are left alone.
fn overlaps(edit: &LineEdit, other: &LineEdit) -> bool {
    if other.old_start == edit.old_start && other.old_end == edit.old_end {
        return false;
    }
    if other.old_end < edit.old_start {
        return false;
    }
    if other.old_end <= edit.old_end {
        return true;
    }
    other.old_start <= edit.old_end
}

/// Stretches `edit` over the base range of `other`, moving its new-side
/// bounds by the same number of lines.
fn widen(edit: &LineEdit, other: &LineEdit) -> LineEdit {
    let old_start = edit.old_start.min(other.old_start);
    let old_end = edit.old_end.max(other.old_end);
    LineEdit::new(
        old_start,
        old_end,
        edit.new_start.saturating_sub(edit.old_start - old_start),
        edit.new_end + (old_end - edit.old_end),
    )
}

fn compress(edits: &mut Vec<LineEdit>) {
    let mut index = 0;
    while index + 1 < edits.len() {
        let (current, next) = (edits[index], edits[index + 1]);
        if current.old_end >= next.old_start || current.new_end >= next.new_start {
            edits[index] = LineEdit::new(
                current.old_start,
                next.old_end,
                current.new_start,
                next.new_end,
            );
            edits.remove(index + 1);
        } else {
            index += 1;
        }
    }
}
