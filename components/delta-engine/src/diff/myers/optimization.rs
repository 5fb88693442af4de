//! Myers diff algorithm optimizations.
//!
//! This module provides optimization functions for post-processing diff results.

use crate::diff::DiffOp;

/// Coalesces adjacent change operations.
///
/// Two changes that touch on both sides (the first ends where the second
/// starts in the old and in the new sequence) describe one changed region,
/// so they are folded into a single Insert, Delete or Replace. An Insert
/// directly followed by a Delete becomes a Replace this way.
pub(crate) fn coalesce_operations(ops: &mut Vec<DiffOp>) {
    if ops.len() < 2 {
        return;
    }

    let mut i = 0;
    while i < ops.len().saturating_sub(1) {
        let (first, second) = (&ops[i], &ops[i + 1]);
        if first.is_change()
            && second.is_change()
            && first.old_range().1 == second.old_range().0
            && first.new_range().1 == second.new_range().0
        {
            let old = (first.old_range().0, second.old_range().1);
            let new = (first.new_range().0, second.new_range().1);
            if let Some(merged) = DiffOp::change(old, new) {
                ops[i] = merged;
                ops.remove(i + 1);
                continue;
            }
        }

        i += 1;
    }
}
