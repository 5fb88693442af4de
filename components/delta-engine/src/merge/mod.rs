//! Three-way merge on top of two file diffs sharing a base.
//!
//! `yours` and `theirs` each diff the common base (their old side) against
//! one side's version. Accepting a change writes it into that diff's base and
//! forwards the resulting edits to the sibling, so both bases always hold the
//! same text. Overlapping changes from the two sides are classified first;
//! only resolvable overlaps may be accepted, unless a change is explicitly
//! taken over its conflicting counterparts. Accepting one of those
//! counterparts afterwards appends its text after the change taken first.

mod conflict;
mod edit_list;

pub use conflict::{ConflictPair, ConflictType, ResolveOption};
pub use edit_list::adjust_edit_list_for_merge;

use tracing::{debug, instrument, warn};

use crate::config::EngineConfig;
use crate::diff::{DiffAlgorithm, line_edits};
use crate::domain::{ChangeSide, ConflictSide};
use crate::error::{DiffError, Result};
use crate::event::check_location;
use crate::file_diff::{EditMode, FileDiff};
use crate::header::FileDiffHeader;
use conflict::{SideChange, classify};

/// The two diffs of a merge and the operations that keep them in step.
#[derive(Debug, Clone)]
pub struct MergeData {
    yours: FileDiff,
    theirs: FileDiff,
    /// Pending changes whose conflicting counterpart was taken into the base.
    outvoted: Vec<(ConflictSide, usize)>,
}

impl MergeData {
    /// Pairs two diffs of the same base.
    ///
    /// # Errors
    /// Returns `DiffError::BaseMismatch` if the old texts differ.
    pub fn new(yours: FileDiff, theirs: FileDiff) -> Result<Self> {
        let (yours_base, theirs_base) = (yours.text(ChangeSide::Old), theirs.text(ChangeSide::Old));
        if yours_base != theirs_base {
            return Err(DiffError::BaseMismatch {
                yours_len: yours_base.len(),
                theirs_len: theirs_base.len(),
            });
        }
        Ok(Self {
            yours,
            theirs,
            outvoted: Vec::new(),
        })
    }

    /// Diffs both versions against `base`, aligning the edit lists so
    /// overlapping edits cover the same base lines.
    ///
    /// # Errors
    /// Returns `DiffError::InvalidEditList` if the algorithm produced edits
    /// that do not fit the texts.
    pub fn from_texts(
        headers: (FileDiffHeader, FileDiffHeader),
        base: &str,
        yours: &str,
        theirs: &str,
        algorithm: &dyn DiffAlgorithm,
        config: &EngineConfig,
    ) -> Result<Self> {
        let mut yours_edits = line_edits(algorithm, base, yours);
        let mut theirs_edits = line_edits(algorithm, base, theirs);
        adjust_edit_list_for_merge(&mut yours_edits, &mut theirs_edits);
        let (yours_header, theirs_header) = headers;
        Self::new(
            FileDiff::with_config(yours_header, yours_edits, base, yours, config.clone())?,
            FileDiff::with_config(theirs_header, theirs_edits, base, theirs, config.clone())?,
        )
    }

    /// Returns the diff of one side.
    #[must_use]
    pub const fn diff(&self, side: ConflictSide) -> &FileDiff {
        match side {
            ConflictSide::Yours => &self.yours,
            ConflictSide::Theirs => &self.theirs,
        }
    }

    const fn diff_mut(&mut self, side: ConflictSide) -> &mut FileDiff {
        match side {
            ConflictSide::Yours => &mut self.yours,
            ConflictSide::Theirs => &mut self.theirs,
        }
    }

    /// Returns the merged text built so far.
    #[must_use]
    pub fn merged_text(&self) -> &str {
        self.yours.text(ChangeSide::Old)
    }

    /// Takes a change of one side into the merged text.
    ///
    /// Either the whole operation succeeds or nothing changes.
    ///
    /// # Errors
    /// - `DiffError::InvalidState` unless the delta is a pending change.
    /// - `DiffError::Conflict` if it overlaps a pending change of the other
    ///   side that cannot be resolved automatically.
    #[instrument(skip(self))]
    pub fn accept_delta(&mut self, index: usize, side: ConflictSide) -> Result<()> {
        let snapshot = self.clone();
        let result = self.accept_inner(index, side);
        if let Err(err) = &result {
            warn!(index, ?side, error = %err, "Accept failed, restoring merge state");
            *self = snapshot;
        }
        result
    }

    /// Takes a change into the merged text even though it conflicts with
    /// pending changes of the other side. Those stay pending; accepting one
    /// of them later inserts its text right after this change instead of
    /// replacing it. Without conflicts this is the same as `accept_delta`.
    ///
    /// Either the whole operation succeeds or nothing changes.
    ///
    /// # Errors
    /// Returns `DiffError::InvalidState` unless the delta is a pending change.
    #[instrument(skip(self))]
    pub fn accept_conflicting_delta(&mut self, index: usize, side: ConflictSide) -> Result<()> {
        let snapshot = self.clone();
        let result = self.take_over(index, side);
        if let Err(err) = &result {
            warn!(index, ?side, error = %err, "Accept failed, restoring merge state");
            *self = snapshot;
        }
        result
    }

    fn take_over(&mut self, index: usize, side: ConflictSide) -> Result<()> {
        self.ensure_pending(index, side)?;
        let conflicting: Vec<usize> = self
            .pending_overlaps(index, side)?
            .into_iter()
            .filter(|(_, kind)| kind.is_conflicting())
            .map(|(other_index, _)| other_index)
            .collect();
        if conflicting.is_empty() {
            return self.accept_inner(index, side);
        }

        let word_based = self.diff(side).config().word_based_merge;
        let other = side.other();
        let events = self.diff_mut(side).apply(index, ChangeSide::Old, word_based)?;
        for event in &events {
            self.diff_mut(other).process(
                ChangeSide::Old,
                event.offset,
                event.length,
                &event.text,
                EditMode::Override,
            )?;
        }
        debug!(index, ?side, outvoted = ?conflicting, "Took change over conflicting ones");
        self.outvoted
            .extend(conflicting.into_iter().map(|other_index| (other, other_index)));
        Ok(())
    }

    fn ensure_pending(&self, index: usize, side: ConflictSide) -> Result<()> {
        let delta = self.diff(side).delta(index)?;
        if delta.is_pending_change() {
            Ok(())
        } else {
            Err(DiffError::InvalidState {
                index,
                status: delta.status(),
            })
        }
    }

    fn accept_inner(&mut self, index: usize, side: ConflictSide) -> Result<()> {
        let word_based = self.diff(side).config().word_based_merge;
        self.ensure_pending(index, side)?;

        if let Some(position) = self.outvoted.iter().position(|entry| *entry == (side, index)) {
            self.outvoted.swap_remove(position);
            let event = self.diff_mut(side).append(index, ChangeSide::Old)?;
            self.diff_mut(side.other()).process(
                ChangeSide::Old,
                event.offset,
                event.length,
                &event.text,
                EditMode::Append,
            )?;
            debug!(index, ?side, offset = event.offset, "Appended change after the accepted one");
            return Ok(());
        }

        let overlaps = self.pending_overlaps(index, side)?;
        if let Some((other_index, _)) = overlaps.iter().find(|(_, kind)| kind.is_conflicting()) {
            return Err(DiffError::Conflict {
                side,
                index,
                other_index: *other_index,
            });
        }

        let other = side.other();
        for (other_index, kind) in &overlaps {
            match kind {
                ConflictType::Resolvable(ResolveOption::Enclosed { by }) if *by == other => {
                    debug!(index, other_index, "Change enclosed by the other side");
                    self.diff_mut(side).mark_accepted(index)?;
                    return self.accept_inner(*other_index, other);
                }
                ConflictType::Resolvable(ResolveOption::Same) => {
                    self.diff_mut(side).apply(index, ChangeSide::Old, word_based)?;
                    self.diff_mut(other)
                        .apply(*other_index, ChangeSide::Old, word_based)?;
                    debug!(index, other_index, "Accepted identical change on both sides");
                    return Ok(());
                }
                ConflictType::Resolvable(ResolveOption::Enclosed { .. }) => {
                    self.diff_mut(other).mark_accepted(*other_index)?;
                }
                ConflictType::Resolvable(ResolveOption::WordBased) | ConflictType::Conflicting => {}
            }
        }

        let events = self.diff_mut(side).apply(index, ChangeSide::Old, word_based)?;
        for event in &events {
            self.diff_mut(other).process(
                ChangeSide::Old,
                event.offset,
                event.length,
                &event.text,
                EditMode::Merge,
            )?;
        }
        debug!(index, ?side, forwarded = events.len(), "Accepted change");
        Ok(())
    }

    /// Overlapping pending changes of the other side, with their relation
    /// to the delta at `index` of `side`.
    fn pending_overlaps(
        &self,
        index: usize,
        side: ConflictSide,
    ) -> Result<Vec<(usize, ConflictType)>> {
        let word_based = self.diff(side).config().word_based_merge;
        let ours = self.side_change(side, index)?;
        let sibling = self.diff(side.other());
        Ok(sibling
            .change_deltas()
            .iter()
            .enumerate()
            .filter(|(_, delta)| delta.is_pending_change())
            .filter_map(|(other_index, delta)| {
                let theirs = SideChange {
                    delta,
                    new_text: sibling.text(ChangeSide::New),
                    side: side.other(),
                };
                classify(ours, theirs, word_based).map(|kind| (other_index, kind))
            })
            .collect())
    }

    fn side_change(&self, side: ConflictSide, index: usize) -> Result<SideChange<'_>> {
        let diff = self.diff(side);
        Ok(SideChange {
            delta: diff.delta(index)?,
            new_text: diff.text(ChangeSide::New),
            side,
        })
    }

    /// Declines a change of one side. The merged text is not touched.
    ///
    /// # Errors
    /// Returns `DiffError::InvalidState` unless the delta is a pending change.
    #[instrument(skip(self))]
    pub fn discard_change(&mut self, index: usize, side: ConflictSide) -> Result<()> {
        self.diff_mut(side).discard_delta(index)
    }

    /// Reconciles both diffs with a manual edit of the merged text: `length`
    /// bytes at `offset` were replaced by `text`.
    ///
    /// # Errors
    /// Returns `DiffError::BadLocation` if the region is outside the merged
    /// text or splits a character. Nothing changes in that case.
    #[instrument(skip(self, text), fields(inserted = text.map_or(0, str::len)))]
    pub fn modify_text(&mut self, text: Option<&str>, length: usize, offset: usize) -> Result<()> {
        check_location(self.yours.text(ChangeSide::Old), offset, length)?;
        check_location(self.theirs.text(ChangeSide::Old), offset, length)?;
        let inserted = text.unwrap_or_default();
        self.yours
            .process(ChangeSide::Old, offset, length, inserted, EditMode::Live)?;
        self.theirs
            .process(ChangeSide::Old, offset, length, inserted, EditMode::Live)
    }

    /// Restores both diffs to their initial state.
    pub fn reset(&mut self) {
        self.yours.reset();
        self.theirs.reset();
        self.outvoted.clear();
    }

    /// Checks if delta `index` of `side` and delta `other_index` of the other
    /// side need a manual decision. Identical changes never conflict.
    #[must_use]
    pub fn is_conflicting_with(&self, index: usize, side: ConflictSide, other_index: usize) -> bool {
        let (Ok(ours), Ok(theirs)) = (
            self.side_change(side, index),
            self.side_change(side.other(), other_index),
        ) else {
            return false;
        };
        if !ours.delta.is_change() || !theirs.delta.is_change() {
            return false;
        }
        let word_based = self.diff(side).config().word_based_merge;
        classify(ours, theirs, word_based).is_some_and(|kind| kind.is_conflicting())
    }

    /// Every pair of overlapping pending changes, in yours order.
    #[must_use]
    pub fn conflicts(&self) -> Vec<ConflictPair> {
        let word_based = self.yours.config().word_based_merge;
        let mut pairs = Vec::new();
        for (yours, delta) in self.yours.change_deltas().iter().enumerate() {
            if !delta.is_pending_change() {
                continue;
            }
            let ours = SideChange {
                delta,
                new_text: self.yours.text(ChangeSide::New),
                side: ConflictSide::Yours,
            };
            for (theirs, other) in self.theirs.change_deltas().iter().enumerate() {
                if !other.is_pending_change() {
                    continue;
                }
                let sibling = SideChange {
                    delta: other,
                    new_text: self.theirs.text(ChangeSide::New),
                    side: ConflictSide::Theirs,
                };
                if let Some(conflict_type) = classify(ours, sibling, word_based) {
                    pairs.push(ConflictPair {
                        yours,
                        theirs,
                        conflict_type,
                    });
                }
            }
        }
        pairs
    }

    /// The first overlap involving delta `index` of `side`, if any.
    #[must_use]
    pub fn conflict_pair(&self, index: usize, side: ConflictSide) -> Option<ConflictPair> {
        self.conflicts().into_iter().find(|pair| match side {
            ConflictSide::Yours => pair.yours == index,
            ConflictSide::Theirs => pair.theirs == index,
        })
    }

    /// Path to show for the merged file, taking renames on either side into
    /// account.
    #[must_use]
    pub fn file_path(&self) -> &str {
        let (yours, theirs) = (self.yours.header(), self.theirs.header());
        match (yours.is_rename(), theirs.is_rename()) {
            (false, _) => yours.path(),
            (true, false) => theirs.path(),
            (true, true) => {
                let theirs_old = theirs.file_path(ChangeSide::Old);
                if yours.file_path(ChangeSide::Old) == theirs_old {
                    theirs_old
                } else {
                    theirs.file_path(ChangeSide::New)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::MyersDiff;
    use crate::domain::{ChangeStatus, LineEdit};
    use crate::header::{FileChangeType, FileType};

    const BASE: &str = "Hello there, this is a test\nSo here are some words\nNo use taking a rest\nWe're not creating any turds";
    const YOURS: &str = "Hello there, this is a test\nSo here are a few words\nNo use taking a rest\nWe are not creating any turds";
    const THEIRS: &str = "Hello there, this is a test\nSo here are some random words\nNo use taking a break\nWe're not creating any shit";

    fn build(base: &str, yours: &str, theirs: &str) -> MergeData {
        MergeData::from_texts(
            (FileDiffHeader::modified("filea"), FileDiffHeader::modified("filea")),
            base,
            yours,
            theirs,
            &MyersDiff::new(),
            &EngineConfig::default(),
        )
        .unwrap()
    }

    fn assert_bases_agree(merge: &MergeData) {
        assert_eq!(
            merge.diff(ConflictSide::Yours).text(ChangeSide::Old),
            merge.diff(ConflictSide::Theirs).text(ChangeSide::Old)
        );
    }

    #[test]
    fn edit_lists_of_overlapping_changes_are_aligned() {
        let algorithm = MyersDiff::new();
        let mut yours = line_edits(&algorithm, BASE, YOURS);
        let mut theirs = line_edits(&algorithm, BASE, THEIRS);
        adjust_edit_list_for_merge(&mut yours, &mut theirs);
        assert_eq!(yours, vec![LineEdit::new(1, 4, 1, 4)]);
        assert_eq!(theirs, vec![LineEdit::new(1, 4, 1, 4)]);
    }

    #[test]
    fn word_compatible_changes_merge() {
        let mut merge = build(BASE, YOURS, THEIRS);
        let pair = merge.conflict_pair(1, ConflictSide::Yours).unwrap();
        assert_eq!(
            pair.conflict_type,
            ConflictType::Resolvable(ResolveOption::WordBased)
        );
        assert!(!merge.is_conflicting_with(1, ConflictSide::Yours, 1));

        merge.accept_delta(1, ConflictSide::Yours).unwrap();
        assert_bases_agree(&merge);
        assert_eq!(
            merge.diff(ConflictSide::Theirs).delta(1).unwrap().status(),
            ChangeStatus::Pending
        );

        merge.accept_delta(1, ConflictSide::Theirs).unwrap();
        assert_bases_agree(&merge);
        assert_eq!(
            merge.merged_text(),
            "Hello there, this is a test\nSo here are a few random words\nNo use taking a break\nWe are not creating any shit"
        );
    }

    #[test]
    fn conflicting_changes_are_rejected_without_side_effects() {
        let mut merge = build("a\nb\nc\n", "a\nX\nc\n", "a\nY\nc\n");
        assert!(merge.is_conflicting_with(1, ConflictSide::Yours, 1));
        assert!(merge.is_conflicting_with(1, ConflictSide::Theirs, 1));
        let err = merge.accept_delta(1, ConflictSide::Yours).unwrap_err();
        assert!(matches!(
            err,
            DiffError::Conflict {
                side: ConflictSide::Yours,
                index: 1,
                other_index: 1
            }
        ));
        assert_eq!(merge.merged_text(), "a\nb\nc\n");
        assert_eq!(
            merge.diff(ConflictSide::Yours).delta(1).unwrap().status(),
            ChangeStatus::Pending
        );

        merge.discard_change(1, ConflictSide::Theirs).unwrap();
        assert!(merge.conflicts().is_empty());
        merge.accept_delta(1, ConflictSide::Yours).unwrap();
        assert_eq!(merge.merged_text(), "a\nX\nc\n");
    }

    #[test]
    fn identical_changes_are_taken_once() {
        let mut merge = build("a\nb\nc\n", "a\nX\nc\n", "a\nX\nc\n");
        assert!(!merge.is_conflicting_with(1, ConflictSide::Yours, 1));
        merge.accept_delta(1, ConflictSide::Theirs).unwrap();
        assert_eq!(merge.merged_text(), "a\nX\nc\n");
        assert_bases_agree(&merge);
        for side in [ConflictSide::Yours, ConflictSide::Theirs] {
            assert_eq!(
                merge.diff(side).delta(1).unwrap().status(),
                ChangeStatus::Accepted
            );
        }
    }

    #[test]
    fn enclosed_change_takes_the_enclosing_one() {
        let mut merge = build("a\nb c\nd\n", "a\nB\nd\n", "a\nB\nextra\nd\n");
        assert_eq!(
            merge.conflict_pair(1, ConflictSide::Theirs).map(|pair| pair.conflict_type),
            Some(ConflictType::Resolvable(ResolveOption::Enclosed {
                by: ConflictSide::Theirs
            }))
        );
        merge.accept_delta(1, ConflictSide::Yours).unwrap();
        assert_eq!(merge.merged_text(), "a\nB\nextra\nd\n");
        assert_bases_agree(&merge);
        assert_eq!(
            merge.diff(ConflictSide::Theirs).delta(1).unwrap().status(),
            ChangeStatus::Accepted
        );
    }

    #[test]
    fn accept_requires_pending_change() {
        let mut merge = build("a\nb\nc\n", "a\nX\nc\n", "a\nb\nc\nd\n");
        assert!(matches!(
            merge.accept_delta(0, ConflictSide::Yours),
            Err(DiffError::InvalidState { index: 0, .. })
        ));
        assert!(matches!(
            merge.accept_delta(7, ConflictSide::Yours),
            Err(DiffError::NoSuchDelta(7))
        ));
    }

    #[test]
    fn modify_text_edits_both_bases() {
        let mut merge = build(BASE, YOURS, THEIRS);
        merge.modify_text(Some("Howdy"), 5, 0).unwrap();
        assert!(merge.merged_text().starts_with("Howdy there"));
        assert_bases_agree(&merge);
        assert!(merge.modify_text(None, 10, merge.merged_text().len()).is_err());

        merge.reset();
        assert_eq!(merge.merged_text(), BASE);
        assert_bases_agree(&merge);
    }

    #[test]
    fn mismatched_bases_are_rejected() {
        let header = FileDiffHeader::modified("f");
        let yours = FileDiff::new(header.clone(), Vec::new(), "a\n", "a\n").unwrap();
        let theirs = FileDiff::new(header, Vec::new(), "b\n", "b\n").unwrap();
        assert!(matches!(
            MergeData::new(yours, theirs),
            Err(DiffError::BaseMismatch { .. })
        ));
    }

    #[test]
    fn file_path_follows_renames() {
        let diff = |old: &str, new: &str, change_type| {
            FileDiff::new(
                FileDiffHeader::new(old, new, change_type, FileType::File),
                Vec::new(),
                "",
                "",
            )
            .unwrap()
        };
        let modified = || diff("a.txt", "a.txt", FileChangeType::Modify);
        let renamed = |new: &str| diff("a.txt", new, FileChangeType::Rename);

        let merge = MergeData::new(modified(), renamed("b.txt")).unwrap();
        assert_eq!(merge.file_path(), "a.txt");
        let merge = MergeData::new(renamed("b.txt"), modified()).unwrap();
        assert_eq!(merge.file_path(), "a.txt");
        let merge = MergeData::new(renamed("b.txt"), renamed("c.txt")).unwrap();
        assert_eq!(merge.file_path(), "a.txt");
        let moved = diff("z.txt", "c.txt", FileChangeType::Rename);
        let merge = MergeData::new(renamed("b.txt"), moved).unwrap();
        assert_eq!(merge.file_path(), "c.txt");
    }
}
