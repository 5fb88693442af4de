//! Classification of overlapping changes from the two sides of a merge.

use serde::{Deserialize, Serialize};

use crate::delta::ChangeDelta;
use crate::domain::{ChangeSide, ChangeType, ConflictSide};

/// How two overlapping changes can both be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolveOption {
    /// Both sides made the identical change.
    Same,
    /// The change of side `by` contains the other change entirely.
    Enclosed {
        /// Side whose change encloses the other.
        by: ConflictSide,
    },
    /// The changes overlap by line but their word-level parts agree.
    WordBased,
}

/// Outcome of comparing two overlapping changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictType {
    /// The overlap can be resolved automatically.
    Resolvable(ResolveOption),
    /// The changes contradict each other.
    Conflicting,
}

impl ConflictType {
    /// Checks if the overlap needs a manual decision.
    #[must_use]
    pub const fn is_conflicting(&self) -> bool {
        matches!(self, Self::Conflicting)
    }
}

/// A pair of overlapping pending changes, one per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictPair {
    /// Delta index in the yours diff.
    pub yours: usize,
    /// Delta index in the theirs diff.
    pub theirs: usize,
    /// How the two changes relate.
    pub conflict_type: ConflictType,
}

/// One change with the new text its ranges index into.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SideChange<'a> {
    pub(crate) delta: &'a ChangeDelta,
    pub(crate) new_text: &'a str,
    pub(crate) side: ConflictSide,
}

impl SideChange<'_> {
    fn new_slice(&self) -> &str {
        self.delta.text(ChangeSide::New, self.new_text)
    }

    fn encloses(&self, other: &SideChange<'_>) -> bool {
        let (outer, inner) = (self.delta.range(ChangeSide::Old), other.delta.range(ChangeSide::Old));
        outer.start <= inner.start
            && inner.end <= outer.end
            && self.new_slice().contains(other.new_slice())
    }
}

/// Compares two changes over the same base. Returns `None` when their base
/// regions do not overlap.
pub(crate) fn classify(
    a: SideChange<'_>,
    b: SideChange<'_>,
    word_based: bool,
) -> Option<ConflictType> {
    if !a.delta.overlaps(b.delta) {
        return None;
    }
    if a.delta.is_same_change(a.new_text, b.delta, b.new_text) {
        return Some(ConflictType::Resolvable(ResolveOption::Same));
    }
    let deletes =
        a.delta.change_type() == ChangeType::Delete || b.delta.change_type() == ChangeType::Delete;
    if !deletes {
        if a.encloses(&b) {
            return Some(ConflictType::Resolvable(ResolveOption::Enclosed { by: a.side }));
        }
        if b.encloses(&a) {
            return Some(ConflictType::Resolvable(ResolveOption::Enclosed { by: b.side }));
        }
    }
    if word_based && words_agree(&a, &b) {
        return Some(ConflictType::Resolvable(ResolveOption::WordBased));
    }
    Some(ConflictType::Conflicting)
}

/// Both changes have line parts and every pair of parts touching the same
/// base words inserts the same text.
fn words_agree(a: &SideChange<'_>, b: &SideChange<'_>) -> bool {
    let (a_parts, b_parts) = (a.delta.line_parts(), b.delta.line_parts());
    if a_parts.is_empty() || b_parts.is_empty() {
        return false;
    }
    a_parts.iter().all(|a_part| {
        b_parts
            .iter()
            .filter(|b_part| a_part.conflicts_with(b_part, ChangeSide::Old))
            .all(|b_part| {
                a_part.text(ChangeSide::New, a.new_text) == b_part.text(ChangeSide::New, b.new_text)
            })
    })
}
