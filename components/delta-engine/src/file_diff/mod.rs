//! Two-way file diff with live edit reconciliation.
//!
//! A `FileDiff` owns both texts of a comparison and the delta list tiling
//! them. Callers accept or discard deltas and report every edit an editor
//! makes to the new text; the delta boundaries are kept consistent without
//! running the diff again.

mod apply;
mod reconcile;

pub(crate) use reconcile::EditMode;

use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::content::{LineEnding, normalize_line_endings};
use crate::delta::ChangeDelta;
use crate::diff::{DiffAlgorithm, line_edits};
use crate::domain::{ChangeSide, ChangeStatus, LineEdit};
use crate::error::{DiffError, Result};
use crate::event::DeltaTextChangeEvent;
use crate::header::FileDiffHeader;
use crate::line_index::build_deltas;

/// The old and new text of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SideTexts {
    old: String,
    new: String,
}

impl SideTexts {
    fn get(&self, side: ChangeSide) -> &str {
        match side {
            ChangeSide::Old => &self.old,
            ChangeSide::New => &self.new,
        }
    }

    fn get_mut(&mut self, side: ChangeSide) -> &mut String {
        match side {
            ChangeSide::Old => &mut self.old,
            ChangeSide::New => &mut self.new,
        }
    }
}

/// Ordered delta list for one old/new text pair.
///
/// Delta indices are document order and never change: deltas are mutated in
/// place, and a delta whose text is deleted collapses to zero width instead
/// of being removed.
#[derive(Debug, Clone)]
pub struct FileDiff {
    header: FileDiffHeader,
    edits: Vec<LineEdit>,
    config: EngineConfig,
    original: SideTexts,
    texts: SideTexts,
    initial_deltas: Vec<ChangeDelta>,
    deltas: Vec<ChangeDelta>,
    line_endings: (LineEnding, LineEnding),
}

impl FileDiff {
    /// Builds a diff from a line edit list with the default configuration.
    ///
    /// # Errors
    /// Returns `DiffError::InvalidEditList` if the edits do not fit the texts.
    pub fn new(
        header: FileDiffHeader,
        edits: Vec<LineEdit>,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(header, edits, old, new, EngineConfig::default())
    }

    /// Builds a diff from a line edit list.
    ///
    /// # Errors
    /// Returns `DiffError::InvalidEditList` if the edits do not fit the texts.
    pub fn with_config(
        header: FileDiffHeader,
        edits: Vec<LineEdit>,
        old: impl Into<String>,
        new: impl Into<String>,
        config: EngineConfig,
    ) -> Result<Self> {
        let original = SideTexts {
            old: old.into(),
            new: new.into(),
        };
        let deltas = build_deltas(&original.old, &original.new, &edits, &config)?;
        debug!(
            path = header.path(),
            deltas = deltas.len(),
            "Created file diff"
        );
        Ok(Self {
            header,
            edits,
            config,
            texts: original.clone(),
            original,
            initial_deltas: deltas.clone(),
            deltas,
            line_endings: (LineEnding::Unix, LineEnding::Unix),
        })
    }

    /// Diffs two texts line by line with `algorithm`.
    ///
    /// # Errors
    /// Returns `DiffError::InvalidEditList` if the algorithm produced an
    /// edit list that does not fit the texts.
    pub fn from_texts(
        header: FileDiffHeader,
        old: impl Into<String>,
        new: impl Into<String>,
        algorithm: &dyn DiffAlgorithm,
    ) -> Result<Self> {
        Self::from_texts_with_config(header, old, new, algorithm, EngineConfig::default())
    }

    /// Same as [`FileDiff::from_texts`] with an explicit configuration.
    ///
    /// # Errors
    /// Returns `DiffError::InvalidEditList` if the algorithm produced an
    /// edit list that does not fit the texts.
    pub fn from_texts_with_config(
        header: FileDiffHeader,
        old: impl Into<String>,
        new: impl Into<String>,
        algorithm: &dyn DiffAlgorithm,
        config: EngineConfig,
    ) -> Result<Self> {
        let (old, new) = (old.into(), new.into());
        let edits = line_edits(algorithm, &old, &new);
        Self::with_config(header, edits, old, new, config)
    }

    /// Diffs two raw file contents. Line endings are normalized to `\n` and the
    /// dominant ending of each side is remembered.
    ///
    /// # Errors
    /// Returns `DiffError::InvalidEditList` if the algorithm produced an
    /// edit list that does not fit the texts.
    pub fn from_raw(
        header: FileDiffHeader,
        old_raw: &str,
        new_raw: &str,
        algorithm: &dyn DiffAlgorithm,
        config: EngineConfig,
    ) -> Result<Self> {
        let mut diff = Self::from_texts_with_config(
            header,
            normalize_line_endings(old_raw),
            normalize_line_endings(new_raw),
            algorithm,
            config,
        )?;
        diff.line_endings = (LineEnding::detect(old_raw), LineEnding::detect(new_raw));
        Ok(diff)
    }

    /// Returns the file metadata.
    #[must_use]
    pub const fn header(&self) -> &FileDiffHeader {
        &self.header
    }

    /// Returns the line edits the deltas were built from.
    #[must_use]
    pub fn edits(&self) -> &[LineEdit] {
        &self.edits
    }

    /// Returns the configuration the diff was built with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the deltas in document order.
    #[must_use]
    pub fn change_deltas(&self) -> &[ChangeDelta] {
        &self.deltas
    }

    /// Returns the delta at `index`.
    ///
    /// # Errors
    /// Returns `DiffError::NoSuchDelta` if the index is out of range.
    pub fn delta(&self, index: usize) -> Result<&ChangeDelta> {
        self.deltas.get(index).ok_or(DiffError::NoSuchDelta(index))
    }

    /// Returns the current text of a side.
    #[must_use]
    pub fn text(&self, side: ChangeSide) -> &str {
        self.texts.get(side)
    }

    /// Returns the text of a side as it was when the diff was built.
    #[must_use]
    pub fn original_text(&self, side: ChangeSide) -> &str {
        self.original.get(side)
    }

    /// Returns the text of one delta on a side.
    ///
    /// # Errors
    /// Returns `DiffError::NoSuchDelta` if the index is out of range.
    pub fn delta_text(&self, index: usize, side: ChangeSide) -> Result<&str> {
        Ok(self.delta(index)?.text(side, self.texts.get(side)))
    }

    /// Returns the dominant line ending of a side's raw content.
    #[must_use]
    pub const fn line_ending(&self, side: ChangeSide) -> LineEnding {
        match side {
            ChangeSide::Old => self.line_endings.0,
            ChangeSide::New => self.line_endings.1,
        }
    }

    /// Reverts the delta's region of the new text to the old text and marks
    /// the delta accepted. Later deltas move by the size difference.
    ///
    /// Returns the replacements performed on the new text, so an editor
    /// showing it can mirror them.
    ///
    /// # Errors
    /// Returns `DiffError::InvalidState` unless the delta is a pending change.
    #[instrument(skip(self))]
    pub fn accept_delta(&mut self, index: usize) -> Result<Vec<DeltaTextChangeEvent>> {
        self.apply(index, ChangeSide::New, false)
    }

    /// Marks a pending change discarded. No text changes.
    ///
    /// # Errors
    /// Returns `DiffError::InvalidState` unless the delta is a pending change.
    #[instrument(skip(self))]
    pub fn discard_delta(&mut self, index: usize) -> Result<()> {
        self.decide(index, ChangeStatus::Discarded)
    }

    /// Declines a pending change. Same as [`FileDiff::discard_delta`].
    ///
    /// # Errors
    /// Returns `DiffError::InvalidState` unless the delta is a pending change.
    pub fn revert_delta(&mut self, index: usize) -> Result<()> {
        self.discard_delta(index)
    }

    /// Reconciles the deltas with an edit the editor made to the new text:
    /// `length` bytes at `offset` were replaced by `text`. The edit is applied
    /// to the new text as well.
    ///
    /// # Errors
    /// Returns `DiffError::BadLocation` if the replaced region is outside the
    /// new text or splits a character. Nothing changes in that case.
    #[instrument(skip(self, text), fields(inserted = text.map_or(0, str::len)))]
    pub fn process_text_event(
        &mut self,
        offset: usize,
        length: usize,
        text: Option<&str>,
    ) -> Result<()> {
        self.process(
            ChangeSide::New,
            offset,
            length,
            text.unwrap_or_default(),
            EditMode::Live,
        )
    }

    /// Restores both texts and every delta to their state at construction.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.texts = self.original.clone();
        self.deltas = self.initial_deltas.clone();
        debug!(deltas = self.deltas.len(), "Reset file diff");
    }

    /// Moves a pending change to a decided status without touching text.
    pub(crate) fn decide(&mut self, index: usize, status: ChangeStatus) -> Result<()> {
        let delta = self
            .deltas
            .get_mut(index)
            .ok_or(DiffError::NoSuchDelta(index))?;
        if !delta.is_change() {
            return Err(DiffError::InvalidState {
                index,
                status: delta.status(),
            });
        }
        delta.transition(status, index)?;
        debug!(index, ?status, "Decided delta");
        Ok(())
    }
}

/// Converts a length to a signed offset for shifting.
pub(crate) fn signed(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

/// Number of line terminators in `text`.
pub(crate) fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|byte| *byte == b'\n').count()
}
