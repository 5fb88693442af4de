//! Writing a delta's text from one side onto the other.

use tracing::debug;

use super::{FileDiff, signed};
use crate::domain::{ChangeSide, ChangeStatus};
use crate::error::{DiffError, Result};
use crate::event::{DeltaTextChangeEvent, check_location};
use crate::line_index::line_span;
use crate::line_part::{TextSpan, clamped_slice};

impl FileDiff {
    /// Overwrites the delta's region of `target` with the region of the other
    /// side and marks the delta accepted.
    ///
    /// With `word_based` set and line parts present, only the changed words
    /// are replaced; otherwise the whole region is. A region that starts past
    /// the end of `target` (after a missing final newline) is appended on a
    /// new line.
    pub(crate) fn apply(
        &mut self,
        index: usize,
        target: ChangeSide,
        word_based: bool,
    ) -> Result<Vec<DeltaTextChangeEvent>> {
        let delta = self.delta(index)?;
        if !delta.is_change() {
            return Err(DiffError::InvalidState {
                index,
                status: delta.status(),
            });
        }
        delta
            .status()
            .validate_transition(&ChangeStatus::Accepted, index)?;

        let source = target.other();
        let source_text = self.texts.get(source);
        let range = *delta.range(target);
        let replacements: Vec<(TextSpan, String)> = if word_based && !delta.line_parts().is_empty()
        {
            delta
                .line_parts()
                .iter()
                .map(|part| (part.span(target), part.text(source, source_text).to_owned()))
                .collect()
        } else {
            vec![(range.span(), delta.text(source, source_text).to_owned())]
        };
        let whole = replacements.len() == 1 && replacements[0].0 == range.span();

        let text = self.texts.get_mut(target);
        let mut events = Vec::with_capacity(replacements.len());
        let mut drift: isize = 0;
        let new_end;
        if whole && range.start > text.len() {
            let appended = format!("\n{}", replacements[0].1);
            events.push(DeltaTextChangeEvent::new(target, text.len(), 0, appended.as_str()));
            text.push_str(&appended);
            drift = signed(appended.len());
            new_end = range.start + replacements[0].1.len();
        } else {
            for (span, _) in &replacements {
                let end = if whole { span.end.min(text.len()) } else { span.end };
                check_location(text, span.start, end.saturating_sub(span.start))?;
            }
            for (span, replacement) in &replacements {
                let end = if whole { span.end.min(text.len()) } else { span.end };
                let start = span.start.saturating_add_signed(drift);
                let length = end.saturating_sub(span.start);
                text.replace_range(start..start + length, replacement);
                events.push(DeltaTextChangeEvent::new(
                    target,
                    start,
                    length,
                    replacement.as_str(),
                ));
                drift += signed(replacement.len()) - signed(length);
            }
            new_end = if whole {
                range.start + replacements[0].1.len()
            } else {
                range.end.saturating_add_signed(drift)
            };
        }

        self.settle_accepted(index, target, new_end, drift)?;
        debug!(
            index,
            ?target,
            events = events.len(),
            drift,
            "Applied delta"
        );
        Ok(events)
    }

    /// Inserts the delta's region of the other side right after its region
    /// of `target`, keeping the text already there, and marks the delta
    /// accepted.
    ///
    /// This takes a change whose conflicting counterpart was already
    /// accepted: both edits end up in `target`, the counterpart first.
    pub(crate) fn append(&mut self, index: usize, target: ChangeSide) -> Result<DeltaTextChangeEvent> {
        let delta = self.delta(index)?;
        if !delta.is_change() {
            return Err(DiffError::InvalidState {
                index,
                status: delta.status(),
            });
        }
        delta
            .status()
            .validate_transition(&ChangeStatus::Accepted, index)?;

        let range = *delta.range(target);
        let appended = delta.text(target.other(), self.texts.get(target.other())).to_owned();
        let text = self.texts.get_mut(target);
        let offset = range.end.min(text.len());
        let unterminated = offset == text.len() && !text.is_empty() && !text.ends_with('\n');
        let inserted = if unterminated && !appended.is_empty() {
            format!("\n{appended}")
        } else {
            appended
        };
        check_location(text, offset, 0)?;
        text.insert_str(offset, &inserted);
        let new_end = offset + inserted.len();
        let drift = signed(new_end) - signed(range.end);

        self.settle_accepted(index, target, new_end, drift)?;
        debug!(index, ?target, offset, drift, "Appended delta");
        Ok(DeltaTextChangeEvent::new(target, offset, 0, inserted.as_str()))
    }

    /// Moves the end of an applied region to `new_end`, recounts its lines,
    /// drops its line parts, marks it accepted and shifts every later delta.
    fn settle_accepted(
        &mut self,
        index: usize,
        target: ChangeSide,
        new_end: usize,
        drift: isize,
    ) -> Result<()> {
        let range = *self.deltas[index].range(target);
        let region = clamped_slice(self.texts.get(target), TextSpan::new(range.start, new_end));
        let end_line = range.start_line + line_span(region);
        let line_drift = signed(end_line) - signed(range.end_line);

        let delta = &mut self.deltas[index];
        let applied = delta.range_mut(target);
        applied.end = new_end;
        applied.end_line = end_line;
        delta.line_parts_mut().clear();
        delta.transition(ChangeStatus::Accepted, index)?;
        for later in self.deltas.iter_mut().skip(index + 1) {
            later.shift(target, line_drift, drift);
        }
        Ok(())
    }

    /// Marks a pending change accepted without touching text.
    pub(crate) fn mark_accepted(&mut self, index: usize) -> Result<()> {
        self.decide(index, ChangeStatus::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::MyersDiff;
    use crate::domain::LineEdit;
    use crate::header::FileDiffHeader;

    fn build(old: &str, new: &str) -> FileDiff {
        FileDiff::from_texts(
            FileDiffHeader::modified("file.txt"),
            old,
            new,
            &MyersDiff::new(),
        )
        .unwrap()
    }

    #[test]
    fn accept_trailing_delete_appends_on_new_line() {
        let old = "Hello there!\n There was some stuff here\nAnd here?\n";
        let mut diff = FileDiff::new(
            FileDiffHeader::modified("file.txt"),
            vec![LineEdit::new(1, 3, 1, 1)],
            old,
            "Hello there!",
        )
        .unwrap();
        let events = diff.accept_delta(1).unwrap();
        assert_eq!(events, vec![DeltaTextChangeEvent::new(
            ChangeSide::New,
            12,
            0,
            "\n There was some stuff here\nAnd here?\n"
        )]);
        assert_eq!(diff.text(ChangeSide::New), old);
        assert_eq!(diff.delta(1).unwrap().status(), ChangeStatus::Accepted);
    }

    #[test]
    fn word_based_apply_replaces_only_changed_words() {
        let old = "keep this\nSo here are some words\n";
        let new = "keep this\nSo here are a few words\n";
        let mut diff = build(old, new);
        let events = diff.apply(1, ChangeSide::Old, true).unwrap();
        assert_eq!(events, vec![DeltaTextChangeEvent::new(ChangeSide::Old, 22, 5, "a few ")]);
        assert_eq!(diff.text(ChangeSide::Old), new);
        let applied = diff.delta(1).unwrap();
        assert_eq!(applied.end_index(ChangeSide::Old), new.len());
        assert!(applied.line_parts().is_empty());
    }

    #[test]
    fn apply_shifts_later_deltas() {
        let old = "a\nb\nc\nd\n";
        let new = "a\nB B\nc\nD\n";
        let mut diff = build(old, new);
        diff.accept_delta(1).unwrap();
        let last = diff.delta(3).unwrap();
        assert_eq!(last.start_index(ChangeSide::New), 6);
        assert_eq!(diff.delta_text(3, ChangeSide::New).unwrap(), "D\n");
        assert_eq!(last.start_line(ChangeSide::New), 3);
    }

    #[test]
    fn append_keeps_target_text_and_shifts_later_deltas() {
        let mut diff = build("a\nb\nc\n", "a\nY\nc\n");
        let event = diff.append(1, ChangeSide::Old).unwrap();
        assert_eq!(event, DeltaTextChangeEvent::new(ChangeSide::Old, 4, 0, "Y\n"));
        assert_eq!(diff.text(ChangeSide::Old), "a\nb\nY\nc\n");
        let appended = diff.delta(1).unwrap();
        assert_eq!(appended.status(), ChangeStatus::Accepted);
        assert_eq!(appended.range(ChangeSide::Old).end, 6);
        assert_eq!(appended.end_line(ChangeSide::Old), 3);
        let last = diff.delta(2).unwrap();
        assert_eq!(last.start_index(ChangeSide::Old), 6);
        assert_eq!(last.start_line(ChangeSide::Old), 3);
        assert!(diff.append(1, ChangeSide::Old).is_err());
    }

    #[test]
    fn append_after_missing_final_newline() {
        let mut diff = build("a\nb", "a\nY");
        let event = diff.append(1, ChangeSide::Old).unwrap();
        assert_eq!(event, DeltaTextChangeEvent::new(ChangeSide::Old, 3, 0, "\nY"));
        assert_eq!(diff.text(ChangeSide::Old), "a\nb\nY");
        assert_eq!(diff.delta(1).unwrap().end_line(ChangeSide::Old), 3);
    }

    #[test]
    fn mark_accepted_leaves_text() {
        let mut diff = build("a\n", "b\n");
        diff.mark_accepted(0).unwrap();
        assert_eq!(diff.text(ChangeSide::New), "b\n");
        assert!(diff.mark_accepted(0).is_err());
    }
}
