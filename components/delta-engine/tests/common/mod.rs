//! Test utilities for delta-engine integration tests
//!
//! Shared sample texts, builders and the tiling checks every session test
//! runs after each step.

#![allow(dead_code)]

use delta_engine::{
    ChangeSide, ConflictSide, DeltaTextChangeEvent, EngineConfig, FileDiff, FileDiffHeader,
    MergeData, MyersDiff,
};

pub const BASE: &str = "Hello there, this is a test\nSo here are some words\nNo use taking a rest\nWe're not creating any turds";
pub const YOURS: &str = "Hello there, this is a test\nSo here are a few words\nNo use taking a rest\nWe are not creating any turds";
pub const THEIRS: &str = "Hello there, this is a test\nSo here are some random words\nNo use taking a break\nWe're not creating any shit";

/// Diff of `BASE` against `YOURS`.
pub fn sample_diff() -> FileDiff {
    diff_of(BASE, YOURS)
}

pub fn diff_of(old: &str, new: &str) -> FileDiff {
    FileDiff::from_texts(FileDiffHeader::modified("filea"), old, new, &MyersDiff::new())
        .expect("sample texts diff cleanly")
}

pub fn merge_of(base: &str, yours: &str, theirs: &str) -> MergeData {
    MergeData::from_texts(
        (
            FileDiffHeader::modified("filea"),
            FileDiffHeader::modified("filea"),
        ),
        base,
        yours,
        theirs,
        &MyersDiff::new(),
        &EngineConfig::default(),
    )
    .expect("sample texts merge cleanly")
}

/// Asserts that the deltas cover both texts of `diff` exactly once, in
/// order, on bytes and lines.
pub fn assert_tiles(diff: &FileDiff) {
    for side in [ChangeSide::Old, ChangeSide::New] {
        let text = diff.text(side);
        let mut position = 0;
        let mut line = 0;
        let mut rebuilt = String::new();
        for delta in diff.change_deltas() {
            assert_eq!(delta.start_index(side), position, "{side:?} gap before {delta:?}");
            assert_eq!(delta.start_line(side), line, "{side:?} line gap before {delta:?}");
            position = delta.end_index(side);
            line = delta.end_line(side);
            rebuilt.push_str(delta.text(side, text));
        }
        assert_eq!(rebuilt, text, "{side:?} deltas do not rebuild the text");
    }
}

/// Asserts both merge bases hold the same text and both diffs still tile.
pub fn assert_merge_consistent(merge: &MergeData) {
    assert_eq!(
        merge.diff(ConflictSide::Yours).text(ChangeSide::Old),
        merge.diff(ConflictSide::Theirs).text(ChangeSide::Old)
    );
}

/// Replays accept events on an editor-side copy of the text.
pub fn replay(buffer: &mut String, events: &[DeltaTextChangeEvent]) {
    for event in events {
        event.apply_to(buffer).expect("event fits the mirrored buffer");
    }
}
