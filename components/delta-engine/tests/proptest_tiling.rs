//! Property-based tests for delta tiling under editor sessions.
//!
//! Uses proptest to run random sequences of typing, accepting, discarding
//! and misplaced edits against a file diff and verify after every step that
//! the deltas still cover both texts without gaps, on bytes and on lines.

use delta_engine::{ChangeSide, FileDiff};
use proptest::prelude::*;

mod common;
use common::{assert_tiles, diff_of, replay};

/// Strategy to generate texts of short `a`/`b` lines, with or without a
/// final line terminator
fn text_strategy() -> impl Strategy<Value = String> {
    (prop::collection::vec("[ab]{1,2}", 1..5), any::<bool>()).prop_map(|(lines, terminated)| {
        let mut text = lines.join("\n");
        if terminated {
            text.push('\n');
        }
        text
    })
}

/// Strategy to generate one session step: a kind selector, two raw numbers
/// reduced to valid positions later, and text to type
fn step_strategy() -> impl Strategy<Value = (u8, usize, usize, String)> {
    (0u8..5, any::<usize>(), any::<usize>(), "[ab\n]{0,3}")
}

fn pending_changes(diff: &FileDiff) -> Vec<usize> {
    diff.change_deltas()
        .iter()
        .enumerate()
        .filter(|(_, delta)| delta.is_pending_change())
        .map(|(index, _)| index)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: every step either leaves the deltas tiling both texts and
    /// the new text equal to a mirrored editor buffer, or fails without
    /// changing anything.
    #[test]
    fn deltas_tile_both_texts_through_a_session(
        old in text_strategy(),
        new in text_strategy(),
        steps in prop::collection::vec(step_strategy(), 1..12)
    ) {
        let mut diff = diff_of(&old, &new);
        let mut mirror = new.clone();
        assert_tiles(&diff);

        for (kind, first, second, typed) in steps {
            let len = mirror.len();
            match kind {
                0 => {
                    let pending = pending_changes(&diff);
                    if pending.is_empty() {
                        continue;
                    }
                    let index = pending[first % pending.len()];
                    let events = diff.accept_delta(index).unwrap();
                    replay(&mut mirror, &events);
                }
                1 => {
                    let pending = pending_changes(&diff);
                    if pending.is_empty() {
                        continue;
                    }
                    diff.discard_delta(pending[first % pending.len()]).unwrap();
                }
                2 | 3 => {
                    let offset = first % (len + 1);
                    let length = second % (len - offset + 1);
                    diff.process_text_event(offset, length, Some(&typed)).unwrap();
                    mirror.replace_range(offset..offset + length, &typed);
                }
                _ => {
                    let offset = len + 1 + first % 3;
                    let before = diff.change_deltas().to_vec();
                    prop_assert!(diff.process_text_event(offset, second % 2, Some(&typed)).is_err());
                    prop_assert_eq!(diff.change_deltas(), &before[..]);
                }
            }
            prop_assert_eq!(diff.text(ChangeSide::New), mirror.as_str());
            prop_assert_eq!(diff.text(ChangeSide::Old), old.as_str());
            assert_tiles(&diff);
        }

        diff.reset();
        prop_assert_eq!(diff.text(ChangeSide::New), new.as_str());
        assert_tiles(&diff);
    }
}
