//! Myers diff algorithm implementation.
//!
//! Myers' algorithm is a classic diff algorithm with O(ND) time complexity,
//! where N is the sum of the lengths of the two sequences and D is the number
//! of differences. It's particularly efficient when the two texts are similar,
//! which is the common case for both line diffs and the word diffs computed
//! inside a single modified region.

pub mod algorithm;
pub mod optimization;

pub use algorithm::MyersDiff;
