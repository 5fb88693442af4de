//! Delta Engine
//!
//! Interactive diff and three-way merge. The engine:
//! 1. Turns a line diff of two texts into a tiled list of change deltas
//! 2. Lets a caller accept or discard each delta, rewriting the texts
//! 3. Keeps every delta boundary valid while an editor changes the text
//! 4. Merges the changes of two sides into a shared base, resolving
//!    overlaps that agree and reporting those that do not
//!
//! `FileDiff` is the two-way model and `MergeData` pairs two of them.

pub mod config;
pub mod content;
pub mod delta;
pub mod diff;
pub mod domain;
pub mod error;
pub mod event;
pub mod file_diff;
pub mod header;
pub mod line_index;
pub mod line_part;
pub mod merge;
pub mod telemetry;

pub use config::EngineConfig;
pub use content::{LineEnding, normalize_line_endings};
pub use delta::{ChangeDelta, SideRange};
pub use diff::{DiffAlgorithm, MyersDiff, line_edits};
pub use domain::{ChangeSide, ChangeStatus, ChangeType, ConflictSide, LineEdit};
pub use error::{DiffError, Result};
pub use event::DeltaTextChangeEvent;
pub use file_diff::FileDiff;
pub use header::{FileChangeType, FileDiffHeader, FileType};
pub use line_index::{LineIndex, build_deltas, line_count};
pub use line_part::{LinePartChangeDelta, TextSpan};
pub use merge::{ConflictPair, ConflictType, MergeData, ResolveOption, adjust_edit_list_for_merge};
pub use telemetry::TelemetryBuilder;
