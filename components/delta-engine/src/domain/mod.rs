//! Domain Layer - Value Objects
//!
//! This module defines the small value types shared by every layer of the
//! engine:
//! - `side`: which text of a diff (`ChangeSide`) or which merge side (`ConflictSide`)
//! - `status`: the change type of a delta and its status state machine
//! - `edit`: the half-open line edits produced by a line diff

pub use edit::LineEdit;
pub use side::{ChangeSide, ConflictSide};
pub use status::{ChangeStatus, ChangeType};

mod edit;
mod side;
mod status;
