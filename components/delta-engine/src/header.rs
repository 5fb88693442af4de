//! File metadata carried alongside a diff.

use serde::{Deserialize, Serialize};

use crate::domain::ChangeSide;

/// Path used for the missing side of an added or deleted file.
pub const VOID_PATH: &str = "/dev/null";

/// How the file itself changed between the two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileChangeType {
    /// The file was created.
    Add,
    /// The file content changed in place.
    Modify,
    /// The file was removed.
    Delete,
    /// The file was moved, possibly with content changes.
    Rename,
    /// The file was copied.
    Copy,
}

/// Kind of filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// Regular file.
    File,
    /// Symbolic link.
    Symlink,
    /// Submodule reference.
    Gitlink,
    /// Entry absent on this side.
    Missing,
}

/// Paths and types of the two sides of a file diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiffHeader {
    old_path: String,
    new_path: String,
    change_type: FileChangeType,
    file_type: FileType,
}

impl FileDiffHeader {
    /// Creates a header.
    pub fn new(
        old_path: impl Into<String>,
        new_path: impl Into<String>,
        change_type: FileChangeType,
        file_type: FileType,
    ) -> Self {
        Self {
            old_path: old_path.into(),
            new_path: new_path.into(),
            change_type,
            file_type,
        }
    }

    /// Header for a file modified in place.
    pub fn modified(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(path.clone(), path, FileChangeType::Modify, FileType::File)
    }

    /// Returns the path on the given side.
    #[must_use]
    pub fn file_path(&self, side: ChangeSide) -> &str {
        match side {
            ChangeSide::Old => &self.old_path,
            ChangeSide::New => &self.new_path,
        }
    }

    /// Path the file is known by: the old path for a deletion, otherwise
    /// the new path.
    #[must_use]
    pub fn path(&self) -> &str {
        match self.change_type {
            FileChangeType::Delete => &self.old_path,
            _ => &self.new_path,
        }
    }

    /// Returns how the file changed.
    #[must_use]
    pub const fn change_type(&self) -> FileChangeType {
        self.change_type
    }

    /// Returns the kind of entry.
    #[must_use]
    pub const fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Checks if the file was moved.
    #[must_use]
    pub fn is_rename(&self) -> bool {
        self.change_type == FileChangeType::Rename
    }

    /// Checks if `path` names either side of this file.
    #[must_use]
    pub fn is_same_file(&self, path: &str) -> bool {
        path == self.new_path || path == self.old_path
    }

    /// Checks if two headers describe the same file. The void path never matches.
    #[must_use]
    pub fn is_same_file_as(&self, other: &Self) -> bool {
        if self.new_path != VOID_PATH
            && (self.new_path == other.new_path || self.new_path == other.old_path)
        {
            return true;
        }
        self.old_path != VOID_PATH
            && (self.old_path == other.old_path || self.old_path == other.new_path)
    }
}
