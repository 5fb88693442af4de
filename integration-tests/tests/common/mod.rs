//! Shared test utilities for integration tests.
//!
//! Provides a scratch directory for file fixtures and helpers that load
//! diffs and merges from files on disk, the way a host application would.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use delta_engine::{
    ChangeSide, EngineConfig, FileDiff, FileDiffHeader, MergeData, MyersDiff, normalize_line_endings,
};
use tempfile::TempDir;

/// Integration test context owning a temporary working directory.
pub struct IntegrationTestContext {
    /// Temporary directory for test files
    pub temp_dir: TempDir,
}

impl IntegrationTestContext {
    /// Creates a new context with an empty directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Gets the path of a file in the temporary directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Writes a fixture file and returns its path.
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(name);
        fs::write(&path, content).with_context(|| format!("writing {name}"))?;
        Ok(path)
    }

    /// Reads a file back as text.
    pub fn read_file(&self, name: &str) -> Result<String> {
        fs::read_to_string(self.path(name)).with_context(|| format!("reading {name}"))
    }
}

/// Diffs two files on disk, keeping their line endings.
pub fn diff_files(old: &Path, new: &Path, config: EngineConfig) -> Result<FileDiff> {
    let old_raw = fs::read_to_string(old)?;
    let new_raw = fs::read_to_string(new)?;
    let header = FileDiffHeader::modified(new.to_string_lossy());
    Ok(FileDiff::from_raw(
        header,
        &old_raw,
        &new_raw,
        &MyersDiff::new(),
        config,
    )?)
}

/// Builds a merge of two versions of a base file on disk.
pub fn merge_files(base: &Path, yours: &Path, theirs: &Path) -> Result<MergeData> {
    let read = |path: &Path| -> Result<String> {
        Ok(normalize_line_endings(&fs::read_to_string(path)?))
    };
    let header = FileDiffHeader::modified(base.to_string_lossy());
    Ok(MergeData::from_texts(
        (header.clone(), header),
        &read(base)?,
        &read(yours)?,
        &read(theirs)?,
        &MyersDiff::new(),
        &EngineConfig::default(),
    )?)
}

/// Indices of every change still waiting for a decision.
pub fn pending_changes(diff: &FileDiff) -> Vec<usize> {
    diff.change_deltas()
        .iter()
        .enumerate()
        .filter(|(_, delta)| delta.is_pending_change())
        .map(|(index, _)| index)
        .collect()
}

/// Writes the new side of `diff` back to `path` with its original endings.
pub fn save_new_side(diff: &FileDiff, path: &Path) -> Result<()> {
    let ending = diff.line_ending(ChangeSide::New);
    fs::write(path, ending.restore(diff.text(ChangeSide::New)))?;
    Ok(())
}
