//! Engine configuration.
//!
//! Settings are layered: serde defaults first, then an optional file, then
//! `DELTA_ENGINE__*` environment variables.

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

/// Tunables for delta construction and merging.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Combined line count of a modified region at which word diffs fall back
    /// to whole-line tokens (default: 20)
    #[serde(default = "default_word_diff_line_threshold")]
    pub word_diff_line_threshold: usize,

    /// Apply merge accepts word by word and resolve word-compatible overlaps
    /// (default: true)
    #[serde(default = "default_true")]
    pub word_based_merge: bool,

    /// Default log filter used when `RUST_LOG` is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            word_diff_line_threshold: default_word_diff_line_threshold(),
            word_based_merge: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Loads the configuration from defaults and environment variables.
    ///
    /// # Errors
    /// Returns `DiffError::Config` if a variable cannot be converted.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(Self::environment())
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Loads the configuration from a file, with environment variables on top.
    /// The format follows the file extension.
    ///
    /// # Errors
    /// Returns `DiffError::Config` if the file is missing or malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()).required(true))
            .add_source(Self::environment())
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Parses an inline JSON document.
    ///
    /// # Errors
    /// Returns `DiffError::ConfigParse` if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn environment() -> Environment {
        Environment::with_prefix("DELTA_ENGINE")
            .separator("__")
            .try_parsing(true)
    }
}

fn default_word_diff_line_threshold() -> usize {
    20
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
