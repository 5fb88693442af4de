//! Line ending detection and normalization.
//!
//! The engine works on `\n`-terminated text only. Raw file contents are
//! normalized on the way in, and the dominant ending is remembered so a
//! caller can write the text back the way it came.

use serde::{Deserialize, Serialize};

/// A line terminator style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineEnding {
    /// `\n`
    Unix,
    /// `\r\n`
    Windows,
    /// `\r`
    Mac,
}

impl LineEnding {
    /// Returns the terminator characters.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unix => "\n",
            Self::Windows => "\r\n",
            Self::Mac => "\r",
        }
    }

    /// Returns the ending used most often in `raw`. Ties prefer Windows, then Unix.
    #[must_use]
    pub fn detect(raw: &str) -> Self {
        let windows = raw.matches("\r\n").count();
        let unix = raw.matches('\n').count() - windows;
        let mac = raw.matches('\r').count() - windows;

        let max = windows.max(unix).max(mac);
        if max == windows {
            Self::Windows
        } else if max == unix {
            Self::Unix
        } else {
            Self::Mac
        }
    }

    /// Rewrites `\n`-terminated text with this ending.
    #[must_use]
    pub fn restore(&self, text: &str) -> String {
        match self {
            Self::Unix => text.to_string(),
            Self::Windows | Self::Mac => text.replace('\n', self.as_str()),
        }
    }
}

/// Makes every line terminator a single `\n`.
///
/// Text that contains `\n` anywhere only loses its `\r` characters; text
/// without any `\n` is treated as classic Mac text.
#[must_use]
pub fn normalize_line_endings(raw: &str) -> String {
    if raw.contains('\n') {
        raw.replace('\r', "")
    } else {
        raw.replace('\r', "\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_dominant_ending() {
        assert_eq!(LineEnding::detect("a\r\nb\r\nc\n"), LineEnding::Windows);
        assert_eq!(LineEnding::detect("a\nb\nc\r\n"), LineEnding::Unix);
        assert_eq!(LineEnding::detect("a\rb\rc"), LineEnding::Mac);
        assert_eq!(LineEnding::detect("no endings"), LineEnding::Windows);
    }

    #[test]
    fn normalizes() {
        assert_eq!(normalize_line_endings("a\r\nb\r\n"), "a\nb\n");
        assert_eq!(normalize_line_endings("a\rb\r"), "a\nb\n");
        assert_eq!(normalize_line_endings("plain"), "plain");
    }

    #[test]
    fn restore_round_trips_windows_text() {
        let raw = "one\r\ntwo\r\n";
        let ending = LineEnding::detect(raw);
        assert_eq!(ending.restore(&normalize_line_endings(raw)), raw);
    }
}
