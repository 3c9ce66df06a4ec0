//! Plain `KEY = VALUE` file reader.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// The raw `(key, value)` pairs of a configuration file.
///
/// Keys are case-sensitive.  If a key appears twice the last one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueFile {
    entries: BTreeMap<String, String>,
}

impl KeyValueFile {
    /// Read and parse the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::parse(&text);
        tracing::debug!(path = %path.display(), keys = file.len(), "read configuration file");
        Ok(file)
    }

    /// Parse file contents.
    ///
    /// Everything from the first `#` on a line is a comment.  Of what
    /// remains, lines without `=` (or with nothing before it) are skipped;
    /// the rest split at the first `=`, with both sides trimmed.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| {
                let line = line.split('#').next().unwrap_or_default();
                let (key, value) = line.split_once('=')?;
                let key = key.trim();
                (!key.is_empty()).then(|| (key.to_string(), value.trim().to_string()))
            })
            .collect();
        KeyValueFile { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// The value for `key`, treating an empty value the same as a missing key.
    pub fn require(&self, key: &'static str) -> Result<&str, ConfigError> {
        self.get(key)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingKey(key))
    }

    pub fn len(&self)      -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool  { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
