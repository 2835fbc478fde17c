//! Public suffix table.
//!
//! Every entry of the suffix list is treated as a literal suffix. Wildcard
//! (`*.ck`) and exception (`!www.ck`) rules are stored verbatim and never
//! expanded, so they only match a hostname tail that is spelled the same way.

pub mod loader;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{ListError, Result};

pub use loader::{SuffixListLoader, DEFAULT_MAX_AGE, PUBLIC_SUFFIX_LIST_URL};

/// Immutable set of public suffixes
#[derive(Debug, Clone, Default)]
pub struct SuffixTable {
    entries: HashSet<String>,
}

impl SuffixTable {
    /// Build a table from suffix list text.
    ///
    /// Lines are trimmed; empty lines and `//` comments are ignored.
    pub fn load(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with("//"))
            .map(str::to_string)
            .collect();
        Self { entries }
    }

    /// Build a table from a suffix list file. An unreadable or empty file is an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ListError::SuffixList(format!(
                "Failed to read suffix list '{}': {}",
                path.display(),
                e
            ))
        })?;
        let table = Self::load(&text);
        if table.is_empty() {
            return Err(ListError::SuffixList(format!(
                "Suffix list '{}' has no entries",
                path.display()
            )));
        }
        Ok(table)
    }

    /// Exact match against the full label sequence
    pub fn is_public_suffix(&self, labels: &str) -> bool {
        self.entries.contains(labels)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SuffixTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}
