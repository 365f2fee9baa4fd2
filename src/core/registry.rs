//! Cross-file registry of extracted text.
//!
//! Maps each distinct text to its id and the ordered set of source locations it
//! was found at. The registry is seeded from the snapshot written by a previous
//! run, so ids survive restarts, and is re-written after every processed file.

use std::fs;
use std::path::Path;

use anyhow::Result;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::json_writer::write_json_pretty;

/// A source location in the form `relativeFilePath#line#column` (1-based).
pub type LocationRef = String;

pub fn make_location_ref(file_path: &str, line: usize, column: usize) -> LocationRef {
    format!("{}#{}#{}", file_path, line, column)
}

/// Whether `location` was recorded for `file_path`.
fn location_in_file(location: &str, file_path: &str) -> bool {
    location
        .strip_prefix(file_path)
        .is_some_and(|rest| rest.starts_with('#'))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEntry {
    pub id: i32,
    /// Older registries stored the text under `defaultMessage`.
    #[serde(alias = "defaultMessage")]
    pub text: String,
    #[serde(rename = "loc", default)]
    pub locations: IndexSet<LocationRef>,
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: IndexMap<String, TextEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a persisted snapshot. Entries without locations are
    /// dropped; a later duplicate text merges its locations into the first.
    pub fn from_entries(entries: impl IntoIterator<Item = TextEntry>) -> Self {
        let mut registry = Self::new();
        for entry in entries {
            if entry.locations.is_empty() {
                continue;
            }
            match registry.entries.get_mut(&entry.text) {
                Some(existing) => existing.locations.extend(entry.locations),
                None => {
                    registry.entries.insert(entry.text.clone(), entry);
                }
            }
        }
        registry
    }

    /// Load the snapshot at `path`.
    ///
    /// A missing file yields an empty registry. So does an unreadable or malformed
    /// one; the error is returned alongside so callers can mention it.
    pub fn load(path: &Path) -> (Self, Option<anyhow::Error>) {
        if !path.exists() {
            return (Self::new(), None);
        }
        let parsed = fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| {
                serde_json::from_str::<Option<Vec<TextEntry>>>(&content).map_err(Into::into)
            });
        match parsed {
            Ok(entries) => (Self::from_entries(entries.unwrap_or_default()), None),
            Err(e) => (Self::new(), Some(e)),
        }
    }

    pub fn get(&self, text: &str) -> Option<&TextEntry> {
        self.entries.get(text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &TextEntry> {
        self.entries.values()
    }

    /// Record `location` for `text`, creating the entry with `new_id()` when the
    /// text is not known yet. Returns the entry's id.
    pub fn record(
        &mut self,
        text: &str,
        location: LocationRef,
        new_id: impl FnOnce() -> i32,
    ) -> i32 {
        match self.entries.get_mut(text) {
            Some(entry) => {
                entry.locations.insert(location);
                entry.id
            }
            None => {
                let id = new_id();
                self.entries.insert(
                    text.to_string(),
                    TextEntry {
                        id,
                        text: text.to_string(),
                        locations: IndexSet::from([location]),
                    },
                );
                id
            }
        }
    }

    /// Drop every location recorded for `file_path`.
    ///
    /// Entries left without locations are removed; their `(text, id)` pairs are
    /// returned so the caller can pin the ids.
    pub fn remove_file(&mut self, file_path: &str) -> Vec<(String, i32)> {
        let mut freed = Vec::new();
        self.entries.retain(|text, entry| {
            entry
                .locations
                .retain(|location| !location_in_file(location, file_path));
            if entry.locations.is_empty() {
                freed.push((text.clone(), entry.id));
                false
            } else {
                true
            }
        });
        freed
    }

    /// Overwrite `path` with the full snapshot.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let entries: Vec<&TextEntry> = self.entries().collect();
        write_json_pretty(path, &entries)
    }
}
