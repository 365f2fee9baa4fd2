//! Per-file record of extracted occurrences.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;

use super::json_writer::write_json_pretty;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerItem {
    pub id: i32,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl LedgerItem {
    /// Identical occurrences seen twice in one pass share this key.
    fn key(&self) -> String {
        format!("{}#{}#{}#{}", self.id, self.text, self.line, self.column)
    }
}

/// One entry of a per-file debug listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugEntry {
    pub id: i32,
    pub text: String,
    pub loc: String,
}

/// Occurrences extracted from one file during its latest processing.
pub type FileContribution = IndexMap<String, LedgerItem>;

#[derive(Debug, Default)]
pub struct FileLedger {
    files: HashMap<String, FileContribution>,
}

impl FileLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record for `file_path` with an empty one.
    pub fn reset(&mut self, file_path: &str) {
        self.files
            .insert(file_path.to_string(), FileContribution::new());
    }

    pub fn record(&mut self, file_path: &str, item: LedgerItem) {
        self.files
            .entry(file_path.to_string())
            .or_default()
            .entry(item.key())
            .or_insert(item);
    }

    pub fn get(&self, file_path: &str) -> Option<&FileContribution> {
        self.files.get(file_path)
    }

    /// Number of distinct occurrences recorded for `file_path`.
    pub fn count(&self, file_path: &str) -> usize {
        self.get(file_path).map_or(0, IndexMap::len)
    }

    /// The file's occurrences sorted by (line, column).
    pub fn debug_listing(&self, file_path: &str) -> Vec<DebugEntry> {
        let Some(contribution) = self.get(file_path) else {
            return Vec::new();
        };
        let mut items: Vec<&LedgerItem> = contribution.values().collect();
        items.sort_by_key(|item| (item.line, item.column));
        items
            .into_iter()
            .map(|item| DebugEntry {
                id: item.id,
                text: item.text.clone(),
                loc: format!("{}#{}", item.line, item.column),
            })
            .collect()
    }

    pub fn persist_debug(&self, file_path: &str, destination: &Path) -> Result<()> {
        write_json_pretty(destination, &self.debug_listing(file_path))
    }
}
