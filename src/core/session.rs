//! Extraction session: the single owner of all cross-file extraction state.
//!
//! One session holds the detector, the registry, the file ledger and the pinned
//! id cache. Every operation takes `&mut self`, so a file's
//! invalidate → walk → persist sequence can never interleave with another file's.
//!
//! # Per-file lifecycle
//!
//! ```text
//! Idle → Invalidated → Walking → Rewritten | Unchanged → Persisted
//! ```
//!
//! # Example
//!
//! ```no_run
//! use i18n_extract::config::Config;
//! use i18n_extract::core::{Detector, ExtractionSession, SessionOptions};
//!
//! let config = Config::default();
//! let detector = Detector::from_config(&config)?;
//! let mut session = ExtractionSession::new(SessionOptions::from_config(&config, ".".as_ref()), detector);
//!
//! let processed = session.process_source("src/app.js", "const a = \"你好\";".to_string())?;
//! assert!(processed.code.contains("_i18n("));
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::detector::Detector;
use super::ledger::{FileLedger, LedgerItem};
use super::parsers::jsx::{ParsedSource, parse_source};
use super::registry::{Registry, make_location_ref};
use super::rewrite::{LiteralRewriter, Replacement, apply_edits, import_edit, unique_binding_name};
use super::text_id::text_id;
use crate::config::Config;

/// Ids freed by the most recent invalidation, keyed by text.
///
/// If a text disappears while its file is invalidated and then reappears while
/// the file is walked again, it gets its old id back. The cache is cleared at the
/// start of every invalidation, so it never carries ids from one file to another
/// unless they are invalidated back to back.
#[derive(Debug, Default)]
pub struct PinnedIds {
    ids: HashMap<String, i32>,
}

impl PinnedIds {
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn pin(&mut self, text: String, id: i32) {
        self.ids.insert(text, id);
    }

    pub fn get(&self, text: &str) -> Option<i32> {
        self.ids.get(text).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStage {
    Idle,
    Invalidated,
    Walking,
    Rewritten,
    Unchanged,
    Persisted,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Directory holding the registry and debug listings.
    pub dest: PathBuf,
    /// Registry file name inside `dest`.
    pub filename: String,
    pub debug: bool,
    pub import_source: String,
    pub import_name: String,
}

impl SessionOptions {
    /// Options from `config`, with `dest` resolved against `root_dir`.
    pub fn from_config(config: &Config, root_dir: &Path) -> Self {
        let dest = Path::new(&config.dest);
        let dest = if dest.is_absolute() {
            dest.to_path_buf()
        } else {
            root_dir.join(dest.strip_prefix(".").unwrap_or(dest))
        };
        Self {
            dest,
            filename: config.filename.clone(),
            debug: config.debug,
            import_source: config.import_source.clone(),
            import_name: config.import_name.clone(),
        }
    }

    pub fn registry_path(&self) -> PathBuf {
        self.dest.join(&self.filename)
    }

    /// `<dest>/<file_path with a .json extension>`.
    pub fn debug_path(&self, file_path: &str) -> PathBuf {
        self.dest.join(Path::new(file_path).with_extension("json"))
    }
}

/// Outcome of processing one file.
#[derive(Debug)]
pub struct ProcessedFile {
    pub file_path: String,
    /// Output source; identical to the input when nothing was rewritten.
    pub code: String,
    /// `Rewritten` or `Unchanged`.
    pub outcome: FileStage,
    /// Local name bound to the lookup function, if an import was injected.
    pub lookup: Option<String>,
    pub replacements: Vec<Replacement>,
    /// Distinct occurrences reported to the registry, rewritten or not.
    pub extracted: usize,
}

pub struct ExtractionSession {
    options: SessionOptions,
    detector: Detector,
    registry: Registry,
    ledger: FileLedger,
    pinned: PinnedIds,
    stage: FileStage,
    load_error: Option<anyhow::Error>,
}

impl ExtractionSession {
    /// Create a session seeded from the registry persisted at
    /// `options.registry_path()`. An unreadable or malformed snapshot leaves the
    /// registry empty; see [`ExtractionSession::load_error`].
    pub fn new(options: SessionOptions, detector: Detector) -> Self {
        let (registry, load_error) = Registry::load(&options.registry_path());
        Self {
            options,
            detector,
            registry,
            ledger: FileLedger::new(),
            pinned: PinnedIds::default(),
            stage: FileStage::Idle,
            load_error,
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn ledger(&self) -> &FileLedger {
        &self.ledger
    }

    pub fn pinned(&self) -> &PinnedIds {
        &self.pinned
    }

    /// Stage of the file most recently processed.
    pub fn stage(&self) -> FileStage {
        self.stage
    }

    /// Why the persisted registry could not be loaded, if it existed but was unusable.
    pub fn load_error(&self) -> Option<&anyhow::Error> {
        self.load_error.as_ref()
    }

    pub fn should_extract(&mut self, text: &str, file_path: Option<&str>) -> bool {
        self.detector.should_extract(text, file_path)
    }

    /// Remove `file_path`'s contribution before it is processed again.
    pub fn invalidate_file(&mut self, file_path: &str) {
        self.pinned.clear();
        for (text, id) in self.registry.remove_file(file_path) {
            self.pinned.pin(text, id);
        }
        self.ledger.reset(file_path);
        self.stage = FileStage::Invalidated;
    }

    /// Record that `text` (already trimmed) occurs in `file_path` at `line`/`column`.
    /// Returns the text's id.
    pub fn report_occurrence(
        &mut self,
        file_path: &str,
        text: &str,
        line: usize,
        column: usize,
    ) -> i32 {
        let pinned = &self.pinned;
        let id = self
            .registry
            .record(text, make_location_ref(file_path, line, column), || {
                pinned.get(text).unwrap_or_else(|| text_id(text))
            });
        self.ledger.record(
            file_path,
            LedgerItem {
                id,
                text: text.to_string(),
                line,
                column,
            },
        );
        id
    }

    /// Write the full registry snapshot to `<dest>/<filename>`.
    pub fn persist_registry(&self) -> Result<()> {
        self.registry.persist(&self.options.registry_path())
    }

    /// Write the debug listing for `file_path`; a no-op unless `debug` is enabled.
    pub fn persist_file_debug(&self, file_path: &str) -> Result<()> {
        if !self.options.debug {
            return Ok(());
        }
        self.ledger
            .persist_debug(file_path, &self.options.debug_path(file_path))
    }

    /// Run the full per-file cycle on an already parsed file.
    ///
    /// `file_path` is the path relative to the project root; it is what location
    /// refs and debug listing paths are built from.
    pub fn process_file(&mut self, file_path: &str, parsed: &ParsedSource) -> Result<ProcessedFile> {
        self.invalidate_file(file_path);
        let lookup = unique_binding_name(&parsed.module, &self.options.import_name);

        self.stage = FileStage::Walking;
        let result = LiteralRewriter::new(self, file_path, parsed, &lookup).rewrite();

        let mut edits = result.edits;
        let (outcome, lookup) = if result.replacements.is_empty() {
            (FileStage::Unchanged, None)
        } else {
            edits.push(import_edit(
                parsed,
                &lookup,
                &self.options.import_name,
                &self.options.import_source,
            ));
            (FileStage::Rewritten, Some(lookup))
        };
        self.stage = outcome;
        let code = apply_edits(parsed.code(), edits);

        self.persist_registry()?;
        if self.ledger.count(file_path) > 0 {
            self.persist_file_debug(file_path)?;
        }
        self.stage = FileStage::Persisted;

        Ok(ProcessedFile {
            file_path: file_path.to_string(),
            code,
            outcome,
            lookup,
            replacements: result.replacements,
            extracted: self.ledger.count(file_path),
        })
    }

    /// Parse `code` and run [`ExtractionSession::process_file`]. Parse errors are
    /// returned before any state is touched.
    pub fn process_source(&mut self, file_path: &str, code: String) -> Result<ProcessedFile> {
        let parsed = parse_source(code, file_path)?;
        self.process_file(file_path, &parsed)
    }
}
