//! Core extraction engine.
//!
//! ## Pipeline
//!
//! 1. **Scan**: find source files under the configured include dirs (`file_scanner`)
//! 2. **Parse**: build swc ASTs, in parallel (`context`, `parsers`)
//! 3. **Extract**: per file, in order: invalidate its previous contribution, walk and
//!    rewrite literals, persist the registry (`session`, `rewrite`)
//!
//! Step 3 is strictly sequential; all shared state lives in one [`ExtractionSession`].

pub mod context;
pub mod detector;
pub mod file_scanner;
pub mod json_writer;
pub mod ledger;
pub mod parsers;
pub mod registry;
pub mod rewrite;
pub mod session;
pub mod text_id;

pub use context::{ExtractContext, ParseError};
pub use detector::{Detector, MatchPattern};
pub use ledger::{DebugEntry, FileLedger, LedgerItem};
pub use registry::{LocationRef, Registry, TextEntry};
pub use session::{ExtractionSession, FileStage, PinnedIds, ProcessedFile, SessionOptions};
pub use text_id::text_id;
