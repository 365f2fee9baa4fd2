use std::path::PathBuf;

use super::super::exit_status::ExitStatus;
use crate::core::ParseError;

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Init(InitSummary),
}

/// One literal rewritten into a lookup call, with enough context to show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewritePreview {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
    pub source_line: String,
    pub id: i32,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct ExtractSummary {
    /// Files that were parsed and processed.
    pub file_count: usize,
    /// Files that got at least one rewrite.
    pub rewritten_file_count: usize,
    /// Distinct occurrences reported to the registry, rewritten or not.
    pub extracted_count: usize,
    /// Texts in the registry after the run.
    pub registry_size: usize,
    pub registry_path: PathBuf,
    /// Where rewritten sources were written; `None` for a dry run.
    pub out_dir: Option<PathBuf>,
    pub previews: Vec<RewritePreview>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running a command.
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Source files that could not be read or parsed.
    pub parse_errors: Vec<ParseError>,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        match &self.summary {
            CommandSummary::Init(summary) if !summary.created => ExitStatus::Failure,
            _ if !self.parse_errors.is_empty() => ExitStatus::Error,
            _ => ExitStatus::Success,
        }
    }
}
