//! Report formatting and printing utilities.
//!
//! Kept apart from the extraction engine so the crate can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, ExtractSummary, InitSummary, RewritePreview};
use crate::config::CONFIG_FILE_NAME;
use crate::core::ParseError;
use crate::utils::js_string_literal;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) {
    let stdout = &mut io::stdout().lock();
    match &result.summary {
        CommandSummary::Extract(summary) => print_extract_to(summary, stdout),
        CommandSummary::Init(summary) => print_init_to(summary, stdout),
    }

    print_parse_errors_to(&result.parse_errors, verbose, &mut io::stderr().lock());
}

/// Print the dry-run preview and the run summary.
pub fn print_extract_to<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let rewrite_count = summary.previews.len();

    if summary.out_dir.is_none() {
        print_previews_to(&summary.previews, writer);
    }

    if rewrite_count > 0 {
        match &summary.out_dir {
            Some(out_dir) => {
                let _ = writeln!(
                    writer,
                    "{} {} literal(s) in {} file(s) into {}.",
                    "Rewrote".green().bold(),
                    rewrite_count,
                    summary.rewritten_file_count,
                    out_dir.display()
                );
            }
            None => {
                let _ = writeln!(
                    writer,
                    "{} {} literal(s) in {} file(s).",
                    "Would rewrite".yellow().bold(),
                    rewrite_count,
                    summary.rewritten_file_count
                );
                let _ = writeln!(
                    writer,
                    "Run with {} to write the rewritten files.",
                    "--out-dir <DIR>".cyan()
                );
            }
        }
    }

    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Processed {} source {}: {} occurrence(s), {} text(s) in {}",
            summary.file_count,
            if summary.file_count == 1 { "file" } else { "files" },
            summary.extracted_count,
            summary.registry_size,
            summary.registry_path.display()
        )
        .green()
    );
}

/// Print each rewrite with its source line and a caret under the literal.
pub fn print_previews_to<W: Write>(previews: &[RewritePreview], writer: &mut W) {
    if previews.is_empty() {
        return;
    }

    let max_line_width = previews
        .iter()
        .map(|p| p.line.to_string().len())
        .max()
        .unwrap_or(1);

    for preview in previews {
        let _ = writeln!(
            writer,
            "  {} {}:{}:{}",
            "-->".blue(),
            preview.file_path,
            preview.line,
            preview.col
        );
        let _ = writeln!(
            writer,
            " {:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            " {:>width$} {} {}",
            preview.line.to_string().blue(),
            "|".blue(),
            preview.source_line,
            width = max_line_width
        );

        // col is 1-based and counted in chars; pad by display width.
        let prefix: String = preview
            .source_line
            .chars()
            .take(preview.col.saturating_sub(1))
            .collect();
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            " {:>width$} {} {:>padding$}{} {}",
            "",
            "|".blue(),
            "",
            "^".yellow(),
            format!("{} {}", preview.id, js_string_literal(&preview.text)).dimmed(),
            width = max_line_width,
            padding = caret_padding
        );
        let _ = writeln!(writer);
    }
}

/// Parse errors always count against the exit status; details only with `-v`.
pub fn print_parse_errors_to<W: Write>(errors: &[ParseError], verbose: bool, writer: &mut W) {
    if errors.is_empty() {
        return;
    }

    if verbose {
        for error in errors {
            let _ = writeln!(writer, "{}: {}", "error".bold().red(), error.error);
            let _ = writeln!(writer, "  {} {}", "-->".blue(), error.file_path);
        }
    }

    let _ = writeln!(
        writer,
        "{} {} file(s) could not be parsed{}",
        FAILURE_MARK.red(),
        errors.len(),
        if verbose { "" } else { " (use -v for details)" }
    );
}

fn print_init_to<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}
