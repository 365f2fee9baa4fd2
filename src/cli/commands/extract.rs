use std::{fs, path::Path};

use anyhow::{Context, Result};
use colored::Colorize;

use super::super::args::ExtractCommand;
use super::{CommandResult, CommandSummary, ExtractSummary, RewritePreview};
use crate::core::{ExtractContext, ExtractionSession, ProcessedFile};

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let ctx = ExtractContext::new(&args.common)?;
    let mut session = ExtractionSession::new(ctx.session_options(), ctx.detector()?);

    if ctx.verbose
        && let Some(err) = session.load_error()
    {
        eprintln!(
            "{} Starting from an empty registry: {:#}",
            "note:".bold().cyan(),
            err
        );
    }

    let parsed_files = ctx.parsed_files();
    let mut summary = ExtractSummary {
        registry_path: session.options().registry_path(),
        out_dir: args.out_dir.clone(),
        ..Default::default()
    };

    // BTreeSet order; a file's output never depends on files processed after it.
    for file_path in &ctx.files {
        let Some(parsed) = parsed_files.get(file_path) else {
            continue;
        };
        let processed = session.process_file(file_path, parsed)?;

        if ctx.verbose {
            eprintln!(
                "{} {}: {} text(s), {} rewrite(s)",
                "note:".bold().cyan(),
                file_path,
                processed.extracted,
                processed.replacements.len()
            );
        }

        if let Some(out_dir) = &args.out_dir {
            write_output(out_dir, &processed)?;
        }
        record(&mut summary, &processed, parsed.code());
    }

    summary.registry_size = session.registry().len();

    Ok(CommandResult {
        summary: CommandSummary::Extract(summary),
        parse_errors: ctx.parse_errors().to_vec(),
    })
}

/// Write the file's output code to `<out_dir>/<file_path>`.
fn write_output(out_dir: &Path, processed: &ProcessedFile) -> Result<()> {
    let path = out_dir.join(&processed.file_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&path, &processed.code)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

fn record(summary: &mut ExtractSummary, processed: &ProcessedFile, source: &str) {
    summary.file_count += 1;
    summary.extracted_count += processed.extracted;
    if processed.replacements.is_empty() {
        return;
    }
    summary.rewritten_file_count += 1;

    let lines: Vec<&str> = source.lines().collect();
    summary
        .previews
        .extend(processed.replacements.iter().map(|r| RewritePreview {
            file_path: processed.file_path.clone(),
            line: r.line,
            col: r.column,
            source_line: lines
                .get(r.line.saturating_sub(1))
                .map(|l| l.to_string())
                .unwrap_or_default(),
            id: r.id,
            text: r.text.clone(),
        }));
}
