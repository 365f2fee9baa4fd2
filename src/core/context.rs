use std::{
    cell::OnceCell,
    collections::{BTreeSet, HashMap},
    path::PathBuf,
};

use anyhow::Result;
use colored::Colorize;
use rayon::prelude::*;

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        detector::Detector,
        file_scanner::scan_files,
        parsers::jsx::{ParsedSource, parse_source},
        session::SessionOptions,
    },
};

/// A source file that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub file_path: String,
    pub error: String,
}

/// Everything an extraction run needs before the first file is processed.
///
/// Configuration priority (highest to lowest):
/// 1. CLI arguments (e.g. `--dest`)
/// 2. `.i18nrc.json`
/// 3. Built-in defaults
pub struct ExtractContext {
    /// Merged configuration.
    pub config: Config,

    /// Project root; scanned paths and the registry location are relative to it.
    pub root_dir: PathBuf,

    /// Source files to process, relative to `root_dir`, in processing order.
    pub files: BTreeSet<String>,

    pub verbose: bool,

    /// Parsed AST for each source file, on first call to `parsed_files()`.
    parsed_files: OnceCell<HashMap<String, ParsedSource>>,

    /// Populated alongside `parsed_files`.
    parse_errors: OnceCell<Vec<ParseError>>,
}

impl ExtractContext {
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;
        let root_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config_result = load_config(&root_dir)?;
        if verbose && !config_result.from_file {
            eprintln!(
                "{} No {} found, using default configuration",
                "note:".bold().cyan(),
                CONFIG_FILE_NAME
            );
        }

        let mut config = config_result.config;
        if let Some(ref dest) = common_args.dest {
            config.dest = dest.to_string_lossy().to_string();
        }
        if let Some(ref filename) = common_args.filename {
            config.filename = filename.clone();
        }
        if common_args.debug {
            config.debug = true;
        }
        config.validate()?;

        let scan_result = scan_files(&root_dir, &config.includes, &config.ignores, verbose);
        if scan_result.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        Ok(Self {
            config,
            root_dir,
            files: scan_result.files,
            verbose,
            parsed_files: OnceCell::new(),
            parse_errors: OnceCell::new(),
        })
    }

    /// Parsed AST for every source file that could be read and parsed.
    ///
    /// Reading and parsing run in parallel; each file gets its own `SourceMap`.
    pub fn parsed_files(&self) -> &HashMap<String, ParsedSource> {
        self.parsed_files.get_or_init(|| {
            let root_dir = &self.root_dir;
            let parse_results: Vec<_> = self
                .files
                .par_iter()
                .map(|file_path| {
                    let result = std::fs::read_to_string(root_dir.join(file_path))
                        .map_err(|e| anyhow::anyhow!("Failed to read file: {}", e))
                        .and_then(|code| parse_source(code, file_path));
                    (file_path.clone(), result)
                })
                .collect();

            let mut parsed = HashMap::new();
            let mut errors = Vec::new();
            for (file_path, result) in parse_results {
                match result {
                    Ok(p) => {
                        parsed.insert(file_path, p);
                    }
                    Err(e) => {
                        if self.verbose {
                            eprintln!("{} {} - {}", "warning:".bold().yellow(), file_path, e);
                        }
                        errors.push(ParseError {
                            file_path,
                            error: e.to_string(),
                        });
                    }
                }
            }
            errors.sort_by(|a, b| a.file_path.cmp(&b.file_path));

            let _ = self.parse_errors.set(errors);
            parsed
        })
    }

    /// Files that failed to read or parse. Populated by `parsed_files()`.
    pub fn parse_errors(&self) -> &[ParseError] {
        self.parse_errors.get_or_init(Vec::new)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions::from_config(&self.config, &self.root_dir)
    }

    pub fn detector(&self) -> Result<Detector> {
        Detector::from_config(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn common_args(root: &std::path::Path) -> CommonArgs {
        CommonArgs {
            source_root: Some(root.to_path_buf()),
            dest: None,
            filename: None,
            debug: false,
            verbose: false,
        }
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "dest": "./out", "filename": "a.json" }"#,
        )
        .unwrap();

        let mut args = common_args(dir.path());
        args.filename = Some("b.json".to_string());
        args.debug = true;
        let ctx = ExtractContext::new(&args).unwrap();

        assert_eq!(ctx.config.dest, "./out");
        assert_eq!(ctx.config.filename, "b.json");
        assert!(ctx.config.debug);
        assert_eq!(
            ctx.session_options().registry_path(),
            dir.path().join("out").join("b.json")
        );
    }

    #[test]
    fn test_parse_errors_are_collected() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("ok.js"), "const a = 1;").unwrap();
        fs::write(src.join("broken.js"), "const a = {").unwrap();

        let ctx = ExtractContext::new(&common_args(dir.path())).unwrap();

        assert_eq!(ctx.parsed_files().len(), 1);
        assert!(ctx.parsed_files().contains_key("src/ok.js"));
        let errors = ctx.parse_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].file_path, "src/broken.js");
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let dir = tempdir().unwrap();
        let mut args = common_args(dir.path());
        args.filename = Some(String::new());
        assert!(ExtractContext::new(&args).is_err());
    }
}
