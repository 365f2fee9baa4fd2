use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".i18nrc.json";

/// Source files that are never worth extracting from.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["**/node_modules/**"];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory that receives the registry and debug listings.
    #[serde(default = "default_dest")]
    pub dest: String,
    /// Registry file name inside `dest`.
    #[serde(default = "default_filename")]
    pub filename: String,
    /// Write a per-file listing of extracted text next to the registry.
    #[serde(default)]
    pub debug: bool,
    /// Source files whose path matches are never extracted from.
    #[serde(default)]
    pub exclude: ExcludeOption,
    /// Overrides the default "contains CJK" detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_pattern: Option<MatchPatternOption>,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    /// Module that rewritten files import the lookup function from.
    #[serde(default = "default_import_source")]
    pub import_source: String,
    /// Exported name of the lookup function in `import_source`.
    #[serde(default = "default_import_name")]
    pub import_name: String,
}

/// `exclude` accepts `false`, a single regex, or a list of regexes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ExcludeOption {
    Flag(bool),
    One(String),
    Many(Vec<String>),
}

impl Default for ExcludeOption {
    fn default() -> Self {
        ExcludeOption::Flag(false)
    }
}

impl ExcludeOption {
    /// The configured patterns; `true`/`false` carry none.
    pub fn patterns(&self) -> Vec<&str> {
        match self {
            ExcludeOption::Flag(_) => Vec::new(),
            ExcludeOption::One(pattern) => vec![pattern.as_str()],
            ExcludeOption::Many(patterns) => patterns.iter().map(String::as_str).collect(),
        }
    }

    pub fn compile(&self) -> Result<Vec<Regex>> {
        self.patterns()
            .into_iter()
            .map(|p| {
                Regex::new(p).with_context(|| format!("Invalid regex in 'exclude': \"{}\"", p))
            })
            .collect()
    }
}

/// `matchPattern` is either `{"pattern": "<regex>"}`, `{"exact": "<text>"}`,
/// or a bare string, which is compared for exact equality.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MatchPatternOption {
    Exact(String),
    Tagged(TaggedMatchPattern),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TaggedMatchPattern {
    Pattern(String),
    Exact(String),
}

fn default_dest() -> String {
    "./i18n_messages".to_string()
}

fn default_filename() -> String {
    "i18n.json".to_string()
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_ignores() -> Vec<String> {
    DEFAULT_IGNORE_PATTERNS.iter().map(|p| p.to_string()).collect()
}

fn default_import_source() -> String {
    "mickey-i18n".to_string()
}

fn default_import_name() -> String {
    "i18n".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dest: default_dest(),
            filename: default_filename(),
            debug: false,
            exclude: ExcludeOption::default(),
            match_pattern: None,
            includes: default_includes(),
            ignores: default_ignores(),
            import_source: default_import_source(),
            import_name: default_import_name(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `ignores`/`includes` or any regex in
    /// `exclude`/`matchPattern` is invalid.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal directory paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        self.exclude.compile()?;

        if let Some(MatchPatternOption::Tagged(TaggedMatchPattern::Pattern(pattern))) =
            &self.match_pattern
        {
            Regex::new(pattern).with_context(|| {
                format!("Invalid regex in 'matchPattern': \"{}\"", pattern)
            })?;
        }

        if self.filename.is_empty() {
            anyhow::bail!("'filename' must not be empty");
        }

        Ok(())
    }

    /// Path of the persisted registry: `<dest>/<filename>`.
    pub fn registry_path(&self) -> PathBuf {
        Path::new(&self.dest).join(&self.filename)
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
