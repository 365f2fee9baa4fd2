//! Translation-candidate detection.
//!
//! A [`Detector`] answers "should this text be extracted?" Content decisions are
//! memoized per exact text; the filename exclusion is checked on every call
//! because the same text may appear in both excluded and included files.

use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use regex::Regex;

use crate::config::{Config, MatchPatternOption, TaggedMatchPattern};
use crate::utils::contains_cjk;

/// Text that is never extracted.
const PROTO_KEY: &str = "__proto__";

/// How the content of a text is matched, resolved once at construction.
pub enum MatchPattern {
    /// Contains at least one CJK unified ideograph.
    Default,
    Predicate(Box<dyn Fn(&str) -> bool>),
    Pattern(Regex),
    ExactText(String),
}

impl MatchPattern {
    fn matches(&self, text: &str) -> bool {
        match self {
            MatchPattern::Default => contains_cjk(text),
            MatchPattern::Predicate(predicate) => predicate(text),
            MatchPattern::Pattern(regex) => regex.is_match(text),
            MatchPattern::ExactText(expected) => expected == text,
        }
    }
}

impl fmt::Debug for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPattern::Default => write!(f, "Default"),
            MatchPattern::Predicate(_) => write!(f, "Predicate(..)"),
            MatchPattern::Pattern(regex) => f.debug_tuple("Pattern").field(regex).finish(),
            MatchPattern::ExactText(text) => f.debug_tuple("ExactText").field(text).finish(),
        }
    }
}

impl From<&MatchPatternOption> for MatchPattern {
    /// Regex compile errors are caught by `Config::validate`; an invalid pattern
    /// that slips through degrades to exact-text matching.
    fn from(option: &MatchPatternOption) -> Self {
        match option {
            MatchPatternOption::Exact(text)
            | MatchPatternOption::Tagged(TaggedMatchPattern::Exact(text)) => {
                MatchPattern::ExactText(text.clone())
            }
            MatchPatternOption::Tagged(TaggedMatchPattern::Pattern(pattern)) => {
                match Regex::new(pattern) {
                    Ok(regex) => MatchPattern::Pattern(regex),
                    Err(_) => MatchPattern::ExactText(pattern.clone()),
                }
            }
        }
    }
}

#[derive(Debug)]
pub struct Detector {
    exclude: Vec<Regex>,
    pattern: MatchPattern,
    cache: HashMap<String, bool>,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(Vec::new(), MatchPattern::Default)
    }
}

impl Detector {
    pub fn new(exclude: Vec<Regex>, pattern: MatchPattern) -> Self {
        Self {
            exclude,
            pattern,
            cache: HashMap::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let exclude = config.exclude.compile()?;
        let pattern = config
            .match_pattern
            .as_ref()
            .map(MatchPattern::from)
            .unwrap_or(MatchPattern::Default);
        Ok(Self::new(exclude, pattern))
    }

    /// Whether `text` is a translation candidate.
    ///
    /// When `file_path` is given and matches an exclusion pattern, the answer is
    /// `false` regardless of content.
    pub fn should_extract(&mut self, text: &str, file_path: Option<&str>) -> bool {
        if let Some(path) = file_path
            && self.is_excluded(path)
        {
            return false;
        }

        if text == PROTO_KEY {
            return false;
        }

        if let Some(&cached) = self.cache.get(text) {
            return cached;
        }
        let result = self.pattern.matches(text);
        self.cache.insert(text.to_string(), result);
        result
    }

    pub fn is_excluded(&self, file_path: &str) -> bool {
        self.exclude.iter().any(|regex| regex.is_match(file_path))
    }
}
