//! Ignore-filter configuration.
//!
//! The filter is a YAML mapping from link globs to either one file glob or a
//! list of file globs:
//!
//! ```yaml
//! "*.md": "drafts/**"
//! "assets/*":
//!   - "index.md"
//!   - "guide/*.md"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;
use wikilinks_core::{IgnoreFilter, IgnoreRuleError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid ignore filter: {0}")]
    InvalidFormat(String),
    #[error(transparent)]
    Rule(#[from] IgnoreRuleError),
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no path given: pass PATH, --path or set INPUT_PATH")]
    MissingPath,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FilePatterns {
    One(String),
    Many(Vec<String>),
}

impl From<FilePatterns> for Vec<String> {
    fn from(patterns: FilePatterns) -> Self {
        match patterns {
            FilePatterns::One(pattern) => vec![pattern],
            FilePatterns::Many(patterns) => patterns,
        }
    }
}

/// Parses an ignore-filter document into `(link glob, file globs)` pairs,
/// keeping document order. Blank input yields no rules.
pub fn parse_ignore_rules(source: &str) -> Result<Vec<(String, Vec<String>)>, ConfigError> {
    if source.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value =
        serde_yaml::from_str(source).map_err(|err| ConfigError::InvalidFormat(err.to_string()))?;
    let mapping = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(mapping) => mapping,
        _ => {
            return Err(ConfigError::InvalidFormat(
                "expected a mapping of link globs to file globs".to_string(),
            ))
        }
    };

    let mut rules = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let Value::String(link) = key else {
            return Err(ConfigError::InvalidFormat(format!(
                "link glob {key:?} is not a string"
            )));
        };
        let patterns: FilePatterns = serde_yaml::from_value(value).map_err(|_| {
            ConfigError::InvalidFormat(format!(
                "files for \"{link}\" must be a glob or a list of globs"
            ))
        })?;
        rules.push((link, patterns.into()));
    }
    Ok(rules)
}

/// Builds the filter from the inline document or, failing that, the file.
pub fn load_ignore_filter(
    inline: Option<&str>,
    file: Option<&Path>,
) -> Result<IgnoreFilter, ConfigError> {
    let source = match (inline, file) {
        (Some(inline), _) => inline.to_string(),
        (None, Some(path)) => fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?,
        (None, None) => return Ok(IgnoreFilter::default()),
    };
    Ok(IgnoreFilter::new(parse_ignore_rules(&source)?)?)
}
