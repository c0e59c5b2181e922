use globset::{GlobBuilder, GlobMatcher};
use thiserror::Error;

/// Decides whether a link found in a given document is exempt from rewriting.
pub trait LinkFilter: Send + Sync {
    fn should_ignore(&self, link: &str, file_path: &str) -> bool;
}

#[derive(Debug, Error)]
pub enum IgnoreRuleError {
    #[error("invalid ignore filter rule: \"{rule}\" is not allowed - {reason}")]
    Disallowed { rule: String, reason: String },
    #[error("invalid glob pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

#[derive(Debug, Clone)]
struct IgnoreRule {
    link: GlobMatcher,
    files: Vec<GlobMatcher>,
}

/// Glob rules pairing a link pattern with the document patterns it applies to.
///
/// `*` and `?` never cross a `/`; `**` does. Any matching pair ignores the
/// link, so rule order does not matter.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    rules: Vec<IgnoreRule>,
}

impl IgnoreFilter {
    /// Compiles and validates a rule set.
    ///
    /// Rejects pairs that would blanket-ignore every link (`*` -> `*`) or
    /// every Markdown link (`*.md` -> `*.md`).
    pub fn new<I>(rules: I) -> Result<Self, IgnoreRuleError>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut compiled = Vec::new();
        for (link_pattern, file_patterns) in rules {
            reject_blanket_rule(&link_pattern, &file_patterns)?;
            let files = file_patterns
                .iter()
                .map(|pattern| compile(pattern))
                .collect::<Result<Vec<_>, _>>()?;
            compiled.push(IgnoreRule {
                link: compile(&link_pattern)?,
                files,
            });
        }
        Ok(Self { rules: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

impl LinkFilter for IgnoreFilter {
    fn should_ignore(&self, link: &str, file_path: &str) -> bool {
        self.rules.iter().any(|rule| {
            rule.link.is_match(link) && rule.files.iter().any(|file| file.is_match(file_path))
        })
    }
}

fn reject_blanket_rule(link_pattern: &str, file_patterns: &[String]) -> Result<(), IgnoreRuleError> {
    const BLANKET: [(&str, &str); 2] = [
        ("*", "it would ignore all links"),
        ("*.md", "it would ignore all markdown links"),
    ];
    for (pattern, reason) in BLANKET {
        if link_pattern == pattern && file_patterns.iter().any(|file| file == pattern) {
            return Err(IgnoreRuleError::Disallowed {
                rule: format!("{pattern}:{pattern}"),
                reason: reason.to_string(),
            });
        }
    }
    Ok(())
}

fn compile(pattern: &str) -> Result<GlobMatcher, IgnoreRuleError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| IgnoreRuleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}
