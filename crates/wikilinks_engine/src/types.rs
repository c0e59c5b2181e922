use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result of rewriting one document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RewriteOutcome {
    pub text: String,
    pub links_found: usize,
    pub links_rewritten: usize,
    pub links_ignored: usize,
    /// Remote links whose probe failed or returned a non-2xx status.
    pub unreachable: Vec<String>,
}

impl RewriteOutcome {
    pub fn changed(&self, original: &str) -> bool {
        self.text != original
    }
}

/// Totals for one batch run over a directory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub scanned: usize,
    pub changed: usize,
    pub failed: usize,
    pub links_rewritten: usize,
    pub unreachable: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files scanned, {} changed, {} failed, {} links rewritten",
            self.scanned, self.changed, self.failed, self.links_rewritten
        )?;
        if self.unreachable > 0 {
            write!(f, ", {} remote links unreachable", self.unreachable)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("root path {0:?} does not exist or is not a directory")]
    InvalidRoot(PathBuf),
}
