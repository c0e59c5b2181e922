use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use link_logging::{link_debug, link_error, link_info};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};
use wikilinks_core::LinkFilter;

use crate::cache::Cache;
use crate::persist::{replace_file, PersistError};
use crate::remote::RemoteProber;
use crate::resolver::LinkResolver;
use crate::rewriter::LinkRewriter;
use crate::types::{RewriteOutcome, RunError, RunSummary};

/// File extensions treated as Markdown documents unless configured otherwise.
pub const DEFAULT_MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory to walk; also the base every local link resolves against.
    pub root: PathBuf,
    pub extensions: Vec<String>,
    /// Resolve and report without writing anything back.
    pub dry_run: bool,
    pub probe_remote: bool,
}

impl RunOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_MARKDOWN_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            dry_run: false,
            probe_remote: false,
        }
    }
}

#[derive(Debug, Error)]
enum FileError {
    #[error("read failed: {0}")]
    Read(#[from] io::Error),
    #[error("write failed: {0}")]
    Write(#[from] PersistError),
}

/// Rewrites every Markdown document below a root directory.
///
/// One cache is shared by all documents of the run, so a link that appears
/// in many files is resolved once.
pub struct BatchRunner {
    options: RunOptions,
    rewriter: LinkRewriter,
}

impl BatchRunner {
    pub fn new(
        options: RunOptions,
        prober: Arc<dyn RemoteProber>,
        filter: Option<Arc<dyn LinkFilter>>,
    ) -> Self {
        let base = options.root.to_string_lossy().into_owned();
        let resolver = Arc::new(LinkResolver::new(Some(base), Arc::new(Cache::new()), prober));
        let mut rewriter = LinkRewriter::new(resolver).with_remote_probing(options.probe_remote);
        if let Some(filter) = filter {
            rewriter = rewriter.with_filter(filter);
        }
        Self { options, rewriter }
    }

    pub fn rewriter(&self) -> &LinkRewriter {
        &self.rewriter
    }

    pub async fn run(&self) -> Result<RunSummary, RunError> {
        let root = &self.options.root;
        if !root.is_dir() {
            return Err(RunError::InvalidRoot(root.clone()));
        }

        let mut summary = RunSummary::default();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    link_error!("Failed to walk {:?}: {}", root, err);
                    summary.failed += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.is_markdown_file(entry.path()) {
                continue;
            }

            summary.scanned += 1;
            match self.process_file(entry.path()).await {
                Ok((outcome, changed)) => {
                    summary.links_rewritten += outcome.links_rewritten;
                    summary.unreachable += outcome.unreachable.len();
                    if changed {
                        summary.changed += 1;
                    }
                }
                Err(err) => {
                    link_error!("Failed to process {:?}: {}", entry.path(), err);
                    summary.failed += 1;
                }
            }
        }

        link_info!("{}", summary);
        Ok(summary)
    }

    async fn process_file(&self, path: &Path) -> Result<(RewriteOutcome, bool), FileError> {
        let original = fs::read_to_string(path)?;
        let relative = relative_slash_path(&self.options.root, path);
        let outcome = self.rewriter.rewrite(&original, &relative).await;
        let changed = outcome.changed(&original);

        if changed {
            if self.options.dry_run {
                link_info!("{} would be updated ({} links)", relative, outcome.links_rewritten);
            } else {
                replace_file(path, &outcome.text)?;
                link_info!("{} updated ({} links)", relative, outcome.links_rewritten);
            }
        } else {
            link_debug!("{} unchanged", relative);
        }
        Ok((outcome, changed))
    }

    fn is_markdown_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| {
                self.options
                    .extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// `path` relative to `root`, joined with `/`, as matched by ignore rules.
fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
