//! Wikilinks engine: link resolution, probing and document rewriting.
mod batch;
mod cache;
mod fsprobe;
mod markdown;
mod persist;
mod remote;
mod resolver;
mod rewriter;
mod sniff;
mod types;

pub use batch::{BatchRunner, RunOptions, DEFAULT_MARKDOWN_EXTENSIONS};
pub use cache::Cache;
pub use fsprobe::{
    detect_mime_type, get_extension, resolve_candidate_path, strip_extension_and_reencode,
    ResolvedPath,
};
pub use markdown::{collect_link_sites, LinkSite};
pub use persist::{replace_file, AtomicFileWriter, PersistError};
pub use remote::{ProbeSettings, RemoteProber, ReqwestProber};
pub use resolver::LinkResolver;
pub use rewriter::LinkRewriter;
pub use sniff::sniff_mime_type;
pub use types::{RewriteOutcome, RunError, RunSummary};
