//! Wikilinks core: pure link classification, descriptors and ignore rules.
mod classify;
mod descriptor;
mod ignore;
mod parts;

pub use classify::{classify, strip_base_prefix, LinkLocation};
pub use descriptor::{
    is_markdown_mime, LinkDescriptor, LocalLink, ProbeOutcome, RemoteLink, MARKDOWN_MIME_TYPES,
};
pub use ignore::{IgnoreFilter, IgnoreRuleError, LinkFilter};
pub use parts::{extension, parse_local_link, parse_remote_link, ParsedLink, SYNTHETIC_BASE};
