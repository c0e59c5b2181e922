use crate::parts::extension;

/// MIME types treated as Markdown documents.
pub const MARKDOWN_MIME_TYPES: [&str; 3] = ["text/markdown", "text/x-markdown", "application/markdown"];

/// Whether `mime_type` names a Markdown document. Parameters such as
/// `; charset=utf-8` are ignored.
pub fn is_markdown_mime(mime_type: &str) -> bool {
    let essence = mime_type.split(';').next().unwrap_or(mime_type).trim();
    MARKDOWN_MIME_TYPES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(essence))
}

/// Resolved metadata for one link, either on disk or behind a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDescriptor {
    Local(LocalLink),
    Remote(RemoteLink),
}

/// A link resolved against the filesystem. Built once, never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalLink {
    pub exists: bool,
    pub mime_type: Option<String>,
    pub query: Option<String>,
    pub fragment: Option<String>,
    /// Best-guess path on disk, or the original link when nothing matched.
    pub real_file_name: String,
    pub extension: Option<String>,
    /// Canonical rewritten link; only set when the target exists.
    pub file_name_without_extension: Option<String>,
}

/// A link to a remote resource.
///
/// Classification alone does no network I/O; `probe` stays `None` until the
/// descriptor is hydrated with a [`ProbeOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLink {
    pub url: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
    pub probe: Option<ProbeOutcome>,
}

/// Result of an existence/metadata probe against a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// HTTP status, `0` when the request failed or timed out.
    pub status_code: u16,
    pub mime_type: Option<String>,
    pub real_file_name: Option<String>,
    pub error: Option<String>,
}

impl LocalLink {
    /// A link whose target could not be looked up at all.
    pub fn missing(link: &str) -> Self {
        Self {
            exists: false,
            mime_type: None,
            query: None,
            fragment: None,
            real_file_name: link.to_string(),
            extension: None,
            file_name_without_extension: None,
        }
    }
}

impl ProbeOutcome {
    /// A probe that never got a response.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status_code: 0,
            mime_type: None,
            real_file_name: None,
            error: Some(error.into()),
        }
    }

    pub fn exists(&self) -> bool {
        (200..300).contains(&self.status_code) && self.error.is_none()
    }
}

impl RemoteLink {
    /// Returns a copy of this link carrying the probe result.
    pub fn hydrated(&self, outcome: ProbeOutcome) -> Self {
        Self {
            probe: Some(outcome),
            ..self.clone()
        }
    }
}

impl LinkDescriptor {
    pub fn is_local(&self) -> bool {
        matches!(self, LinkDescriptor::Local(_))
    }

    pub fn exists(&self) -> bool {
        match self {
            LinkDescriptor::Local(local) => local.exists,
            LinkDescriptor::Remote(remote) => remote.probe.as_ref().is_some_and(ProbeOutcome::exists),
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match self {
            LinkDescriptor::Local(local) => local.mime_type.as_deref(),
            LinkDescriptor::Remote(remote) => remote.probe.as_ref()?.mime_type.as_deref(),
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            LinkDescriptor::Local(local) => local.query.as_deref(),
            LinkDescriptor::Remote(remote) => remote.query.as_deref(),
        }
    }

    pub fn fragment(&self) -> Option<&str> {
        match self {
            LinkDescriptor::Local(local) => local.fragment.as_deref(),
            LinkDescriptor::Remote(remote) => remote.fragment.as_deref(),
        }
    }

    pub fn real_file_name(&self) -> Option<&str> {
        match self {
            LinkDescriptor::Local(local) => Some(&local.real_file_name),
            LinkDescriptor::Remote(remote) => remote.probe.as_ref()?.real_file_name.as_deref(),
        }
    }

    pub fn extension(&self) -> Option<&str> {
        match self {
            LinkDescriptor::Local(local) => local.extension.as_deref(),
            LinkDescriptor::Remote(_) => extension(self.real_file_name()?),
        }
    }

    pub fn file_name_without_extension(&self) -> Option<&str> {
        match self {
            LinkDescriptor::Local(local) => local.file_name_without_extension.as_deref(),
            LinkDescriptor::Remote(_) => None,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            LinkDescriptor::Local(_) => 0,
            LinkDescriptor::Remote(remote) => remote.probe.as_ref().map_or(0, |p| p.status_code),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LinkDescriptor::Local(_) => None,
            LinkDescriptor::Remote(remote) => remote.probe.as_ref()?.error.as_deref(),
        }
    }

    pub fn is_markdown(&self) -> bool {
        self.mime_type().is_some_and(is_markdown_mime)
    }

    /// The link to substitute for this one, if it should be rewritten at all.
    ///
    /// Only existing local Markdown targets qualify; everything else keeps
    /// its original text.
    pub fn rewrite_target(&self) -> Option<&str> {
        match self {
            LinkDescriptor::Local(local) if local.exists && self.is_markdown() => {
                local.file_name_without_extension.as_deref()
            }
            _ => None,
        }
    }
}
