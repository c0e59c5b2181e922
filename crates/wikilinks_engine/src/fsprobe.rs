use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use wikilinks_core::{extension, parse_local_link};

use crate::sniff::{sniff_mime_type, SNIFF_LEN};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Characters left alone by `encodeURIComponent`, plus `/` so path
/// separators survive.
const LINK_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'/');

/// Outcome of matching a local link against the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// First existing candidate, or the original link when none exists.
    pub path: String,
    pub exists: bool,
    /// Query left over after the match; `None` when it was part of the file name.
    pub query: Option<String>,
    /// Fragment left over after the match; `None` when it was part of the file name.
    pub fragment: Option<String>,
}

/// Detects the MIME type of `path`: content sniffing first, then the
/// extension, then `application/octet-stream`. I/O errors only disable sniffing.
pub fn detect_mime_type(path: &Path) -> String {
    if let Some(mime) = read_header(path).ok().and_then(|header| sniff_mime_type(&header)) {
        return mime.to_string();
    }
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME)
        .to_string()
}

/// Extension of the last path segment; see [`wikilinks_core::extension`].
pub fn get_extension(path: &str) -> Option<&str> {
    extension(path)
}

/// Finds the file a local link most likely refers to.
///
/// Candidates, in order: raw path, percent-decoded path, raw path + query,
/// raw path + fragment, decoded path + query, decoded path + fragment. The
/// suffixed forms cover file names that literally contain `?` or `#`.
pub fn resolve_candidate_path(link: &str, base: Option<&str>) -> ResolvedPath {
    let Some(parsed) = parse_local_link(link) else {
        return ResolvedPath {
            path: link.to_string(),
            exists: false,
            query: None,
            fragment: None,
        };
    };

    let query = parsed.query.as_deref();
    let fragment = parsed.fragment.as_deref();
    let mut candidates: Vec<(String, Option<&str>, Option<&str>)> = Vec::with_capacity(6);

    if !parsed.path.is_empty() {
        let paths: Vec<&str> = std::iter::once(parsed.path.as_str())
            .chain(parsed.decoded_path.as_deref().filter(|d| *d != parsed.path))
            .collect();
        for path in &paths {
            candidates.push((join_base(base, path), query, fragment));
        }
        for path in &paths {
            if let Some(q) = query {
                candidates.push((join_base(base, &format!("{path}{q}")), None, fragment));
            }
            if let Some(f) = fragment {
                candidates.push((join_base(base, &format!("{path}{f}")), query, None));
            }
        }
    }

    for (candidate, query, fragment) in candidates {
        if Path::new(&candidate).exists() {
            return ResolvedPath {
                path: candidate,
                exists: true,
                query: query.map(str::to_string),
                fragment: fragment.map(str::to_string),
            };
        }
    }

    ResolvedPath {
        path: link.to_string(),
        exists: false,
        query: parsed.query,
        fragment: parsed.fragment,
    }
}

/// Builds the canonical rewritten link for `path`.
///
/// The path is made relative to `base` when it lives under it, loses
/// `.{extension}`, is percent-encoded with `/` kept, and gets `query` and
/// `fragment` appended.
pub fn strip_extension_and_reencode(
    path: &str,
    extension: Option<&str>,
    query: Option<&str>,
    fragment: Option<&str>,
    base: Option<&str>,
) -> String {
    let mut name = base
        .filter(|b| !b.is_empty())
        .and_then(|b| Path::new(path).strip_prefix(b).ok())
        .map(slash_joined)
        .unwrap_or_else(|| path.to_string());

    let stem_len = extension.and_then(|ext| {
        name.strip_suffix(ext)
            .and_then(|rest| rest.strip_suffix('.'))
            .map(str::len)
    });
    if let Some(len) = stem_len {
        name.truncate(len);
    }

    let mut link = utf8_percent_encode(&name, LINK_PATH).to_string();
    if let Some(q) = query {
        link.push_str(q);
    }
    if let Some(f) = fragment {
        link.push_str(f);
    }
    link
}

fn join_base(base: Option<&str>, path: &str) -> String {
    match base.map(|b| b.trim_end_matches('/')).filter(|b| !b.is_empty()) {
        Some(base) => format!("{base}/{path}"),
        None => path.to_string(),
    }
}

fn slash_joined(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn read_header(path: &Path) -> io::Result<Vec<u8>> {
    let mut header = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut header)?;
    Ok(header)
}
