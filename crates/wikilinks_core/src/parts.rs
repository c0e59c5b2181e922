use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use url::Url;

/// Base every local link is parsed against to split path, query and fragment.
pub const SYNTHETIC_BASE: &str = "file://relative-url.localhost/";

/// Components of a link after URL parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    /// Path as serialized by the URL parser, without the leading `/`.
    pub path: String,
    /// `path` percent-decoded, or `None` if it holds a malformed escape or invalid UTF-8.
    pub decoded_path: Option<String>,
    /// Query including the leading `?`; never empty.
    pub query: Option<String>,
    /// Fragment including the leading `#`; never empty.
    pub fragment: Option<String>,
}

impl ParsedLink {
    fn from_url(url: &Url) -> Self {
        let path = url.path();
        let path = path.strip_prefix('/').unwrap_or(path).to_string();
        let decoded_path = strict_percent_decode(&path);
        Self {
            path,
            decoded_path,
            query: non_empty_component('?', url.query()),
            fragment: non_empty_component('#', url.fragment()),
        }
    }
}

/// Parses a local link against [`SYNTHETIC_BASE`].
///
/// A leading `name:` is kept as part of the path rather than read as a URI
/// scheme, since local file names may contain colons.
pub fn parse_local_link(link: &str) -> Option<ParsedLink> {
    let base = Url::parse(SYNTHETIC_BASE).ok()?;
    let input = if starts_with_colon_segment(link) {
        Cow::Owned(format!("./{link}"))
    } else {
        Cow::Borrowed(link)
    };
    let url = base.join(&input).ok()?;
    Some(ParsedLink::from_url(&url))
}

/// Parses an absolute or protocol-relative URL.
pub fn parse_remote_link(link: &str) -> Option<ParsedLink> {
    let url = match link.strip_prefix("//") {
        Some(rest) => Url::parse(&format!("https://{rest}")).ok()?,
        None => Url::parse(link).ok()?,
    };
    Some(ParsedLink::from_url(&url))
}

/// Extension of the final path segment, without the dot.
///
/// Returns `None` for names without a dot, dot-files, a trailing dot, or a
/// candidate extension that still carries a `?` or `#`.
pub fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let dot = name.rfind('.')?;
    if dot == 0 {
        return None;
    }
    let ext = &name[dot + 1..];
    if ext.is_empty() || ext.contains(['?', '#']) {
        return None;
    }
    Some(ext)
}

fn non_empty_component(delimiter: char, value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| format!("{delimiter}{v}"))
}

fn starts_with_colon_segment(link: &str) -> bool {
    match link.find([':', '/', '?', '#']) {
        Some(idx) => idx > 0 && link[idx..].starts_with(':'),
        None => false,
    }
}

// Rejects `%` not followed by two hex digits, like decodeURIComponent does.
fn strict_percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    percent_decode_str(input)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_path_query_and_fragment() {
        let parsed = parse_local_link("to-a-file.md?x=1#my-headline").unwrap();
        assert_eq!(parsed.path, "to-a-file.md");
        assert_eq!(parsed.query.as_deref(), Some("?x=1"));
        assert_eq!(parsed.fragment.as_deref(), Some("#my-headline"));
    }

    #[test]
    fn empty_components_are_none() {
        let parsed = parse_local_link("page.md?#").unwrap();
        assert_eq!(parsed.query, None);
        assert_eq!(parsed.fragment, None);
    }

    #[test]
    fn colon_prefix_stays_in_path() {
        let parsed = parse_local_link("special:characters-included.md").unwrap();
        assert_eq!(parsed.path, "special:characters-included.md");
        assert_eq!(
            parsed.decoded_path.as_deref(),
            Some("special:characters-included.md")
        );
    }

    #[test]
    fn spaces_are_encoded_and_decoded_path_restores_them() {
        let parsed = parse_local_link("my file.md").unwrap();
        assert_eq!(parsed.path, "my%20file.md");
        assert_eq!(parsed.decoded_path.as_deref(), Some("my file.md"));
    }

    #[test]
    fn malformed_escape_has_no_decoded_path() {
        let parsed = parse_local_link("incorrect-%E0%A4%A-special.md").unwrap();
        assert_eq!(parsed.decoded_path, None);
    }

    #[test]
    fn leading_slash_and_dot_segments_are_normalized() {
        assert_eq!(parse_local_link("/abs/page.md").unwrap().path, "abs/page.md");
        assert_eq!(parse_local_link("./a/../b.md").unwrap().path, "b.md");
    }

    #[test]
    fn remote_links_keep_their_components() {
        let parsed = parse_remote_link("https://search.example.com/a?q=1#somePointer").unwrap();
        assert_eq!(parsed.path, "a");
        assert_eq!(parsed.query.as_deref(), Some("?q=1"));
        assert_eq!(parsed.fragment.as_deref(), Some("#somePointer"));

        let relative = parse_remote_link("//cdn.example.com/lib.js").unwrap();
        assert_eq!(relative.path, "lib.js");
    }

    #[test]
    fn extension_rules() {
        assert_eq!(extension("dir/file.md"), Some("md"));
        assert_eq!(extension("dir.v2/file"), None);
        assert_eq!(extension("dir/.hidden"), None);
        assert_eq!(extension("file."), None);
        assert_eq!(extension("file.md?x=1"), None);
        assert_eq!(extension("file.md#top"), None);
        assert_eq!(extension("archive.tar.gz"), Some("gz"));
    }
}
