/// Where a link points to, decided purely from its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkLocation {
    /// Resolved against the filesystem.
    Local,
    /// Absolute URI with an authority (`scheme://...`) or protocol-relative (`//host/...`).
    Remote,
}

/// Classifies a link that already had any base prefix removed.
pub fn classify(link: &str) -> LinkLocation {
    if link.starts_with("//") || has_scheme_and_authority(link) {
        LinkLocation::Remote
    } else {
        LinkLocation::Local
    }
}

/// Removes a literal `base` prefix from `link`.
///
/// The prefix only counts when it ends on a path boundary, so a base of
/// `docs` strips `docs/intro.md` but leaves `docs-intro.md` alone.
pub fn strip_base_prefix<'a>(link: &'a str, base: Option<&str>) -> &'a str {
    let Some(base) = base.map(|b| b.trim_end_matches('/')).filter(|b| !b.is_empty()) else {
        return link;
    };
    match link.strip_prefix(base) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => link,
    }
}

// ^[a-zA-Z][a-zA-Z0-9+.-]*://
fn has_scheme_and_authority(link: &str) -> bool {
    let Some((scheme, _)) = link.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}
