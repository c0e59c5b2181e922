use std::ops::Range;

use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TagEnd};

/// A link destination found in a Markdown source.
///
/// `range` points at the destination's bytes in the source, which are
/// exactly `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSite {
    pub range: Range<usize>,
    pub url: String,
}

struct OpenLink {
    range: Range<usize>,
    url: String,
    inner_end: usize,
    inline: bool,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Finds every link destination in `source` that can be replaced in place.
///
/// Covers inline links and link reference definitions. Destinations written
/// with backslash escapes or entities do not appear verbatim in the source
/// and are skipped. Images and autolinks are not collected.
pub fn collect_link_sites(source: &str) -> Vec<LinkSite> {
    let parser = Parser::new_ext(source, parser_options());

    let mut sites: Vec<LinkSite> = parser
        .reference_definitions()
        .iter()
        .filter_map(|(_, def)| {
            let label_end = source[def.span.clone()].find("]:")? + 2;
            locate(source, def.span.start + label_end, def.span.end, &def.dest)
        })
        .collect();

    let mut open: Vec<OpenLink> = Vec::new();
    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                ..
            }) => {
                open.push(OpenLink {
                    inner_end: range.start,
                    range,
                    url: dest_url.to_string(),
                    inline: link_type == LinkType::Inline,
                });
            }
            Event::End(TagEnd::Link) => {
                let Some(link) = open.pop() else {
                    continue;
                };
                if let Some(parent) = open.last_mut() {
                    parent.inner_end = parent.inner_end.max(link.range.end);
                }
                if link.inline {
                    sites.extend(locate_inline(source, &link));
                }
            }
            _ => {
                if let Some(link) = open.last_mut() {
                    link.inner_end = link.inner_end.max(range.end);
                }
            }
        }
    }

    sites.sort_by_key(|site| site.range.start);
    sites.dedup_by_key(|site| site.range.start);
    sites
}

// The destination follows the `](` that closes the link text.
fn locate_inline(source: &str, link: &OpenLink) -> Option<LinkSite> {
    let tail = source.get(link.inner_end..link.range.end)?;
    let open_paren = link.inner_end + tail.find("](")? + 2;
    locate(source, open_paren, link.range.end, &link.url)
}

// The destination must be the first token after `from`; one spelled with
// escapes or entities differs from `url` and is not replaceable.
fn locate(source: &str, from: usize, to: usize, url: &str) -> Option<LinkSite> {
    if url.is_empty() {
        return None;
    }
    let window = source.get(from..to)?;
    let trimmed = window.trim_start_matches([' ', '\t', '\r', '\n']);
    let (unbracketed, bracketed) = match trimmed.strip_prefix('<') {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };
    let rest = unbracketed.strip_prefix(url)?;
    let terminated = if bracketed {
        rest.starts_with('>')
    } else {
        rest.is_empty() || rest.starts_with([' ', '\t', '\r', '\n', ')'])
    };
    if !terminated {
        return None;
    }
    let start = from + (window.len() - unbracketed.len());
    Some(LinkSite {
        range: start..start + url.len(),
        url: url.to_string(),
    })
}
