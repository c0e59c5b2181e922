use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::join_all;
use link_logging::{link_debug, link_trace, link_warn};
use wikilinks_core::{LinkDescriptor, LinkFilter};

use crate::markdown::{collect_link_sites, LinkSite};
use crate::resolver::LinkResolver;
use crate::types::RewriteOutcome;

/// Rewrites the links of Markdown documents that point at local Markdown
/// files into their extension-less form.
///
/// Only link destinations change; every other byte of the document is kept.
pub struct LinkRewriter {
    resolver: Arc<LinkResolver>,
    filter: Option<Arc<dyn LinkFilter>>,
    probe_remote: bool,
}

impl LinkRewriter {
    pub fn new(resolver: Arc<LinkResolver>) -> Self {
        Self {
            resolver,
            filter: None,
            probe_remote: false,
        }
    }

    pub fn with_filter(mut self, filter: Arc<dyn LinkFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Also probe remote links and report the unreachable ones. Remote
    /// links are never rewritten either way.
    pub fn with_remote_probing(mut self, enabled: bool) -> Self {
        self.probe_remote = enabled;
        self
    }

    pub fn resolver(&self) -> &LinkResolver {
        &self.resolver
    }

    /// Returns `text` with every qualifying link replaced.
    pub async fn transform(&self, text: &str, file_path: &str) -> String {
        self.rewrite(text, file_path).await.text
    }

    /// Like [`LinkRewriter::transform`], with per-document counts.
    pub async fn rewrite(&self, text: &str, file_path: &str) -> RewriteOutcome {
        let sites = collect_link_sites(text);
        let links_found = sites.len();

        let (candidates, ignored): (Vec<LinkSite>, Vec<LinkSite>) =
            sites.into_iter().partition(|site| !self.is_ignored(&site.url, file_path));
        for site in &ignored {
            link_trace!("Ignoring {} in {}", site.url, file_path);
        }

        let descriptors = self.resolve_all(&candidates).await;

        let mut unreachable = Vec::new();
        if self.probe_remote {
            for (url, descriptor) in &descriptors {
                if !descriptor.is_local() && !descriptor.exists() {
                    link_warn!(
                        "Unreachable link {} in {}: {}",
                        url,
                        file_path,
                        descriptor
                            .error()
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("status {}", descriptor.status_code()))
                    );
                    unreachable.push(url.clone());
                }
            }
            unreachable.sort();
        }

        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;
        let mut links_rewritten = 0;
        for site in &candidates {
            let Some(target) = descriptors.get(&site.url).and_then(LinkDescriptor::rewrite_target) else {
                continue;
            };
            if target == site.url {
                continue;
            }
            link_debug!("Rewriting {} -> {} in {}", site.url, target, file_path);
            output.push_str(&text[cursor..site.range.start]);
            output.push_str(target);
            cursor = site.range.end;
            links_rewritten += 1;
        }
        output.push_str(&text[cursor..]);

        RewriteOutcome {
            text: output,
            links_found,
            links_rewritten,
            links_ignored: ignored.len(),
            unreachable,
        }
    }

    fn is_ignored(&self, url: &str, file_path: &str) -> bool {
        self.filter
            .as_ref()
            .is_some_and(|filter| filter.should_ignore(url, file_path))
    }

    // Resolutions run concurrently; results are keyed by link text, so
    // completion order does not matter.
    async fn resolve_all(&self, sites: &[LinkSite]) -> HashMap<String, LinkDescriptor> {
        let mut unique: Vec<&str> = sites.iter().map(|site| site.url.as_str()).collect();
        unique.sort_unstable();
        unique.dedup();

        let lookups = unique.into_iter().map(|url| async move {
            let mut descriptor = self.resolver.resolve(url).await;
            if self.probe_remote && !descriptor.is_local() {
                descriptor = self.resolver.hydrate(descriptor).await;
            }
            (url.to_string(), descriptor)
        });
        join_all(lookups).await.into_iter().collect()
    }
}
