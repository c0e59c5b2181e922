use std::path::Path;
use std::sync::Arc;

use link_logging::{link_error, link_trace};
use tokio::task;
use wikilinks_core::{
    classify, extension, parse_remote_link, strip_base_prefix, LinkDescriptor, LinkLocation,
    LocalLink, RemoteLink,
};

use crate::cache::Cache;
use crate::fsprobe::{detect_mime_type, resolve_candidate_path, strip_extension_and_reencode};
use crate::remote::RemoteProber;

/// Turns raw links into [`LinkDescriptor`]s, memoized per run.
///
/// Local links are resolved against `base`; remote links are only parsed
/// until [`LinkResolver::hydrate`] probes them.
pub struct LinkResolver {
    base: Option<String>,
    cache: Arc<Cache<LinkDescriptor>>,
    prober: Arc<dyn RemoteProber>,
}

impl LinkResolver {
    pub fn new(
        base: Option<String>,
        cache: Arc<Cache<LinkDescriptor>>,
        prober: Arc<dyn RemoteProber>,
    ) -> Self {
        Self {
            base: base.filter(|b| !b.is_empty()),
            cache,
            prober,
        }
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn cache(&self) -> &Cache<LinkDescriptor> {
        &self.cache
    }

    /// Resolves `link`, reusing the cached descriptor for a link seen before.
    pub async fn resolve(&self, link: &str) -> LinkDescriptor {
        let key = strip_base_prefix(link, self.base.as_deref());
        self.cache
            .remember_async(key, || self.describe_off_thread(key))
            .await
    }

    // Local resolution stats and reads files, so it runs on the blocking
    // pool and lookups from one document overlap.
    async fn describe_off_thread(&self, link: &str) -> LinkDescriptor {
        if classify(link) == LinkLocation::Remote {
            return LinkDescriptor::Remote(describe_remote(link));
        }
        let owned = link.to_string();
        let base = self.base.clone();
        match task::spawn_blocking(move || describe_local(&owned, base.as_deref())).await {
            Ok(local) => LinkDescriptor::Local(local),
            Err(err) => {
                link_error!("Resolving {} failed: {}", link, err);
                LinkDescriptor::Local(LocalLink::missing(link))
            }
        }
    }

    /// Builds a fresh descriptor without consulting the cache.
    pub fn describe(&self, link: &str) -> LinkDescriptor {
        match classify(link) {
            LinkLocation::Local => LinkDescriptor::Local(describe_local(link, self.base.as_deref())),
            LinkLocation::Remote => LinkDescriptor::Remote(describe_remote(link)),
        }
    }

    /// Probes an unprobed remote descriptor and caches the hydrated copy.
    ///
    /// Local and already hydrated descriptors come back unchanged.
    pub async fn hydrate(&self, descriptor: LinkDescriptor) -> LinkDescriptor {
        match descriptor {
            LinkDescriptor::Remote(remote) if remote.probe.is_none() => {
                let outcome = self.prober.probe(&remote.url).await;
                link_trace!("Probed {} -> status {}", remote.url, outcome.status_code);
                let hydrated = LinkDescriptor::Remote(remote.hydrated(outcome));
                self.cache.set(remote.url.as_str(), hydrated)
            }
            other => other,
        }
    }
}

fn describe_local(link: &str, base: Option<&str>) -> LocalLink {
    let resolved = resolve_candidate_path(link, base);
    let extension = extension(&resolved.path).map(str::to_string);
    let mime_type = resolved
        .exists
        .then(|| detect_mime_type(Path::new(&resolved.path)));
    let file_name_without_extension = resolved.exists.then(|| {
        strip_extension_and_reencode(
            &resolved.path,
            extension.as_deref(),
            resolved.query.as_deref(),
            resolved.fragment.as_deref(),
            base,
        )
    });

    LocalLink {
        exists: resolved.exists,
        mime_type,
        query: resolved.query,
        fragment: resolved.fragment,
        real_file_name: resolved.path,
        extension,
        file_name_without_extension,
    }
}

fn describe_remote(link: &str) -> RemoteLink {
    let parsed = parse_remote_link(link);
    RemoteLink {
        url: link.to_string(),
        query: parsed.as_ref().and_then(|p| p.query.clone()),
        fragment: parsed.and_then(|p| p.fragment),
        probe: None,
    }
}
