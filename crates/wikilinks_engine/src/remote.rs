use std::time::Duration;

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use wikilinks_core::ProbeOutcome;

/// Message recorded when a probe runs out of time.
pub(crate) const ABORTED: &str = "operation aborted";

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub connect_timeout: Duration,
    /// Upper bound for the whole probe, connection included.
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub user_agent: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(5),
            redirect_limit: 5,
            user_agent: concat!("wikilinks/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Existence/metadata check for remote links. Failures are reported inside
/// the returned [`ProbeOutcome`], never as errors.
#[async_trait::async_trait]
pub trait RemoteProber: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// HEAD-request prober. One client, and so one connection pool, serves
/// every probe of the prober.
#[derive(Debug, Clone)]
pub struct ReqwestProber {
    settings: ProbeSettings,
    // A client that failed to build fails every probe with the same message.
    client: Result<reqwest::Client, String>,
}

impl ReqwestProber {
    pub fn new(settings: ProbeSettings) -> Self {
        let client = build_client(&settings).map_err(|err| err.to_string());
        Self { settings, client }
    }
}

fn build_client(settings: &ProbeSettings) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
        .user_agent(settings.user_agent.as_str())
        .build()
}

impl Default for ReqwestProber {
    fn default() -> Self {
        Self::new(ProbeSettings::default())
    }
}

#[async_trait::async_trait]
impl RemoteProber for ReqwestProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let target = match url.strip_prefix("//") {
            Some(rest) => format!("https://{rest}"),
            None => url.to_string(),
        };
        let parsed = match reqwest::Url::parse(&target) {
            Ok(parsed) => parsed,
            Err(err) => return ProbeOutcome::failed(err.to_string()),
        };
        let client = match &self.client {
            Ok(client) => client,
            Err(err) => return ProbeOutcome::failed(err.clone()),
        };

        let request = client.head(parsed.clone()).send();
        let response = match tokio::time::timeout(self.settings.request_timeout, request).await {
            Err(_elapsed) => return ProbeOutcome::failed(ABORTED),
            Ok(Err(err)) if err.is_timeout() => return ProbeOutcome::failed(ABORTED),
            Ok(Err(err)) => return ProbeOutcome::failed(err.to_string()),
            Ok(Ok(response)) => response,
        };

        let headers = response.headers();
        let mime_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let real_file_name = match headers.get(CONTENT_DISPOSITION) {
            Some(value) => value.to_str().ok().and_then(disposition_filename),
            None => last_path_segment(&parsed),
        };

        ProbeOutcome {
            status_code: response.status().as_u16(),
            mime_type,
            real_file_name,
            error: None,
        }
    }
}

/// `filename` parameter of a `Content-Disposition` header value.
fn disposition_filename(value: &str) -> Option<String> {
    let start = value.find("filename=")? + "filename=".len();
    let rest = &value[start..];
    let name = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next().unwrap_or(quoted),
        None => rest.split(';').next().unwrap_or(rest).trim(),
    };
    (!name.is_empty()).then(|| name.to_string())
}

fn last_path_segment(url: &reqwest::Url) -> Option<String> {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .or_else(|| Some(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{disposition_filename, last_path_segment, ProbeSettings, ReqwestProber};

    #[test]
    fn client_is_built_with_the_prober() {
        let prober = ReqwestProber::new(ProbeSettings::default());
        assert!(prober.client.is_ok());
    }

    #[test]
    fn quoted_and_bare_disposition_filenames() {
        assert_eq!(
            disposition_filename("attachment; filename=\"report final.pdf\"").as_deref(),
            Some("report final.pdf")
        );
        assert_eq!(
            disposition_filename("attachment; filename=data.csv; size=12").as_deref(),
            Some("data.csv")
        );
        assert_eq!(disposition_filename("inline"), None);
    }

    #[test]
    fn trailing_segment_or_whole_url() {
        let url = reqwest::Url::parse("https://example.com/docs/guide.md?x=1").unwrap();
        assert_eq!(last_path_segment(&url).as_deref(), Some("guide.md"));

        let root = reqwest::Url::parse("https://example.com/").unwrap();
        assert_eq!(last_path_segment(&root).as_deref(), Some("https://example.com/"));
    }
}
