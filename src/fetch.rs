use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

/// Response headers keyed by lower-case name. Repeated headers are comma-joined.
pub type Headers = BTreeMap<String, String>;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// What the classifier gets to look at for one site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResult {
    /// Page body. `None` when the fetch failed.
    pub text: Option<String>,
    pub headers: Headers,
    pub source_url: String,
}

impl FetchResult {
    pub fn failed(source_url: impl Into<String>) -> Self {
        Self {
            text: None,
            headers: Headers::new(),
            source_url: source_url.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.text.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    /// Reads `PLATFORMWATCH_TIMEOUT_SECS` and `PLATFORMWATCH_USER_AGENT`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("PLATFORMWATCH_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().with_context(|| {
                format!("invalid PLATFORMWATCH_TIMEOUT_SECS={raw:?}. expected whole seconds")
            })?;
            if secs == 0 {
                anyhow::bail!("PLATFORMWATCH_TIMEOUT_SECS must be greater than zero");
            }
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(user_agent) = lookup("PLATFORMWATCH_USER_AGENT") {
            let user_agent = user_agent.trim();
            if !user_agent.is_empty() {
                config.user_agent = user_agent.to_owned();
            }
        }

        Ok(config)
    }

    /// Applies a `--timeout-secs` override, if one was given.
    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Self {
        if let Some(secs) = secs {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }
}

fn default_user_agent() -> String {
    format!("platformwatch/{}", env!("CARGO_PKG_VERSION"))
}

/// Page source for the classifier.
///
/// A fetcher is opened once per run and closed once afterwards. `fetch` never fails:
/// problems are logged and reported as [`FetchResult::failed`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;

    async fn close(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn open(config: FetchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build http client")?;
        tracing::debug!(timeout = ?config.timeout, user_agent = %config.user_agent, "opened http fetcher");
        Ok(Self { client, config })
    }

    async fn try_fetch(&self, url: &str) -> anyhow::Result<(String, Headers)> {
        let parsed = Url::parse(url).with_context(|| format!("parse url: {url}"))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("url must be http/https: {url}");
        }

        let response = self
            .client
            .get(parsed)
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            anyhow::bail!("GET {url} returned {status}");
        }

        let headers = collect_headers(response.headers());
        let text = response
            .text()
            .await
            .with_context(|| format!("read body: {url}"))?;
        Ok((text, headers))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        match self.try_fetch(url).await {
            Ok((text, headers)) => FetchResult {
                text: Some(text),
                headers,
                source_url: url.to_owned(),
            },
            Err(err) => {
                tracing::warn!(url = %url, "failed to fetch: {err:#}");
                FetchResult::failed(url)
            }
        }
    }

    async fn close(&self) -> anyhow::Result<()> {
        tracing::debug!("closed http fetcher");
        Ok(())
    }
}

fn collect_headers(map: &reqwest::header::HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        match headers.entry(name.as_str().to_ascii_lowercase()) {
            Entry::Occupied(mut entry) => {
                let joined = entry.get_mut();
                joined.push_str(", ");
                joined.push_str(&value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }
    headers
}
