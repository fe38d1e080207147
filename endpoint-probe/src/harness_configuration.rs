use crate::{error::Error, http_client::HttpClient, ReqwestHttpClient};
use std::{sync::Arc, time::Duration};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HarnessConfiguration {
    base_url: Url,
    default_timeout: Duration,
    concurrency: usize,
    http_client: Option<Arc<dyn HttpClient + Send + Sync>>,
}

impl HarnessConfiguration {
    /// Fails when `base_url` is not an absolute http(s) URL.
    pub fn new<S: AsRef<str>>(base_url: S) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url.as_ref())?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "{} is not an http(s) base URL",
                base_url
            )));
        }

        // targets are appended to the base path, which join only does for a
        // path ending in a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            default_timeout: DEFAULT_TIMEOUT,
            concurrency: 1,
            http_client: None,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn set_default_timeout(&mut self, timeout: Duration) {
        self.default_timeout = timeout;
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Upper bound on requests in flight for `Harness::run_concurrently`.
    /// Values below one are treated as one.
    pub fn set_concurrency(&mut self, concurrency: usize) {
        self.concurrency = concurrency.max(1);
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn http_client(&self) -> Arc<dyn HttpClient + Send + Sync> {
        self.http_client
            .clone()
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()))
    }

    pub fn set_http_client(&mut self, http_client: Arc<dyn HttpClient + Send + Sync>) {
        self.http_client = Some(http_client);
    }

    /// Appends a case target to the base URL, keeping any path prefix the
    /// base has. Absolute targets replace it.
    pub fn resolve(&self, target: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(target.trim_start_matches('/'))?)
    }
}
