use crate::engine::Fetcher as FetcherT;
use crate::error::{DspError, Result};
use crate::extract::truncate_chars;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::redirect;
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const REDIRECT_LIMIT: usize = 10;
const LOG_PREFIX_CHARS: usize = 500;
const DEFAULT_USER_AGENT: &str = concat!("dsp-numbers/", env!("CARGO_PKG_VERSION"));

/// Single-attempt GET with a blocking reqwest client.
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-GB,en;q=0.9"));
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .redirect(redirect::Policy::limited(REDIRECT_LIMIT))
            .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .build()
            .map_err(|e| DspError::Config(format!("failed to build http client: {e}")))?;

        Ok(Self { client })
    }
}

impl FetcherT for ReqwestFetcher {
    fn name(&self) -> &'static str {
        "reqwest-blocking"
    }

    fn fetch_blocking(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| DspError::fetch_error(url, e))?;
        let text = resp.text().map_err(|e| DspError::fetch_error(url, e))?;

        tracing::debug!(
            url,
            bytes = text.len(),
            "raw HTML (first {LOG_PREFIX_CHARS} chars): {}",
            truncate_chars(&text, LOG_PREFIX_CHARS)
        );
        Ok(text)
    }
}
