use crate::error::{DspError, Result};
use crate::types::{CombinedReport, MetricSet, SiteId, SourceSite};
use scraper::Html;
use std::time::Instant;

pub trait Fetcher: Send + Sync {
    fn name(&self) -> &'static str;
    /// GET `url` and return the body; non-2xx is an error.
    fn fetch_blocking(&self, url: &str) -> Result<String>;
}

pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn site(&self) -> SiteId;
    /// Read every field that can be located. Missing anchors are omitted, never errors.
    fn extract_document(&self, doc: &Html) -> Result<MetricSet>;

    /// An empty body parses to an empty document and yields an empty set.
    fn extract(&self, html: &str) -> Result<MetricSet> {
        let doc = Html::parse_document(html);
        self.extract_document(&doc)
    }
}

/// Runs fetch + extract for every site, one after another.
pub struct Aggregator<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub sites: Vec<SourceSite>,
}

impl<'a> Aggregator<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, sites: Vec<SourceSite>) -> Self {
        Self { fetcher, sites }
    }

    pub fn with_default_sites(fetcher: &'a dyn Fetcher) -> Self {
        Self::new(fetcher, SourceSite::defaults())
    }

    /// Never fails: a broken site contributes an empty [`MetricSet`].
    pub fn run(&self) -> CombinedReport {
        let mut report = CombinedReport::default();
        for site in &self.sites {
            report.set(site.id, self.scrape_site(site));
        }
        report
    }

    pub fn scrape_site(&self, site: &SourceSite) -> MetricSet {
        let start = Instant::now();
        tracing::info!(site = site.id.key(), url = %site.url, "scraping {}", site.id.name());

        let result = self
            .fetcher
            .fetch_blocking(&site.url)
            .and_then(|html| site.extractor.extract(&html));

        match result {
            Ok(metrics) => {
                tracing::info!(
                    site = site.id.key(),
                    fields = metrics.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "scraped {}: {:?}",
                    site.id.name(),
                    metrics.0
                );
                metrics
            }
            Err(e @ DspError::Fetch { .. }) => {
                tracing::error!(site = site.id.key(), "HTTP request failed for {}: {e}", site.id.name());
                MetricSet::new()
            }
            Err(e) => {
                tracing::error!(site = site.id.key(), "error parsing {} data: {e}", site.id.name());
                MetricSet::new()
            }
        }
    }
}
