use super::store::BlobStore;
use crate::engine::{Aggregator, Fetcher};
use crate::error::{DspError, Result};
use crate::types::{BlobKey, CombinedReport, SourceSite};
use std::time::Instant;

pub const REPORT_CONTENT_TYPE: &str = "application/json";

/// Overwrite the report blob with the indented JSON form of `report`.
pub fn publish_report(store: &dyn BlobStore, report: &CombinedReport) -> Result<()> {
    let key = BlobKey::report();
    let body = serde_json::to_vec_pretty(report)?;
    store.put(&key, &body, REPORT_CONTENT_TYPE)?;
    tracing::info!(store = store.name(), bytes = body.len(), "data successfully uploaded to {key}");
    Ok(())
}

/// Current report blob as JSON, `None` if nothing has been published yet.
pub fn read_report(store: &dyn BlobStore) -> Result<Option<serde_json::Value>> {
    let key = BlobKey::report();
    match store.get(&key)? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| DspError::storage_error("decode", format!("{key}: {e}"))),
        None => Ok(None),
    }
}

/// One full invocation: scrape every site, then publish.
///
/// Only the publish step can fail the run; per-site failures are already
/// folded into empty entries by the [`Aggregator`].
pub fn run_and_publish(
    fetcher: &dyn Fetcher,
    sites: Vec<SourceSite>,
    store: &dyn BlobStore,
) -> Result<CombinedReport> {
    let start = Instant::now();
    tracing::info!(fetcher = fetcher.name(), sites = sites.len(), "run started");

    let report = Aggregator::new(fetcher, sites).run();
    if let Ok(pretty) = serde_json::to_string_pretty(&report) {
        tracing::info!("combined scraped data: {pretty}");
    }

    match publish_report(store, &report) {
        Ok(()) => {
            tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "run succeeded");
            Ok(report)
        }
        Err(e) => {
            tracing::error!(elapsed_ms = start.elapsed().as_millis() as u64, "error uploading data: {e}");
            Err(e)
        }
    }
}
