//! Pipeline tests: aggregation, end-to-end publishing and the reader endpoint.

#[cfg(test)]
mod tests {
    use crate::engine::{Aggregator, Extractor, Fetcher};
    use crate::error::{DspError, Result};
    use crate::services::*;
    use crate::types::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use scraper::Html;
    use std::collections::HashMap;
    use std::sync::Arc;

    const PAY_HTML: &str = r#"<!DOCTYPE html><html><body><main>
        <div class="govuk-grid-row"><div><h1>Performance</h1></div></div>
        <div class="govuk-grid-row"><div><p>Since 2016</p></div></div>
        <div class="govuk-grid-row">
            <div><div class="govuk-heading-l">12</div></div>
            <div><div class="govuk-heading-l">3,456,789</div></div>
            <div><div class="govuk-heading-l">£1.2bn</div></div>
        </div>
        <div class="govuk-grid-row"><div>
            <h2>Organisations using GOV.UK&nbsp;Pay</h2>
            <div class="govuk-heading-l govuk-!-margin-bottom-0">150</div>
        </div></div>
    </main></body></html>"#;

    const NOTIFY_HTML: &str = r#"<!DOCTYPE html><html><body>
        <h2 id="messages-sent-since-may-2016">Messages sent since May 2016</h2>
        <div class="totals"><span class="product-page-big-number">9,876,543,210</span></div>
        <h2 id="organisations-using-notify">Organisations using Notify</h2>
        <p class="totals--2-column">
            <span class="totals__all"><span class="product-page-big-number">1,234</span></span>
            <span class="totals__set-type"><span class="product-page-big-number">8,765</span></span>
        </p>
    </body></html>"#;

    const FORMS_HTML: &str = r#"<!DOCTYPE html><html><body>
        <div class="app-metrics__big-number"><span class="app-metrics__big-number-number">1,234</span> published forms</div>
        <div class="app-metrics__big-number"><span class="app-metrics__big-number-number">98,765</span> form submissions</div>
    </body></html>"#;

    fn pay_metrics() -> MetricSet {
        MetricSet::from([
            ("live_services", "12"),
            ("transactions_processed", "3,456,789"),
            ("total_amount", "£1.2bn"),
            ("organisations", "150"),
        ])
    }

    fn notify_metrics() -> MetricSet {
        MetricSet::from([
            ("messages_sent", "9,876,543,210"),
            ("organisations", "1,234"),
            ("services", "8,765"),
        ])
    }

    fn forms_metrics() -> MetricSet {
        MetricSet::from([("published_forms", "1,234"), ("form_submissions", "98,765")])
    }

    /// Serves canned bodies by URL; anything unknown is a fetch failure.
    struct CannedFetcher {
        pages: HashMap<&'static str, &'static str>,
    }

    impl CannedFetcher {
        fn all_sites() -> Self {
            Self {
                pages: HashMap::from([
                    (PAY_URL, PAY_HTML),
                    (NOTIFY_URL, NOTIFY_HTML),
                    (FORMS_URL, FORMS_HTML),
                ]),
            }
        }

        fn without(mut self, url: &str) -> Self {
            self.pages.remove(url);
            self
        }

        fn replace(mut self, url: &'static str, body: &'static str) -> Self {
            self.pages.insert(url, body);
            self
        }
    }

    impl Fetcher for CannedFetcher {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn fetch_blocking(&self, url: &str) -> Result<String> {
            self.pages.get(url).map(|s| s.to_string()).ok_or_else(|| {
                DspError::fetch_error(
                    url,
                    std::io::Error::new(std::io::ErrorKind::Other, "HTTP status 500"),
                )
            })
        }
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl BlobStore for ReadOnlyStore {
        fn name(&self) -> &'static str {
            "read-only"
        }
        fn get(&self, _key: &BlobKey) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }
        fn put(&self, key: &BlobKey, _bytes: &[u8], _content_type: &str) -> Result<()> {
            Err(DspError::storage_error("write", format!("{key}: permission denied")))
        }
    }

    /// Extractor that gives up on every document.
    struct BrokenExtractor;

    impl Extractor for BrokenExtractor {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn site(&self) -> SiteId {
            SiteId::Forms
        }
        fn extract_document(&self, _doc: &Html) -> Result<MetricSet> {
            Err(DspError::extraction_error(
                self.site().key(),
                "unexpected document layout",
            ))
        }
    }

    /* ---------- aggregator ---------- */

    #[test]
    fn test_aggregator_combines_all_sites() {
        let fetcher = CannedFetcher::all_sites();
        let report = Aggregator::with_default_sites(&fetcher).run();
        assert_eq!(
            report,
            CombinedReport {
                govuk_pay: pay_metrics(),
                govuk_notify: notify_metrics(),
                govuk_forms: forms_metrics(),
            }
        );
    }

    #[test]
    fn test_one_failed_fetch_only_empties_that_site() {
        for failing in SiteId::ALL {
            let url = SourceSite::defaults()
                .into_iter()
                .find(|s| s.id == failing)
                .map(|s| s.url)
                .unwrap();
            let fetcher = CannedFetcher::all_sites().without(&url);
            let report = Aggregator::with_default_sites(&fetcher).run();

            for site in SiteId::ALL {
                let metrics = report.get(site);
                if site == failing {
                    assert!(metrics.is_empty(), "{site} should be empty");
                } else {
                    assert!(!metrics.is_empty(), "{site} should be populated");
                }
            }
        }
    }

    #[test]
    fn test_fatal_extraction_only_empties_that_site() {
        let fetcher = CannedFetcher::all_sites();
        let mut sites = SourceSite::defaults();
        sites[2] = SourceSite {
            id: SiteId::Forms,
            url: FORMS_URL.to_string(),
            extractor: &BrokenExtractor,
        };
        let report = Aggregator::new(&fetcher, sites).run();
        assert_eq!(report.govuk_pay, pay_metrics());
        assert_eq!(report.govuk_notify, notify_metrics());
        assert!(report.govuk_forms.is_empty());
    }

    #[test]
    fn test_blank_page_publishes_empty_site() {
        let fetcher = CannedFetcher::all_sites().replace(FORMS_URL, "   ");
        let store = MemoryStore::new();
        let report = run_and_publish(&fetcher, SourceSite::defaults(), &store).unwrap();
        assert_eq!(report.govuk_pay, pay_metrics());
        assert!(report.govuk_forms.is_empty());
        assert_eq!(
            read_report(&store).unwrap().unwrap()["govuk_forms"],
            serde_json::json!({})
        );
    }

    #[test]
    fn test_all_fetches_failing_still_yields_three_keys() {
        let fetcher = CannedFetcher {
            pages: HashMap::new(),
        };
        let report = Aggregator::with_default_sites(&fetcher).run();
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({ "govuk_pay": {}, "govuk_notify": {}, "govuk_forms": {} })
        );
    }

    /* ---------- run ---------- */

    #[test]
    fn test_run_publishes_report() {
        let store = MemoryStore::new();
        let report =
            run_and_publish(&CannedFetcher::all_sites(), SourceSite::defaults(), &store).unwrap();

        let published = read_report(&store).unwrap().unwrap();
        assert_eq!(published, serde_json::to_value(&report).unwrap());
        assert_eq!(published["govuk_pay"]["total_amount"], "£1.2bn");
    }

    #[test]
    fn test_run_fails_only_when_publish_fails() {
        let err = run_and_publish(
            &CannedFetcher::all_sites(),
            SourceSite::defaults(),
            &ReadOnlyStore,
        )
        .unwrap_err();
        assert!(matches!(err, DspError::Storage { .. }));
    }

    #[test]
    fn test_notify_server_error_still_publishes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pay");
            then.status(200).body(PAY_HTML);
        });
        server.mock(|when, then| {
            when.method(GET).path("/notify");
            then.status(500).body("Internal Server Error");
        });
        server.mock(|when, then| {
            when.method(GET).path("/forms");
            then.status(200).body(FORMS_HTML);
        });

        let sites = vec![
            SourceSite::new(SiteId::Pay, server.url("/pay")),
            SourceSite::new(SiteId::Notify, server.url("/notify")),
            SourceSite::new(SiteId::Forms, server.url("/forms")),
        ];
        let store = MemoryStore::new();
        let fetcher = ReqwestFetcher::new().unwrap();

        let report = run_and_publish(&fetcher, sites, &store).unwrap();

        assert_eq!(report.govuk_pay, pay_metrics());
        assert_eq!(report.govuk_notify, MetricSet::new());
        assert_eq!(report.govuk_forms, forms_metrics());
        assert_eq!(
            read_report(&store).unwrap().unwrap()["govuk_notify"],
            serde_json::json!({})
        );
    }

    /* ---------- reader endpoint ---------- */

    mod reader {
        use super::*;
        use crate::server::router;
        use axum::body::{to_bytes, Body};
        use axum::http::{Request, StatusCode};
        use pretty_assertions::assert_eq;
        use tower::ServiceExt;

        async fn get(store: Arc<dyn BlobStore>, uri: &str) -> (StatusCode, Vec<u8>) {
            let resp = router(store)
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            let status = resp.status();
            let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            (status, body.to_vec())
        }

        #[tokio::test]
        async fn test_data_serves_published_report() {
            let store = Arc::new(MemoryStore::new());
            let report = CombinedReport {
                govuk_pay: pay_metrics(),
                govuk_notify: MetricSet::new(),
                govuk_forms: forms_metrics(),
            };
            publish_report(store.as_ref(), &report).unwrap();

            let (status, body) = get(store, "/data").await;
            assert_eq!(status, StatusCode::OK);
            let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(value, serde_json::to_value(&report).unwrap());
        }

        #[tokio::test]
        async fn test_data_is_not_found_before_first_publish() {
            let (status, body) = get(Arc::new(MemoryStore::new()), "/data").await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(
                value,
                serde_json::json!({ "ok": false, "error": "dsp-numbers-bucket/data.json has not been published yet" })
            );
        }

        #[tokio::test]
        async fn test_data_with_corrupt_blob_is_server_error() {
            let store = Arc::new(MemoryStore::new());
            store
                .put(&BlobKey::report(), b"{ truncated", REPORT_CONTENT_TYPE)
                .unwrap();
            let (status, _) = get(store, "/data").await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        }

        #[tokio::test]
        async fn test_index_serves_html_page() {
            let (status, body) = get(Arc::new(MemoryStore::new()), "/").await;
            assert_eq!(status, StatusCode::OK);
            let html = String::from_utf8(body).unwrap();
            assert!(html.contains("fetch(\"/data\")"));
        }
    }
}
