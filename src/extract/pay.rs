//! GOV.UK Pay performance page.
//!
//! The three headline figures are read positionally from the third grid row;
//! the organisation count is anchored on its `h2` heading text.

use super::utils::*;
use crate::engine::Extractor;
use crate::error::Result;
use crate::selectors::{H2, PAY_LIVE_SERVICES, PAY_TOTAL_AMOUNT, PAY_TRANSACTIONS};
use crate::types::{MetricSet, SiteId};
use scraper::{ElementRef, Html};

const ORGANISATIONS_HEADING: &str = "Organisations using GOV.UK Pay";
const ORGANISATIONS_VALUE_CLASSES: [&str; 2] = ["govuk-heading-l", "govuk-!-margin-bottom-0"];

pub struct PayExtractor;

impl Extractor for PayExtractor {
    fn name(&self) -> &'static str {
        "govuk-pay"
    }

    fn site(&self) -> SiteId {
        SiteId::Pay
    }

    fn extract_document(&self, doc: &Html) -> Result<MetricSet> {
        let mut data = MetricSet::new();
        let site = self.site();

        data.record(site, "live_services", select_text(doc, &PAY_LIVE_SERVICES));
        data.record(site, "transactions_processed", select_text(doc, &PAY_TRANSACTIONS));
        data.record(site, "total_amount", select_text(doc, &PAY_TOTAL_AMOUNT));
        data.record(site, "organisations", organisations(doc));

        Ok(data)
    }
}

fn organisations(doc: &Html) -> Option<String> {
    let heading = organisations_heading(doc)?;
    next_in_document(doc, &heading, "div", &ORGANISATIONS_VALUE_CLASSES)
        .map(|el| element_text(&el))
}

fn organisations_heading(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&H2)
        .find(|h2| normalize_heading(&h2.text().collect::<String>()) == ORGANISATIONS_HEADING)
}
