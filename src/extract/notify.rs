//! GOV.UK Notify performance page. Every figure hangs off an `h2` id anchor.

use super::utils::*;
use crate::engine::Extractor;
use crate::error::Result;
use crate::selectors::{
    NOTIFY_ALL, NOTIFY_BIG_NUMBER, NOTIFY_BY_TYPE, NOTIFY_MESSAGES_HEADING,
    NOTIFY_ORGANISATIONS_HEADING,
};
use crate::types::{MetricSet, SiteId};
use scraper::{ElementRef, Html, Selector};

pub struct NotifyExtractor;

impl Extractor for NotifyExtractor {
    fn name(&self) -> &'static str {
        "govuk-notify"
    }

    fn site(&self) -> SiteId {
        SiteId::Notify
    }

    fn extract_document(&self, doc: &Html) -> Result<MetricSet> {
        let mut data = MetricSet::new();
        let site = self.site();

        let messages = doc
            .select(&NOTIFY_MESSAGES_HEADING)
            .next()
            .and_then(|h2| next_sibling_with(&h2, "div", "totals"))
            .and_then(|totals| select_text_within(&totals, &NOTIFY_BIG_NUMBER));
        data.record(site, "messages_sent", messages);

        let totals = doc
            .select(&NOTIFY_ORGANISATIONS_HEADING)
            .next()
            .and_then(|h2| next_sibling_with(&h2, "p", "totals--2-column"));
        data.record(site, "organisations", grouped_number(totals.as_ref(), &NOTIFY_ALL));
        data.record(site, "services", grouped_number(totals.as_ref(), &NOTIFY_BY_TYPE));

        Ok(data)
    }
}

/// Big number nested under one grouping span of the two-column totals paragraph.
fn grouped_number(totals: Option<&ElementRef<'_>>, group: &Selector) -> Option<String> {
    let group_el = totals?.select(group).next()?;
    select_text_within(&group_el, &NOTIFY_BIG_NUMBER)
}
