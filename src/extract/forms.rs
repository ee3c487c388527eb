//! GOV.UK Forms performance page.

use super::utils::*;
use crate::engine::Extractor;
use crate::error::Result;
use crate::selectors::{FORMS_BIG_NUMBER, FORMS_BIG_NUMBER_VALUE};
use crate::types::{MetricSet, SiteId};
use scraper::Html;

const PUBLISHED_FORMS_PHRASE: &str = "published forms";

pub struct FormsExtractor;

impl Extractor for FormsExtractor {
    fn name(&self) -> &'static str {
        "govuk-forms"
    }

    fn site(&self) -> SiteId {
        SiteId::Forms
    }

    fn extract_document(&self, doc: &Html) -> Result<MetricSet> {
        let mut data = MetricSet::new();
        let site = self.site();
        let blocks: Vec<_> = doc.select(&FORMS_BIG_NUMBER).collect();

        // Matched by text: the first block mentioning published forms.
        let published = blocks
            .iter()
            .find(|block| block.text().collect::<String>().contains(PUBLISHED_FORMS_PHRASE))
            .and_then(|block| select_text_within(block, &FORMS_BIG_NUMBER_VALUE));
        data.record(site, "published_forms", published);

        // Positional: submissions is assumed to be the last big number on the page.
        let submissions = blocks
            .last()
            .and_then(|block| select_text_within(block, &FORMS_BIG_NUMBER_VALUE));
        data.record(site, "form_submissions", submissions);

        Ok(data)
    }
}
