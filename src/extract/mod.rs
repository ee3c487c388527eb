//! Per-site extractors
//!
//! Each extractor turns one performance page into a [`MetricSet`]. The page
//! markup is not ours, so every strategy is as fragile as the page snapshot it
//! was written against; a missing anchor only drops that field.
//!
//! [`MetricSet`]: crate::types::MetricSet

mod forms;
mod notify;
mod pay;
mod utils;

pub use forms::FormsExtractor;
pub use notify::NotifyExtractor;
pub use pay::PayExtractor;
pub use utils::truncate_chars;

use crate::error::Result;
use crate::types::{extractor_for, MetricSet, SiteId};

/// Run the extractor for `site` over raw HTML.
pub fn extract_site(site: SiteId, html: &str) -> Result<MetricSet> {
    extractor_for(site).extract(html)
}
