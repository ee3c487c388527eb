use crate::engine::Extractor;
use crate::extract::{FormsExtractor, NotifyExtractor, PayExtractor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Container holding the published report.
pub const REPORT_CONTAINER: &str = "dsp-numbers-bucket";

/// Object name of the published report inside [`REPORT_CONTAINER`].
pub const REPORT_OBJECT: &str = "data.json";

pub const PAY_URL: &str = "https://www.payments.service.gov.uk/performance/";
pub const NOTIFY_URL: &str = "https://www.notifications.service.gov.uk/features/performance";
pub const FORMS_URL: &str = "https://www.forms.service.gov.uk/performance";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SiteId {
    #[serde(rename = "govuk_pay")]
    Pay,
    #[serde(rename = "govuk_notify")]
    Notify,
    #[serde(rename = "govuk_forms")]
    Forms,
}

impl SiteId {
    pub const ALL: [SiteId; 3] = [SiteId::Pay, SiteId::Notify, SiteId::Forms];

    /// Key used for this site in the published JSON.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Pay => "govuk_pay",
            Self::Notify => "govuk_notify",
            Self::Forms => "govuk_forms",
        }
    }

    /// Human readable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pay => "GOV.UK Pay",
            Self::Notify => "GOV.UK Notify",
            Self::Forms => "GOV.UK Forms",
        }
    }

    /// Accepts either the JSON key (`govuk_pay`) or the short name (`pay`).
    pub fn from_raw(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_ascii_lowercase();
        let short = lower.strip_prefix("govuk_").unwrap_or(&lower);
        match short {
            "pay" => Some(Self::Pay),
            "notify" => Some(Self::Notify),
            "forms" => Some(Self::Forms),
            _ => None,
        }
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Field name → raw trimmed text for one site. Missing fields are absent keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet(pub BTreeMap<String, String>);

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `field`, or log a warning and leave the key absent.
    pub fn record(&mut self, site: SiteId, field: &str, value: Option<String>) {
        match value {
            Some(v) => {
                self.0.insert(field.to_string(), v);
            }
            None => {
                tracing::warn!(site = site.key(), field, "field not found on page");
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for MetricSet {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// The document published on every run: always exactly one entry per site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedReport {
    pub govuk_pay: MetricSet,
    pub govuk_notify: MetricSet,
    pub govuk_forms: MetricSet,
}

impl CombinedReport {
    pub fn get(&self, site: SiteId) -> &MetricSet {
        match site {
            SiteId::Pay => &self.govuk_pay,
            SiteId::Notify => &self.govuk_notify,
            SiteId::Forms => &self.govuk_forms,
        }
    }

    pub fn set(&mut self, site: SiteId, metrics: MetricSet) {
        match site {
            SiteId::Pay => self.govuk_pay = metrics,
            SiteId::Notify => self.govuk_notify = metrics,
            SiteId::Forms => self.govuk_forms = metrics,
        }
    }
}

/// One scraped page: where it lives and how to read it.
#[derive(Clone)]
pub struct SourceSite {
    pub id: SiteId,
    pub url: String,
    pub extractor: &'static dyn Extractor,
}

impl SourceSite {
    pub fn new(id: SiteId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            extractor: extractor_for(id),
        }
    }

    /// The three production pages.
    pub fn defaults() -> Vec<SourceSite> {
        vec![
            SourceSite::new(SiteId::Pay, PAY_URL),
            SourceSite::new(SiteId::Notify, NOTIFY_URL),
            SourceSite::new(SiteId::Forms, FORMS_URL),
        ]
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

impl fmt::Debug for SourceSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceSite")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("extractor", &self.extractor.name())
            .finish()
    }
}

pub fn extractor_for(id: SiteId) -> &'static dyn Extractor {
    match id {
        SiteId::Pay => &PayExtractor,
        SiteId::Notify => &NotifyExtractor,
        SiteId::Forms => &FormsExtractor,
    }
}

/// Address of one object in a [`crate::services::BlobStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobKey {
    pub container: String,
    pub name: String,
}

impl BlobKey {
    pub fn new(container: &str, name: &str) -> Self {
        Self {
            container: container.to_string(),
            name: name.to_string(),
        }
    }

    /// `dsp-numbers-bucket/data.json`
    pub fn report() -> Self {
        Self::new(REPORT_CONTAINER, REPORT_OBJECT)
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container, self.name)
    }
}
