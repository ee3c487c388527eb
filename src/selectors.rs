//! Shared Selectors

use once_cell::sync::Lazy;
use scraper::Selector;

fn parse(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector {css:?}: {e:?}"))
}

/* ---------- GOV.UK Pay ---------- */

/// Big numbers row: live services.
pub static PAY_LIVE_SERVICES: Lazy<Selector> = Lazy::new(|| {
    parse("div.govuk-grid-row:nth-of-type(3) > div:nth-child(1) > div.govuk-heading-l")
});

/// Big numbers row: transactions processed.
pub static PAY_TRANSACTIONS: Lazy<Selector> = Lazy::new(|| {
    parse("div.govuk-grid-row:nth-of-type(3) > div:nth-child(2) > div.govuk-heading-l")
});

/// Big numbers row: total amount processed.
pub static PAY_TOTAL_AMOUNT: Lazy<Selector> = Lazy::new(|| {
    parse("div.govuk-grid-row:nth-of-type(3) > div:nth-child(3) > div.govuk-heading-l")
});

pub static H2: Lazy<Selector> = Lazy::new(|| parse("h2"));

/* ---------- GOV.UK Notify ---------- */

pub static NOTIFY_MESSAGES_HEADING: Lazy<Selector> =
    Lazy::new(|| parse("h2#messages-sent-since-may-2016"));

pub static NOTIFY_ORGANISATIONS_HEADING: Lazy<Selector> =
    Lazy::new(|| parse("h2#organisations-using-notify"));

pub static NOTIFY_ALL: Lazy<Selector> = Lazy::new(|| parse("span.totals__all"));

pub static NOTIFY_BY_TYPE: Lazy<Selector> = Lazy::new(|| parse("span.totals__set-type"));

pub static NOTIFY_BIG_NUMBER: Lazy<Selector> =
    Lazy::new(|| parse("span.product-page-big-number"));

/* ---------- GOV.UK Forms ---------- */

pub static FORMS_BIG_NUMBER: Lazy<Selector> =
    Lazy::new(|| parse("div.app-metrics__big-number"));

pub static FORMS_BIG_NUMBER_VALUE: Lazy<Selector> =
    Lazy::new(|| parse("span.app-metrics__big-number-number"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_selectors_parse() {
        for sel in [
            &PAY_LIVE_SERVICES,
            &PAY_TRANSACTIONS,
            &PAY_TOTAL_AMOUNT,
            &H2,
            &NOTIFY_MESSAGES_HEADING,
            &NOTIFY_ORGANISATIONS_HEADING,
            &NOTIFY_ALL,
            &NOTIFY_BY_TYPE,
            &NOTIFY_BIG_NUMBER,
            &FORMS_BIG_NUMBER,
            &FORMS_BIG_NUMBER_VALUE,
        ] {
            Lazy::force(sel);
        }
    }
}
