//! Listing page extraction
//!
//! Turns an index-page body into raw listing fragments using the configured
//! CSS selectors. Everything here is verbatim text capture in display order;
//! numeric parsing and cleanup belong to the downstream ETL.

use crate::config::SelectorConfig;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// One extracted listing, pre-enrichment: the summary-page data only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFragment {
    /// Listing title, empty when the anchor carries no title attribute
    pub title: String,

    /// Absolute detail-page link; the listing's identity
    pub detail_link: String,

    /// Short description, empty when absent
    pub description: String,

    /// Displayed price, empty when absent
    pub price_text: String,

    /// Auxiliary details (rooms, surface, options) in display order
    pub detail_fields: Vec<String>,
}

/// The listing-page selectors, compiled once per run
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    listing: Selector,
    title_link: Selector,
    description: Selector,
    price: Selector,
    details: Selector,
}

impl ListingSelectors {
    /// Compiles the configured selector strings.
    ///
    /// Validation already checked these parse, but compilation can still be
    /// reached with a hand-built config, so the error path stays.
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            listing: compile(&config.listing)?,
            title_link: compile(&config.title_link)?,
            description: compile(&config.description)?,
            price: compile(&config.price)?,
            details: compile(&config.details)?,
        })
    }
}

pub(crate) fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Builds the index URL for one segment page.
///
/// The site paginates as `{base}{segment}/?p={page}&allp=1`; `base` is the
/// validated base URL with its trailing slash.
pub fn listing_page_url(base_url: &str, segment: &str, page: u32) -> String {
    format!("{}{}/?p={}&allp=1", base_url, segment, page)
}

/// Extracts all listing fragments from an index-page body.
///
/// Fragments with no usable detail link are dropped: without identity they
/// can be neither deduplicated nor enriched. An empty return value is the
/// normal exhaustion signal for the page, not a failure.
pub fn extract_fragments(
    body: &str,
    selectors: &ListingSelectors,
    site_base: &Url,
) -> Vec<RawFragment> {
    let document = Html::parse_document(body);
    let mut fragments = Vec::new();

    for listing in document.select(&selectors.listing) {
        let Some(anchor) = listing.select(&selectors.title_link).next() else {
            tracing::debug!("Listing block without a title anchor, dropped");
            continue;
        };

        let Some(href) = anchor.value().attr("href") else {
            tracing::debug!("Title anchor without href, dropped");
            continue;
        };

        let detail_link = match site_base.join(href.trim()) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::debug!("Unresolvable detail link '{}': {}", href, e);
                continue;
            }
        };

        let title = anchor
            .value()
            .attr("title")
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        let description = first_text(&listing, &selectors.description);
        let price_text = first_text(&listing, &selectors.price);

        let detail_fields: Vec<String> = listing
            .select(&selectors.details)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect();

        fragments.push(RawFragment {
            title,
            detail_link,
            description,
            price_text,
            detail_fields,
        });
    }

    fragments
}

/// Text of the first element matching `selector`, empty when none matches
fn first_text(scope: &ElementRef, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(|e| element_text(e))
        .unwrap_or_default()
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
