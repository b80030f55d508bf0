use serde::Deserialize;

/// Main configuration structure for Immo-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Ordered city slugs to traverse; order is the resume order
    pub segments: Vec<String>,

    /// Page budget per segment
    #[serde(rename = "pages-per-segment")]
    pub pages_per_segment: u32,

    /// Per-run cap on fetched listings
    #[serde(rename = "max-records-per-run")]
    pub max_records_per_run: u32,

    /// Fixed delay enforced after every request (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the listing index, e.g.
    /// `https://www.paruvendu.fr/immobilier/vente/`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Extraction rules, supplied by the collaborator that owns the site markup.
///
/// The crawler treats these as opaque CSS selectors; the defaults target the
/// markup the default site currently serves.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// One listing container on the index page
    #[serde(default = "default_listing_selector")]
    pub listing: String,

    /// Anchor carrying the listing title and detail link
    #[serde(rename = "title-link", default = "default_title_link_selector")]
    pub title_link: String,

    /// Short description paragraph
    #[serde(default = "default_description_selector")]
    pub description: String,

    /// Displayed price
    #[serde(default = "default_price_selector")]
    pub price: String,

    /// Auxiliary detail entries, in display order
    #[serde(default = "default_details_selector")]
    pub details: String,

    /// Location selectors on the detail page, tried in order until one
    /// matches
    #[serde(default = "default_location_selectors")]
    pub location: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing: default_listing_selector(),
            title_link: default_title_link_selector(),
            description: default_description_selector(),
            price: default_price_selector(),
            details: default_details_selector(),
            location: default_location_selectors(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the raw dataset CSV file
    #[serde(rename = "dataset-path")]
    pub dataset_path: String,

    /// Path to the checkpoint JSON file
    #[serde(rename = "checkpoint-path")]
    pub checkpoint_path: String,
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_listing_selector() -> String {
    "div.blocAnnonce".to_string()
}

fn default_title_link_selector() -> String {
    "h3 a".to_string()
}

fn default_description_selector() -> String {
    "p.text-justify".to_string()
}

fn default_price_selector() -> String {
    "div.encoded-lnk div".to_string()
}

fn default_details_selector() -> String {
    "div.flex.flex-wrap.gap-x-3 > *".to_string()
}

fn default_location_selectors() -> Vec<String> {
    vec![
        "span#detail_loc".to_string(),
        "div#detail_adresse".to_string(),
        "h1 span.ville".to_string(),
    ]
}
