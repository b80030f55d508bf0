//! Detail page enrichment
//!
//! A listing's summary block omits the location; it lives on the detail
//! page. The site has shipped that field under several different nodes over
//! time, so extraction runs an ordered chain of selectors and takes the
//! first that matches. All of them missing is an extraction gap, not an
//! error: the field stays empty.

use crate::config::SelectorConfig;
use crate::crawler::extractor::compile;
use crate::ConfigError;
use scraper::{Html, Selector};

/// The ordered location selector chain, compiled once per run
#[derive(Debug, Clone)]
pub struct LocationChain {
    selectors: Vec<Selector>,
}

impl LocationChain {
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        let selectors = config
            .location
            .iter()
            .map(|s| compile(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }

    /// Extracts the location string from a detail page body.
    ///
    /// Strategies are tried in configured order; the first selector with a
    /// non-empty match wins.
    pub fn extract(&self, body: &str) -> Option<String> {
        let document = Html::parse_document(body);
        for selector in &self.selectors {
            if let Some(element) = document.select(selector).next() {
                let text = element.text().collect::<String>().trim().to_string();
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        None
    }
}
