use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::SelectorConfig;
use crate::models::RawAd;
use crate::{AppError, Result};

/// Pulls ad rows out of a listings page using pre-compiled selectors.
#[derive(Debug, Clone)]
pub struct AdExtractor {
    row: Selector,
    url: Selector,
    price: Selector,
    mileage: Selector,
}

fn compile(name: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AppError::Parse {
        message: format!("invalid {} selector '{}': {:?}", name, selector, e),
    })
}

/// Text content of an element with whitespace runs collapsed.
fn element_text(element: ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_match<'a>(row: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    row.select(selector).next()
}

/// `href` of the first ad link in the row.
pub fn ad_url(row: ElementRef, selector: &Selector) -> Option<String> {
    first_match(row, selector)
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
}

/// Text of the first element matching `selector` in the row.
pub fn field_text(row: ElementRef, selector: &Selector) -> Option<String> {
    first_match(row, selector).map(element_text)
}

impl AdExtractor {
    pub fn new(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            row: compile("ad_row", &config.ad_row)?,
            url: compile("ad_url", &config.ad_url)?,
            price: compile("price", &config.price)?,
            mileage: compile("mileage", &config.mileage)?,
        })
    }

    /// One record per matched row, in document order. Missing fields stay `None`.
    pub fn extract(&self, html: &str) -> Vec<RawAd> {
        let document = Html::parse_document(html);

        let ads: Vec<RawAd> = document
            .select(&self.row)
            .map(|row| RawAd {
                url: ad_url(row, &self.url),
                price: field_text(row, &self.price),
                mileage: field_text(row, &self.mileage),
            })
            .collect();

        debug!(rows = ads.len(), "Extracted ad rows");
        ads
    }
}
