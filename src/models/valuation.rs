use serde::{Deserialize, Serialize};

use super::listing::MISSING_FIELD;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValuationBucket {
    /// Asking price is at least the threshold below the fitted price.
    Undervalued,
    /// Asking price is at least the threshold above the fitted price.
    Overvalued,
    Normal,
}

impl ValuationBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            ValuationBucket::Undervalued => "undervalued",
            ValuationBucket::Overvalued => "overvalued",
            ValuationBucket::Normal => "normal",
        }
    }

    /// Point color in the scatter plot.
    pub fn color(self) -> &'static str {
        match self {
            ValuationBucket::Undervalued => "green",
            ValuationBucket::Overvalued => "red",
            ValuationBucket::Normal => "blue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub url: Option<String>,
    pub price: u64,
    pub mileage: u64,
    pub fitted_price: f64,
    /// fitted_price - price; positive means the ad is cheaper than predicted.
    pub deviation: f64,
    /// deviation / price, or 0 when the price is 0.
    pub relative_deviation: f64,
    pub bucket: ValuationBucket,
}

impl Valuation {
    pub fn url_or_missing(&self) -> &str {
        self.url.as_deref().unwrap_or(MISSING_FIELD)
    }
}

/// Row of the results CSV table.
#[derive(Debug, Serialize)]
pub struct ValuationRow<'a> {
    pub url: &'a str,
    pub price: u64,
    pub mileage: u64,
    pub under_over_valued: f64,
    pub potential_roi: f64,
}

impl<'a> From<&'a Valuation> for ValuationRow<'a> {
    fn from(valuation: &'a Valuation) -> Self {
        ValuationRow {
            url: valuation.url_or_missing(),
            price: valuation.price,
            mileage: valuation.mileage,
            under_over_valued: valuation.deviation,
            potential_roi: valuation.relative_deviation,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub undervalued: usize,
    pub overvalued: usize,
    pub normal: usize,
}

impl BucketSummary {
    pub fn from_valuations(valuations: &[Valuation]) -> Self {
        valuations.iter().fold(Self::default(), |mut summary, v| {
            match v.bucket {
                ValuationBucket::Undervalued => summary.undervalued += 1,
                ValuationBucket::Overvalued => summary.overvalued += 1,
                ValuationBucket::Normal => summary.normal += 1,
            }
            summary
        })
    }

    pub fn total(&self) -> usize {
        self.undervalued + self.overvalued + self.normal
    }
}
