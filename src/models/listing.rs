use serde::{Deserialize, Serialize};

/// Written in place of a field that was missing from the ad row.
pub const MISSING_FIELD: &str = "N/A";

/// One ad row as found in the document. `None` means the sub-element was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAd {
    pub url: Option<String>,
    pub price: Option<String>,
    pub mileage: Option<String>,
}

/// An ad after its price and mileage text has been reduced to integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedAd {
    pub url: Option<String>,
    pub price: u64,
    pub mileage: u64,
}

impl CleanedAd {
    pub fn url_or_missing(&self) -> &str {
        self.url.as_deref().unwrap_or(MISSING_FIELD)
    }
}

/// Row of the raw CSV table.
#[derive(Debug, Serialize)]
pub struct RawAdRow<'a> {
    pub url: &'a str,
    pub price: &'a str,
    pub mileage: &'a str,
}

impl<'a> From<&'a RawAd> for RawAdRow<'a> {
    fn from(ad: &'a RawAd) -> Self {
        RawAdRow {
            url: ad.url.as_deref().unwrap_or(MISSING_FIELD),
            price: ad.price.as_deref().unwrap_or(MISSING_FIELD),
            mileage: ad.mileage.as_deref().unwrap_or(MISSING_FIELD),
        }
    }
}

/// Row of the cleaned CSV table.
#[derive(Debug, Serialize)]
pub struct CleanedAdRow<'a> {
    pub url: &'a str,
    pub price: u64,
    pub mileage: u64,
}

impl<'a> From<&'a CleanedAd> for CleanedAdRow<'a> {
    fn from(ad: &'a CleanedAd) -> Self {
        CleanedAdRow {
            url: ad.url_or_missing(),
            price: ad.price,
            mileage: ad.mileage,
        }
    }
}
