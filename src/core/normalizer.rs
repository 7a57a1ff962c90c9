use crate::models::{CleanedAd, RawAd};

/// Concatenates the ASCII digits of `text` into an integer; 0 when there are none.
///
/// Currency symbols, units, separators and decimal points are all dropped, so
/// "1 234,50 kr" becomes 123450. Values beyond `u64::MAX` saturate.
pub fn normalize_digits(text: &str) -> u64 {
    text.chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit))
        })
}

/// Missing fields normalize to 0.
pub fn normalize_field(field: Option<&str>) -> u64 {
    field.map(normalize_digits).unwrap_or(0)
}

pub fn clean_ad(ad: &RawAd) -> CleanedAd {
    CleanedAd {
        url: ad.url.clone(),
        price: normalize_field(ad.price.as_deref()),
        mileage: normalize_field(ad.mileage.as_deref()),
    }
}

pub fn clean_ads(ads: &[RawAd]) -> Vec<CleanedAd> {
    ads.iter().map(clean_ad).collect()
}
