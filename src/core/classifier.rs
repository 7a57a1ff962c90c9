use crate::core::regression::RegressionResult;
use crate::models::{CleanedAd, Valuation, ValuationBucket};

pub const DEFAULT_THRESHOLD: f64 = 0.15;

/// `(fitted - actual) / actual`, defined as 0 when the actual price is 0.
pub fn relative_deviation(fitted: f64, actual: u64) -> f64 {
    if actual == 0 {
        return 0.0;
    }
    (fitted - actual as f64) / actual as f64
}

/// Both thresholds are inclusive: exactly `+threshold` is undervalued and
/// exactly `-threshold` is overvalued.
pub fn bucket_for(relative_deviation: f64, threshold: f64) -> ValuationBucket {
    if relative_deviation >= threshold {
        ValuationBucket::Undervalued
    } else if relative_deviation <= -threshold {
        ValuationBucket::Overvalued
    } else {
        ValuationBucket::Normal
    }
}

pub fn value_ad(ad: &CleanedAd, fitted_price: f64, threshold: f64) -> Valuation {
    let deviation = fitted_price - ad.price as f64;
    let relative = relative_deviation(fitted_price, ad.price);

    Valuation {
        url: ad.url.clone(),
        price: ad.price,
        mileage: ad.mileage,
        fitted_price,
        deviation,
        relative_deviation: relative,
        bucket: bucket_for(relative, threshold),
    }
}

/// One valuation per ad, in the same order as the ads.
pub fn classify(ads: &[CleanedAd], regression: &RegressionResult, threshold: f64) -> Vec<Valuation> {
    ads.iter()
        .zip(&regression.fitted)
        .map(|(ad, fitted)| value_ad(ad, *fitted, threshold))
        .collect()
}
