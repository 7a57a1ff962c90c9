//! Ordinary least squares fit of price against mileage.
//!
//! Degenerate inputs have fixed answers instead of NaNs:
//!
//! - no points: slope and intercept 0, no fitted values, `r_squared` is `None`
//! - one point, or all mileages equal: slope 0, intercept is the mean price
//! - all prices equal: R² is 1.0 for a perfect fit, otherwise 0.0

use serde::{Deserialize, Serialize};

use crate::models::CleanedAd;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    /// Fitted price per input point, same order as the input.
    pub fitted: Vec<f64>,
    /// In-sample coefficient of determination; `None` when there was nothing to fit.
    pub r_squared: Option<f64>,
}

impl RegressionResult {
    pub fn predict(&self, mileage: f64) -> f64 {
        self.slope * mileage + self.intercept
    }
}

/// Fits `y = slope * x + intercept` over paired samples.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> RegressionResult {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len().min(ys.len());

    if n == 0 {
        return RegressionResult {
            slope: 0.0,
            intercept: 0.0,
            fitted: Vec::new(),
            r_squared: None,
        };
    }

    let xs = &xs[..n];
    let ys = &ys[..n];
    let count = n as f64;
    let mean_x = xs.iter().sum::<f64>() / count;
    let mean_y = ys.iter().sum::<f64>() / count;

    let (sxx, sxy) = xs.iter().zip(ys).fold((0.0, 0.0), |(sxx, sxy), (x, y)| {
        let dx = x - mean_x;
        (sxx + dx * dx, sxy + dx * (y - mean_y))
    });

    // Sxx == 0 covers a single point and identical mileages
    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    let intercept = mean_y - slope * mean_x;

    let fitted: Vec<f64> = xs.iter().map(|x| slope * x + intercept).collect();

    let ss_res: f64 = ys.iter().zip(&fitted).map(|(y, f)| (y - f).powi(2)).sum();
    let ss_tot: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();

    let r_squared = if ss_tot == 0.0 {
        if ss_res == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    };

    RegressionResult {
        slope,
        intercept,
        fitted,
        r_squared: Some(r_squared),
    }
}

/// Regresses price on mileage for the cleaned ads.
pub fn fit_price_on_mileage(ads: &[CleanedAd]) -> RegressionResult {
    let mileages: Vec<f64> = ads.iter().map(|ad| ad.mileage as f64).collect();
    let prices: Vec<f64> = ads.iter().map(|ad| ad.price as f64).collect();
    fit_line(&mileages, &prices)
}
