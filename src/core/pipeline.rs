use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AppConfig;
use crate::core::classifier::classify;
use crate::core::extractor::AdExtractor;
use crate::core::normalizer::clean_ads;
use crate::core::regression::{fit_price_on_mileage, RegressionResult};
use crate::models::{BucketSummary, CleanedAd, RawAd, SearchQuery, Valuation};
use crate::scraper::{build_search_url, WebScraper};
use crate::Result;

/// Everything one run produced, ready to hand to the report sinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub query: SearchQuery,
    pub request_url: String,
    pub raw_ads: Vec<RawAd>,
    pub cleaned_ads: Vec<CleanedAd>,
    pub regression: RegressionResult,
    pub valuations: Vec<Valuation>,
    pub summary: BucketSummary,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.raw_ads.is_empty()
    }
}

/// fetch → extract → normalize → fit → classify
pub struct ValuationPipeline {
    scraper: WebScraper,
    extractor: AdExtractor,
    base_url: String,
    threshold: f64,
}

impl ValuationPipeline {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            scraper: WebScraper::new(&config.scraper)?,
            extractor: AdExtractor::new(&config.scraper.selectors)?,
            base_url: config.scraper.base_url.clone(),
            threshold: config.valuation.threshold,
        })
    }

    pub async fn run(&self, query: &SearchQuery) -> Result<AnalysisReport> {
        let url = build_search_url(&self.base_url, query)?;
        let html = self.scraper.fetch(&url).await?;
        Ok(self.analyze(query, url.as_str(), &html))
    }

    /// The offline half of the pipeline, starting from an already fetched page.
    pub fn analyze(&self, query: &SearchQuery, request_url: &str, html: &str) -> AnalysisReport {
        let raw_ads = self.extractor.extract(html);
        info!(count = raw_ads.len(), "Found ads for {}", query.title());

        let cleaned_ads = clean_ads(&raw_ads);
        let regression = fit_price_on_mileage(&cleaned_ads);
        let valuations = classify(&cleaned_ads, &regression, self.threshold);
        let summary = BucketSummary::from_valuations(&valuations);

        info!(
            slope = regression.slope,
            intercept = regression.intercept,
            r_squared = ?regression.r_squared,
            undervalued = summary.undervalued,
            overvalued = summary.overvalued,
            normal = summary.normal,
            "Valuation complete"
        );

        AnalysisReport {
            query: query.clone(),
            request_url: request_url.to_string(),
            raw_ads,
            cleaned_ads,
            regression,
            valuations,
            summary,
        }
    }
}
