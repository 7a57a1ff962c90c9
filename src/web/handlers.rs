use askama::Template;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use clap::ValueEnum;
use serde::Deserialize;
use url::Url;

use super::{ApiResponse, AppState, WebError};
use crate::core::pipeline::AnalysisReport;
use crate::models::{FuelType, GearboxType, SearchQuery, MAX_YEAR, MIN_YEAR, MISSING_FIELD};
use crate::report::plot;
use crate::AppError;

pub const DEFAULT_MAKE: &str = "Volvo";
pub const DEFAULT_MODEL: &str = "V70";
pub const DEFAULT_START_YEAR: i32 = 2010;
pub const DEFAULT_END_YEAR: i32 = 2020;

/// Search form as submitted. Every field stays text so bad input can be
/// reported on the page instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    pub make: Option<String>,
    pub model: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
    pub fuel: Option<String>,
    pub gearbox: Option<String>,
}

fn parse_year(value: Option<&str>, default: i32, name: &str) -> Result<i32, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => text
            .parse()
            .map_err(|_| format!("{} must be a number", name)),
    }
}

fn parse_choice<T: ValueEnum>(value: Option<&str>, default: T, name: &str) -> Result<T, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => T::from_str(text, true).map_err(|_| format!("unknown {} '{}'", name, text)),
    }
}

/// Ad links on the listings site are site-relative; resolve them against its base URL.
pub fn absolute_ad_url(base_url: &str, href: &str) -> String {
    Url::parse(base_url)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}

impl SearchForm {
    pub fn is_submitted(&self) -> bool {
        self.make.is_some() || self.model.is_some()
    }

    pub fn to_query(&self) -> Result<SearchQuery, String> {
        let start_year = parse_year(self.start_year.as_deref(), DEFAULT_START_YEAR, "start year")?;
        let end_year = parse_year(self.end_year.as_deref(), DEFAULT_END_YEAR, "end year")?;
        let fuel = parse_choice(self.fuel.as_deref(), FuelType::Gasoline, "fuel type")?;
        let gearbox = parse_choice(self.gearbox.as_deref(), GearboxType::Automatic, "gearbox type")?;

        SearchQuery::new(
            self.make.as_deref().unwrap_or_default(),
            self.model.as_deref().unwrap_or_default(),
            start_year,
            end_year,
            fuel,
            gearbox,
        )
        .map_err(|e| e.to_string())
    }
}

pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub struct ResultRow {
    pub url: String,
    pub price: u64,
    pub mileage: u64,
    pub under_over_valued: i64,
    pub potential_roi: String,
    pub bucket: &'static str,
    pub color: &'static str,
}

pub struct ResultsView {
    pub title: String,
    pub ad_count: usize,
    pub r_squared: String,
    pub undervalued: usize,
    pub overvalued: usize,
    pub normal: usize,
    pub plot_svg: String,
    pub rows: Vec<ResultRow>,
}

impl ResultsView {
    fn from_report(report: &AnalysisReport, plot_svg: String, base_url: &str) -> Self {
        let rows = report
            .valuations
            .iter()
            .map(|v| ResultRow {
                url: v
                    .url
                    .as_deref()
                    .map(|href| absolute_ad_url(base_url, href))
                    .unwrap_or_else(|| MISSING_FIELD.to_string()),
                price: v.price,
                mileage: v.mileage,
                under_over_valued: v.deviation.round() as i64,
                potential_roi: format!("{:.2}", v.relative_deviation),
                bucket: v.bucket.as_str(),
                color: v.bucket.color(),
            })
            .collect();

        ResultsView {
            title: report.query.title(),
            ad_count: report.valuations.len(),
            r_squared: report
                .regression
                .r_squared
                .map(|r2| format!("{:.2}", r2))
                .unwrap_or_else(|| "undefined".to_string()),
            undervalued: report.summary.undervalued,
            overvalued: report.summary.overvalued,
            normal: report.summary.normal,
            plot_svg,
            rows,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub make: String,
    pub model: String,
    pub start_year: String,
    pub end_year: String,
    pub min_year: i32,
    pub max_year: i32,
    pub fuel_options: Vec<SelectOption>,
    pub gearbox_options: Vec<SelectOption>,
    pub error: Option<String>,
    pub warning: Option<String>,
    pub no_ads: bool,
    pub results: Option<ResultsView>,
}

impl IndexTemplate {
    fn from_form(form: &SearchForm) -> Self {
        // Unknown choices fall back to the default selection; to_query reports them
        let fuel = parse_choice(form.fuel.as_deref(), FuelType::Gasoline, "fuel type")
            .unwrap_or(FuelType::Gasoline);
        let gearbox = parse_choice(form.gearbox.as_deref(), GearboxType::Automatic, "gearbox type")
            .unwrap_or(GearboxType::Automatic);

        IndexTemplate {
            make: form.make.clone().unwrap_or_else(|| DEFAULT_MAKE.to_string()),
            model: form.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            start_year: form
                .start_year
                .clone()
                .unwrap_or_else(|| DEFAULT_START_YEAR.to_string()),
            end_year: form
                .end_year
                .clone()
                .unwrap_or_else(|| DEFAULT_END_YEAR.to_string()),
            min_year: MIN_YEAR,
            max_year: MAX_YEAR,
            fuel_options: FuelType::ALL
                .iter()
                .map(|f| SelectOption {
                    value: f.as_str(),
                    label: f.label(),
                    selected: *f == fuel,
                })
                .collect(),
            gearbox_options: GearboxType::ALL
                .iter()
                .map(|g| SelectOption {
                    value: g.as_str(),
                    label: g.label(),
                    selected: *g == gearbox,
                })
                .collect(),
            error: None,
            warning: None,
            no_ads: false,
            results: None,
        }
    }
}

/// Form page. A submitted search is run and its results rendered inline.
pub async fn index_page(
    State(state): State<AppState>,
    form: Result<Query<SearchForm>, QueryRejection>,
) -> Result<IndexTemplate, WebError> {
    let form = match form {
        Ok(Query(form)) => form,
        Err(rejection) => {
            tracing::debug!("Rejected search query string: {}", rejection.body_text());
            let mut page = IndexTemplate::from_form(&SearchForm::default());
            page.error = Some(rejection.body_text());
            return Ok(page);
        }
    };

    let mut page = IndexTemplate::from_form(&form);

    if !form.is_submitted() {
        return Ok(page);
    }

    let query = match form.to_query() {
        Ok(query) => query,
        Err(message) => {
            tracing::debug!("Rejected search form: {}", message);
            page.error = Some(message);
            return Ok(page);
        }
    };

    match state.pipeline.run(&query).await {
        Ok(report) if report.is_empty() => {
            page.no_ads = true;
        }
        Ok(report) => {
            let svg = plot::render_svg(&report).map_err(|e| {
                tracing::error!("Failed to render plot: {}", e);
                WebError::internal("Failed to render plot")
            })?;
            page.results = Some(ResultsView::from_report(
                &report,
                svg,
                &state.config.scraper.base_url,
            ));
        }
        Err(AppError::Fetch(e)) => {
            tracing::warn!("Failed to fetch ads for {}: {}", query.title(), e);
            page.warning = Some(format!("Failed to fetch ads: {}", e));
        }
        Err(e) => {
            tracing::error!("Valuation failed for {}: {}", query.title(), e);
            return Err(WebError::internal("Valuation failed"));
        }
    }

    Ok(page)
}

pub async fn valuations_api(
    State(state): State<AppState>,
    form: Result<Query<SearchForm>, QueryRejection>,
) -> Result<Json<ApiResponse<AnalysisReport>>, WebError> {
    let Query(form) = form.map_err(|rejection| WebError::bad_request(rejection.body_text()))?;
    let query = form.to_query().map_err(WebError::bad_request)?;

    tracing::info!("API valuation request for {}", query.title());

    match state.pipeline.run(&query).await {
        Ok(report) => {
            let meta = serde_json::json!({
                "request_url": report.request_url,
                "ad_count": report.valuations.len(),
            });
            Ok(Json(ApiResponse::success_with_meta(report, meta)))
        }
        Err(AppError::Fetch(e)) => {
            tracing::warn!("Failed to fetch ads for {}: {}", query.title(), e);
            Err(WebError::bad_gateway(format!("Failed to fetch ads: {}", e)))
        }
        Err(e) => {
            tracing::error!("Valuation failed for {}: {}", query.title(), e);
            Err(WebError::internal("Valuation failed"))
        }
    }
}
