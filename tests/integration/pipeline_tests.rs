use super::*;
use car_valuator::{
    models::{FuelType, GearboxType, SearchQuery, ValuationBucket},
    report::write_reports,
    AppError, FetchError, ValuationPipeline,
};
use wiremock::matchers::query_param;

fn volvo_query() -> SearchQuery {
    SearchQuery::new("Volvo", "V70", 2010, 2020, FuelType::Gasoline, GearboxType::Automatic)
        .expect("valid query")
}

fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("csv file exists");
    reader
        .records()
        .map(|record| record.expect("valid record").iter().map(String::from).collect())
        .collect()
}

#[tokio::test]
async fn test_end_to_end_analysis() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VOLVO_V70_PATH))
        .and(query_param("fuel", "1"))
        .and(query_param("trans", "1000"))
        .and(query_param("year_min", "2010"))
        .and(query_param("year_max", "2020"))
        .and(query_param("seller", "st_private"))
        .respond_with(ResponseTemplate::new(200).set_body_string(three_ad_page()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let config = get_test_config(&server, dir.path());
    let pipeline = ValuationPipeline::new(&config)?;

    let report = pipeline.run(&volvo_query()).await?;

    assert_eq!(report.raw_ads.len(), 3);
    assert_eq!(report.cleaned_ads.len(), 3);
    assert_eq!(report.raw_ads[0].price.as_deref(), Some("100 000 kr"));
    assert_eq!(report.cleaned_ads[0].price, 100_000);
    assert_eq!(report.cleaned_ads[2].mileage, 30_000);

    assert!((report.regression.slope - 1.0).abs() < 1e-9);
    assert!((report.regression.intercept - 70_000.0).abs() < 1e-6);
    let r_squared = report.regression.r_squared.expect("three distinct points");
    assert!((r_squared - (1.0 - 2400.0 / 2600.0)).abs() < 1e-9);

    let buckets: Vec<_> = report.valuations.iter().map(|v| v.bucket).collect();
    assert_eq!(
        buckets,
        vec![
            ValuationBucket::Overvalued,
            ValuationBucket::Undervalued,
            ValuationBucket::Overvalued
        ]
    );
    assert_eq!(report.summary.undervalued, 1);
    assert_eq!(report.summary.overvalued, 2);

    let paths = write_reports(&report, &config.output)?;

    let raw = read_csv(&paths.raw);
    assert_eq!(raw[0], vec!["url", "price", "mileage"]);
    assert_eq!(raw[1], vec!["/ad/1", "100 000 kr", "10 000 mil"]);

    let cleaned = read_csv(&paths.cleaned);
    assert_eq!(cleaned.len(), 4);
    assert_eq!(cleaned[2], vec!["/ad/2", "50000", "20000"]);

    let results = read_csv(&paths.results);
    assert_eq!(
        results[0],
        vec!["url", "price", "mileage", "under_over_valued", "potential_roi"]
    );
    let expected = [(-20_000.0, -0.2), (40_000.0, 0.8), (-20_000.0, -20_000.0 / 120_000.0)];
    for (row, (deviation, roi)) in results[1..].iter().zip(expected) {
        assert!((row[3].parse::<f64>()? - deviation).abs() < 1e-6);
        assert!((row[4].parse::<f64>()? - roi).abs() < 1e-9);
    }

    let svg = std::fs::read_to_string(&paths.plot)?;
    assert!(svg.contains("Regression analysis for Volvo V70"));
    assert_eq!(svg.matches(r#"fill="green""#).count(), 1 + 1);

    Ok(())
}

#[tokio::test]
async fn test_missing_fields_do_not_drop_ads() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let page = listings_page(&[
        ad_row(Some("/ad/1"), Some("100 000 kr"), Some("10 000 mil")),
        ad_row(Some("/ad/2"), None, Some("15 000 mil")),
        ad_row(None, Some("90 000 kr"), None),
        ad_row(Some("/ad/4"), Some("80 000 kr"), Some("30 000 mil")),
    ]);
    mount_page(&server, VOLVO_V70_PATH, 200, page).await;

    let dir = tempfile::tempdir()?;
    let config = get_test_config(&server, dir.path());
    let report = ValuationPipeline::new(&config)?.run(&volvo_query()).await?;

    assert_eq!(report.raw_ads.len(), 4);
    assert_eq!(report.valuations.len(), 4);
    assert_eq!(report.cleaned_ads[1].price, 0);
    assert_eq!(report.cleaned_ads[2].mileage, 0);
    assert!(report.cleaned_ads[2].url.is_none());
    // A zero price has no meaningful relative deviation
    assert_eq!(report.valuations[1].relative_deviation, 0.0);
    assert_eq!(report.valuations[1].bucket, ValuationBucket::Normal);

    let paths = write_reports(&report, &config.output)?;
    let raw = read_csv(&paths.raw);
    assert_eq!(raw[2], vec!["/ad/2", "N/A", "15 000 mil"]);
    assert_eq!(raw[3], vec!["N/A", "90 000 kr", "N/A"]);

    let cleaned = read_csv(&paths.cleaned);
    assert_eq!(cleaned[3], vec!["N/A", "90000", "0"]);

    Ok(())
}

#[tokio::test]
async fn test_empty_page_writes_header_only_tables() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, VOLVO_V70_PATH, 200, listings_page(&[])).await;

    let dir = tempfile::tempdir()?;
    let config = get_test_config(&server, dir.path());
    let report = ValuationPipeline::new(&config)?.run(&volvo_query()).await?;

    assert!(report.is_empty());
    assert!(report.regression.r_squared.is_none());
    assert_eq!(report.summary.total(), 0);

    let paths = write_reports(&report, &config.output)?;
    assert_eq!(read_csv(&paths.results).len(), 1);
    assert!(std::fs::read_to_string(&paths.plot)?.contains("R² undefined"));

    Ok(())
}

#[tokio::test]
async fn test_error_status_is_a_fetch_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_page(&server, VOLVO_V70_PATH, 503, String::new()).await;

    let dir = tempfile::tempdir()?;
    let config = get_test_config(&server, dir.path());
    let result = ValuationPipeline::new(&config)?.run(&volvo_query()).await;

    match result {
        Err(AppError::Fetch(FetchError::Status { status, url })) => {
            assert_eq!(status, 503);
            assert!(url.contains("/sv-se/Volvo/V70/classifieds?fuel=1"));
        }
        other => panic!("expected a status error, got {:?}", other.map(|r| r.raw_ads.len())),
    }

    // Nothing is written when the fetch fails
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_single_ad_is_valued_against_its_own_price() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let page = listings_page(&[ad_row(Some("/ad/1"), Some("75 000 kr"), Some("12 000 mil"))]);
    mount_page(&server, VOLVO_V70_PATH, 200, page).await;

    let dir = tempfile::tempdir()?;
    let config = get_test_config(&server, dir.path());
    let report = ValuationPipeline::new(&config)?.run(&volvo_query()).await?;

    assert_eq!(report.regression.slope, 0.0);
    assert_eq!(report.regression.intercept, 75_000.0);
    assert_eq!(report.valuations[0].bucket, ValuationBucket::Normal);

    Ok(())
}
