// Integration tests for Car Valuator
// The listings site is played by a wiremock server serving synthetic pages.

pub mod pipeline_tests;

use axum::{
    body::Body,
    http::{Method, Request},
};
use car_valuator::{
    web::{create_router, AppState},
    AppConfig,
};
use std::path::Path;
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Path the default test query (Volvo V70) is fetched from on the mock server.
pub const VOLVO_V70_PATH: &str = "/sv-se/Volvo/V70/classifieds";

/// Test configuration pointing the scraper at `server` and the reports at `output_dir`.
pub fn get_test_config(server: &MockServer, output_dir: &Path) -> AppConfig {
    let mut config = AppConfig::defaults().expect("embedded defaults are valid");
    config.server.host = "127.0.0.1".to_string();
    config.scraper.base_url = format!("{}/sv-se", server.uri());
    config.scraper.request_timeout = 5;
    config.scraper.user_agent = "CarValuator-Test/1.0".to_string();
    config.output.directory = output_dir.to_path_buf();
    config
}

pub fn create_test_app_state(server: &MockServer) -> anyhow::Result<AppState> {
    let config = get_test_config(server, &std::env::temp_dir());
    Ok(AppState::new(config)?)
}

/// One ad row as the listings site marks it up. `None` leaves the field out.
pub fn ad_row(url: Option<&str>, price: Option<&str>, mileage: Option<&str>) -> String {
    let link = url
        .map(|href| {
            format!(
                r#"<a class="classified_url flex-grow-1 fw-bold text-truncate rec_name" href="{}">Volvo V70</a>"#,
                href
            )
        })
        .unwrap_or_default();
    let price = price
        .map(|p| format!(r#"<div class="d-flex justify-content-end">{}</div>"#, p))
        .unwrap_or_default();
    let mileage = mileage
        .map(|m| format!(r#"<td class="d-none d-lg-table-cell text-nowrap">{}</td>"#, m))
        .unwrap_or_default();

    format!(
        r#"<tr class="classified_item list-row position-relative"><td>{}</td><td>{}</td>{}</tr>"#,
        link, price, mileage
    )
}

pub fn listings_page(rows: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><body><table class=\"table\"><tbody>{}</tbody></table></body></html>",
        rows.concat()
    )
}

/// Three ads on the line `price = mileage + 70 000`: fitted 80k, 90k and 100k.
pub fn three_ad_page() -> String {
    listings_page(&[
        ad_row(Some("/ad/1"), Some("100 000 kr"), Some("10 000 mil")),
        ad_row(Some("/ad/2"), Some("50 000 kr"), Some("20 000 mil")),
        ad_row(Some("/ad/3"), Some("120 000 kr"), Some("30 000 mil")),
    ])
}

pub async fn mount_page(server: &MockServer, page_path: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Helper to make HTTP requests to the test app
pub async fn make_request(
    app: &axum::Router,
    method: Method,
    uri: &str,
) -> anyhow::Result<axum::response::Response> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())?;

    let response = app.clone().oneshot(request).await?;
    Ok(response)
}

pub async fn body_string(response: axum::response::Response) -> anyhow::Result<String> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

pub fn test_router(server: &MockServer) -> anyhow::Result<axum::Router> {
    Ok(create_router(create_test_app_state(server)?))
}
