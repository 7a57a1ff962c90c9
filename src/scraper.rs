use reqwest::Client;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::ScraperConfig;
use crate::models::SearchQuery;
use crate::{AppError, Result};

/// Why a listings page could not be fetched.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connect failure, timeout or a broken body.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The site answered with a non-2xx status.
    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },
}

/// Builds `{base}/{make}/{model}/classifieds?fuel=..&trans=..&year_min=..&year_max=..&seller=st_private`.
pub fn build_search_url(base_url: &str, query: &SearchQuery) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| AppError::Parse {
        message: format!("invalid base URL '{}': {}", base_url, e),
    })?;

    url.path_segments_mut()
        .map_err(|_| AppError::Parse {
            message: format!("base URL '{}' cannot have path segments", base_url),
        })?
        .pop_if_empty()
        .push(&query.make)
        .push(&query.model)
        .push("classifieds");

    url.query_pairs_mut()
        .clear()
        .append_pair("fuel", query.fuel.site_code())
        .append_pair("trans", query.gearbox.site_code())
        .append_pair("year_min", &query.start_year.to_string())
        .append_pair("year_max", &query.end_year.to_string())
        .append_pair("seller", "st_private");

    Ok(url)
}

/// Single-shot HTTP fetcher for listing pages. No retries.
#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
}

impl WebScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &Url) -> std::result::Result<String, FetchError> {
        let start_time = Instant::now();
        info!(url = %url, "Fetching listings page");

        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url.clone()).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;

        debug!(
            url = %url,
            bytes = body.len(),
            response_time_ms = start_time.elapsed().as_millis() as u64,
            "Fetched listings page"
        );

        Ok(body)
    }
}
