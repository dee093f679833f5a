//! HTTP retrieval of the calendar page.

use log::{debug, info};
use reqwest::{Client, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to fetch the calendar, website returned status code: {0}")]
    Status(StatusCode),
    #[error("Failed to fetch the calendar, website returned no content")]
    EmptyBody,
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// GET `url` and return the page body.
pub async fn fetch_document(client: &Client, url: &str) -> Result<String, FetchError> {
    info!("Fetching calendar page: {}", url);
    let response = client.get(url).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status(status));
    }

    let body = response.text().await?;
    if body.trim().is_empty() {
        return Err(FetchError::EmptyBody);
    }

    debug!("Fetched {} bytes", body.len());
    Ok(body)
}
