use std::time::Duration;

use courtside_core::error::AppError;
use courtside_core::traits::Fetcher;
use reqwest::{Client, Response};
use url::Url;

/// User agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Per-request timeout unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP fetcher using reqwest.
///
/// Downloads raw HTML with a configurable User-Agent and timeout. Only
/// `http` and `https` URLs are fetched.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_options(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }

    pub fn with_options(user_agent: &str, timeout: Duration) -> Result<Self, AppError> {
        Ok(Self {
            client: build_client(user_agent, timeout)?,
            timeout_secs: timeout.as_secs(),
        })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let response = get(&self.client, url, self.timeout_secs).await?;
        response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))
    }
}

pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::HttpError(e.to_string()))
}

/// GET `url` and fail on anything but a 2xx status.
pub(crate) async fn get(client: &Client, url: &str, timeout_secs: u64) -> Result<Response, AppError> {
    validate_url(url)?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            AppError::Timeout(timeout_secs)
        } else if e.is_connect() {
            AppError::NetworkError(format!("Connection failed: {e}"))
        } else {
            AppError::HttpError(e.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::HttpError(format!(
            "HTTP {} for {}",
            status.as_u16(),
            url
        )));
    }
    Ok(response)
}

/// Only absolute `http`/`https` URLs are fetched.
fn validate_url(url: &str) -> Result<(), AppError> {
    let parsed = Url::parse(url).map_err(|e| AppError::HttpError(format!("Invalid URL {url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AppError::HttpError(format!(
            "URL scheme '{scheme}' is not allowed (only http/https)"
        ))),
    }
}
