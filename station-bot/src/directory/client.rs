//! Wikipedia station list client.

use std::future::Future;

use reqwest::Url;
use tracing::{error, info, warn};

use crate::domain::Station;

use super::error::DirectoryError;
use super::parse::parse_stations;

/// Default page listing the passenger stations of Schleswig-Holstein.
pub const DEFAULT_WIKI_URL: &str =
    "https://de.wikipedia.org/wiki/Liste_der_Personenbahnh%C3%B6fe_in_Schleswig-Holstein";

/// Source of the authoritative station list.
///
/// Implementations never fail: `None` means the list is currently
/// unavailable and reconciliation should be skipped.
pub trait StationDirectory: Send + Sync {
    /// Fetch the current list of stations.
    fn fetch_stations(&self) -> impl Future<Output = Option<Vec<Station>>> + Send;
}

/// Configuration for the wiki client.
#[derive(Debug, Clone)]
pub struct WikiClientConfig {
    /// Page holding the station table
    pub page_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl WikiClientConfig {
    /// Create a new config for the given page.
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            timeout_secs: 30,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for WikiClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WIKI_URL)
    }
}

/// Client fetching and parsing the station table from Wikipedia.
#[derive(Debug, Clone)]
pub struct WikiClient {
    http: reqwest::Client,
    page_url: Url,
}

impl WikiClient {
    /// Create a new wiki client.
    pub fn new(config: WikiClientConfig) -> Result<Self, DirectoryError> {
        let page_url = Url::parse(&config.page_url).map_err(|e| DirectoryError::Structure {
            message: format!("invalid page URL {:?}: {e}", config.page_url),
        })?;

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, page_url })
    }

    /// Fetch and parse all stations from the page.
    pub async fn fetch_all(&self) -> Result<Vec<Station>, DirectoryError> {
        let response = self.http.get(self.page_url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(DirectoryError::Status {
                status: status.as_u16(),
            });
        }

        // Resolve links against the final URL after redirects
        let page_url = response.url().clone();
        let body = response.text().await?;

        parse_stations(&body, &page_url)
    }
}

impl StationDirectory for WikiClient {
    async fn fetch_stations(&self) -> Option<Vec<Station>> {
        info!(url = %self.page_url, "fetching stations");
        match self.fetch_all().await {
            Ok(stations) if stations.is_empty() => {
                warn!("station page contained no stations");
                None
            }
            Ok(stations) => {
                info!(count = stations.len(), "fetched stations");
                Some(stations)
            }
            Err(e) => {
                error!(error = %e, "could not fetch stations");
                None
            }
        }
    }
}
