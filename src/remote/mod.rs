//! Remote Collaborators
//!
//! Blocking HTTP clients for the weather and price APIs. They run on the
//! background worker, never on the UI thread.

pub mod price;
pub mod weather;
pub mod worker;

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{DashboardError, DashboardResult};

pub use price::{CachedPrices, CoinGeckoClient, PriceSource, Quote, ASSETS};
pub use weather::{OpenWeatherClient, WeatherData, WeatherReport, WeatherSource};
pub use worker::{RemoteRequest, RemoteResponse, RemoteWorker};

const USER_AGENT: &str = concat!("deskboard/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(10);

/// Body shape both APIs use for error responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
}

impl HttpClient {
    pub fn new() -> DashboardResult<Self> {
        let http = Client::builder().timeout(TIMEOUT).user_agent(USER_AGENT).build()?;
        Ok(Self { http })
    }

    /// GET `url` and decode the JSON body. Non-success statuses become
    /// `Api` errors carrying the server's message when it sends one.
    pub fn get_json<T: DeserializeOwned>(&self, what: &str, url: &str, query: &[(&str, &str)]) -> DashboardResult<T> {
        tracing::debug!(what, url, "GET");
        let response = self.http.get(url).query(query).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json()?);
        }

        let body = response.text().unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
        tracing::warn!(what, %status, detail, "remote call failed");
        Err(DashboardError::Api(format!("Failed to fetch {}: {}", what, detail)))
    }
}
