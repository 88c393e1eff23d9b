//! Price client
//!
//! Spot USD prices and 24h change from CoinGecko, memoised per asset for a
//! short freshness window.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Deserialize;

use super::HttpClient;
use crate::error::{DashboardError, DashboardResult};

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    pub name: &'static str,
    pub id: &'static str,
    pub symbol: &'static str,
}

pub const ASSETS: [Asset; 3] = [
    Asset { name: "Bitcoin", id: "bitcoin", symbol: "₿" },
    Asset { name: "Ethereum", id: "ethereum", symbol: "Ξ" },
    Asset { name: "XRP", id: "ripple", symbol: "✕" },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub price: f64,
    pub change_24h: f64,
}

impl Quote {
    pub fn is_up(&self) -> bool {
        self.change_24h >= 0.0
    }
}

pub trait PriceSource {
    fn fetch_quote(&self, asset_id: &str) -> DashboardResult<Quote>;
}

#[derive(Debug, Deserialize)]
struct SimplePrice {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: HttpClient,
}

impl CoinGeckoClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl PriceSource for CoinGeckoClient {
    fn fetch_quote(&self, asset_id: &str) -> DashboardResult<Quote> {
        let query = [("ids", asset_id), ("vs_currencies", "usd"), ("include_24hr_change", "true")];
        let body: HashMap<String, SimplePrice> =
            self.http.get_json("price", &format!("{}/simple/price", BASE_URL), &query)?;
        quote_from(asset_id, body)
    }
}

fn quote_from(asset_id: &str, mut body: HashMap<String, SimplePrice>) -> DashboardResult<Quote> {
    let Some(SimplePrice { usd: Some(price), usd_24h_change }) = body.remove(asset_id) else {
        return Err(DashboardError::Api(format!("No price returned for {}", asset_id)));
    };
    Ok(Quote { price, change_24h: usd_24h_change.unwrap_or(0.0) })
}

/// Per-asset memo. Entries are fresh while younger than `ttl`.
#[derive(Debug, Clone)]
pub struct PriceCache {
    ttl: Duration,
    entries: HashMap<String, (Quote, Instant)>,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: HashMap::new() }
    }

    pub fn get(&self, asset_id: &str, now: Instant) -> Option<Quote> {
        let (quote, at) = self.entries.get(asset_id)?;
        (now.saturating_duration_since(*at) < self.ttl).then_some(*quote)
    }

    pub fn insert(&mut self, asset_id: &str, quote: Quote, now: Instant) {
        self.entries.insert(asset_id.to_string(), (quote, now));
    }
}

/// A price source fronted by the cache
pub struct CachedPrices {
    source: Box<dyn PriceSource + Send>,
    cache: PriceCache,
}

impl CachedPrices {
    pub fn new(source: Box<dyn PriceSource + Send>, ttl: Duration) -> Self {
        Self { source, cache: PriceCache::new(ttl) }
    }

    pub fn quote(&mut self, asset_id: &str, now: Instant) -> DashboardResult<Quote> {
        if let Some(quote) = self.cache.get(asset_id, now) {
            tracing::trace!(asset_id, "price cache hit");
            return Ok(quote);
        }
        let quote = self.source.fetch_quote(asset_id)?;
        self.cache.insert(asset_id, quote, now);
        Ok(quote)
    }
}
