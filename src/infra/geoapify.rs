//! Thin asynchronous client for the Geoapify geocoding and routing APIs.
//!
//! - Autocomplete suggestions with a 10-minute in-memory cache and stale fallback.
//! - Driving distance between two coordinates via the routing endpoint.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::{
    is_searchable, Coordinates, LocationResolver, LocationSuggestion, RouteError, MAX_SUGGESTIONS,
};

pub const DEFAULT_BASE_URL: &str = "https://api.geoapify.com/v1/";
const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);
const USER_AGENT: &str = concat!("logistics-calculator/", env!("CARGO_PKG_VERSION"));
const METRES_PER_KM: f64 = 1000.0;
/// Distinct queries kept for fresh hits and stale fallback.
const MAX_CACHED_QUERIES: usize = 64;

#[derive(Debug, Error)]
pub enum GeoapifyError {
    #[error("no Geoapify API key configured")]
    MissingApiKey,
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, status: CacheStatus) -> Self {
        Self { data, status }
    }
}

#[derive(Default)]
struct SuggestionCache {
    entries: HashMap<String, Cached<Vec<LocationSuggestion>>>,
}

impl SuggestionCache {
    /// Store `entry` under `key`. Past [`MAX_CACHED_QUERIES`] expired entries go
    /// first, then the oldest fresh ones. The new entry is always kept.
    fn insert(&mut self, key: String, entry: Cached<Vec<LocationSuggestion>>, ttl: Duration) {
        self.entries.insert(key.clone(), entry);
        if self.entries.len() <= MAX_CACHED_QUERIES {
            return;
        }

        self.entries
            .retain(|existing, cached| *existing == key || cached.is_fresh(ttl));
        while self.entries.len() > MAX_CACHED_QUERIES {
            let oldest = self
                .entries
                .iter()
                .filter(|(existing, _)| **existing != key)
                .min_by_key(|(_, cached)| cached.fetched_at)
                .map(|(existing, _)| existing.clone());
            match oldest {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }
}

#[derive(Clone)]
pub struct GeoapifyClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
    cache: Arc<Mutex<SuggestionCache>>,
    ttl: Duration,
}

impl GeoapifyClient {
    pub fn with_base_url(base: &str, api_key: Option<String>) -> Result<Self, GeoapifyError> {
        let base_url = Url::parse(&with_trailing_slash(base))?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            cache: Arc::new(Mutex::new(SuggestionCache::default())),
            ttl: DEFAULT_TTL,
        })
    }

    #[cfg(test)]
    fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Autocomplete candidates for `text`, served from cache when fresh.
    ///
    /// When the provider fails a stale cache entry is returned if one exists.
    pub async fn autocomplete(
        &self,
        text: &str,
    ) -> Result<CachedPayload<Vec<LocationSuggestion>>, GeoapifyError> {
        let key = cache_key(text);
        if let Some(payload) = self.cached_suggestions(&key).await {
            debug!(query = %key, "serving cached suggestions");
            return Ok(payload);
        }

        let mut url = self.url("geocode/autocomplete")?;
        url.query_pairs_mut()
            .append_pair("text", text.trim())
            .append_pair("limit", &MAX_SUGGESTIONS.to_string());
        debug!(%url, "requesting autocomplete");

        match self.fetch::<FeatureCollection<PlaceProperties>>(url).await {
            Ok(collection) => {
                let data = collection
                    .features
                    .into_iter()
                    .filter_map(|feature| feature.properties.into_suggestion())
                    .take(MAX_SUGGESTIONS)
                    .collect::<Vec<_>>();
                Ok(self.store_suggestions(key, data).await)
            }
            Err(error) => {
                if let Some(stale) = self.cached_suggestions_stale(&key).await {
                    warn!(query = %key, %error, "autocomplete failed; serving stale suggestions");
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    /// Driving distance in kilometres.
    pub async fn route_distance(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> Result<f64, GeoapifyError> {
        let mut url = self.url("routing")?;
        let waypoints = format!("{},{}|{},{}", from.lat, from.lon, to.lat, to.lon);
        url.query_pairs_mut()
            .append_pair("waypoints", &waypoints)
            .append_pair("mode", "drive");
        debug!(%url, "requesting route");

        let collection = self.fetch::<FeatureCollection<RouteProperties>>(url).await?;
        let metres = collection
            .features
            .into_iter()
            .next()
            .and_then(|feature| feature.properties.distance)
            .ok_or_else(|| GeoapifyError::Api("response missing route distance".into()))?;

        if !metres.is_finite() || metres < 0.0 {
            return Err(GeoapifyError::Api(format!("invalid route distance {metres}")));
        }
        Ok(metres / METRES_PER_KM)
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.entries.clear();
    }

    async fn cached_suggestions(
        &self,
        key: &str,
    ) -> Option<CachedPayload<Vec<LocationSuggestion>>> {
        let cache = self.cache.lock().await;
        cache
            .entries
            .get(key)
            .and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_suggestions_stale(
        &self,
        key: &str,
    ) -> Option<CachedPayload<Vec<LocationSuggestion>>> {
        let cache = self.cache.lock().await;
        cache.entries.get(key).map(Cached::stale)
    }

    async fn store_suggestions(
        &self,
        key: String,
        data: Vec<LocationSuggestion>,
    ) -> CachedPayload<Vec<LocationSuggestion>> {
        let payload = CachedPayload::new(data.clone(), CacheStatus::Fresh);
        let mut cache = self.cache.lock().await;
        cache.insert(key, Cached::new(data, SystemTime::now()), self.ttl);
        payload
    }

    async fn fetch<T>(&self, mut url: Url) -> Result<T, GeoapifyError>
    where
        T: DeserializeOwned,
    {
        let api_key = self.api_key.as_deref().ok_or(GeoapifyError::MissingApiKey)?;
        // Appended after logging so the key never shows up in log output.
        url.query_pairs_mut().append_pair("apiKey", api_key);

        let response = self.http.get(url).send().await.map_err(strip_url)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.ok();
            let message = body
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("provider responded with status {status}"));
            return Err(GeoapifyError::Api(message));
        }
        response.json().await.map_err(strip_url)
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

impl LocationResolver for GeoapifyClient {
    async fn suggest(&self, text: &str) -> Vec<LocationSuggestion> {
        if !is_searchable(text) {
            return Vec::new();
        }
        match self.autocomplete(text).await {
            Ok(payload) => {
                debug!(status = ?payload.status, count = payload.data.len(), "suggestions ready");
                payload.data
            }
            Err(error) => {
                warn!(%error, "location suggestions unavailable");
                Vec::new()
            }
        }
    }

    async fn route_distance_km(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> Result<f64, RouteError> {
        self.route_distance(from, to)
            .await
            .map_err(|error| RouteError::Unavailable(error.to_string()))
    }
}

struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
    }

    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        self.is_fresh(ttl)
            .then(|| CachedPayload::new(self.value.clone(), CacheStatus::Cached))
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), CacheStatus::Stale)
    }
}

// reqwest includes the request URL, and with it the API key, in its messages.
fn strip_url(error: reqwest::Error) -> GeoapifyError {
    GeoapifyError::Http(error.without_url())
}

fn cache_key(text: &str) -> String {
    text.trim().to_lowercase()
}

fn with_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "P: Deserialize<'de>"))]
struct FeatureCollection<P> {
    #[serde(default)]
    features: Vec<Feature<P>>,
}

#[derive(Debug, Deserialize)]
struct Feature<P> {
    properties: P,
}

#[derive(Debug, Deserialize)]
struct PlaceProperties {
    #[serde(default)]
    formatted: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl PlaceProperties {
    fn into_suggestion(self) -> Option<LocationSuggestion> {
        Some(LocationSuggestion {
            label: self.formatted?,
            lat: self.lat?,
            lon: self.lon?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RouteProperties {
    #[serde(default)]
    distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}
