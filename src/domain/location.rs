use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Suggestion lookups only run for input longer than this many characters.
pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Address candidate returned by the autocomplete provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub label: String,
    pub lat: f64,
    pub lon: f64,
}

impl LocationSuggestion {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route unavailable: {0}")]
    Unavailable(String),
}

/// True when `text` is long enough to be worth an autocomplete lookup.
pub fn is_searchable(text: &str) -> bool {
    text.trim().chars().count() > MIN_QUERY_CHARS
}

/// Address lookup and driving distance, provided by an external service.
pub trait LocationResolver {
    /// Ranked candidates for partial input, at most [`MAX_SUGGESTIONS`].
    ///
    /// Best effort: provider failures yield an empty list.
    fn suggest(&self, text: &str) -> impl Future<Output = Vec<LocationSuggestion>> + Send;

    fn route_distance_km(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> impl Future<Output = Result<f64, RouteError>> + Send;
}
