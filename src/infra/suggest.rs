//! Debounced, cancellable autocomplete search.
//!
//! Every call to [`SuggestionSearch::search`] supersedes the previous one: the
//! pending lookup is aborted and only the most recent request ever reports
//! results.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use tokio::task::AbortHandle;
use tracing::debug;

use crate::domain::{LocationResolver, LocationSuggestion};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct SuggestionSearch<R> {
    resolver: R,
    delay: Duration,
    latest: Arc<AtomicU64>,
    pending: Arc<Mutex<Option<AbortHandle>>>,
}

impl<R: Clone> Clone for SuggestionSearch<R> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            delay: self.delay,
            latest: Arc::clone(&self.latest),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<R> SuggestionSearch<R>
where
    R: LocationResolver + Clone + Send + Sync + 'static,
{
    pub fn with_delay(resolver: R, delay: Duration) -> Self {
        Self {
            resolver,
            delay,
            latest: Arc::new(AtomicU64::new(0)),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Wait out the debounce delay, then look `text` up.
    ///
    /// Resolves to `None` when a newer search or [`cancel`](Self::cancel)
    /// superseded this one.
    pub async fn search(&self, text: String) -> Option<Vec<LocationSuggestion>> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let resolver = self.resolver.clone();
        let delay = self.delay;

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            resolver.suggest(&text).await
        });
        self.replace_pending(Some(task.abort_handle()));

        match task.await {
            Ok(suggestions) if self.is_current(ticket) => Some(suggestions),
            Ok(_) => {
                debug!(ticket, "discarding superseded suggestions");
                None
            }
            Err(_) => None,
        }
    }

    /// Abort any pending lookup without starting a new one.
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
        self.replace_pending(None);
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    fn replace_pending(&self, next: Option<AbortHandle>) {
        let previous = {
            let mut slot = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *slot, next)
        };
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, RouteError};
    use std::sync::atomic::AtomicUsize;

    #[derive(Clone, Default)]
    struct EchoResolver {
        calls: Arc<AtomicUsize>,
    }

    impl LocationResolver for EchoResolver {
        async fn suggest(&self, text: &str) -> Vec<LocationSuggestion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            vec![LocationSuggestion {
                label: text.to_uppercase(),
                lat: 1.0,
                lon: 2.0,
            }]
        }

        async fn route_distance_km(
            &self,
            _: Coordinates,
            _: Coordinates,
        ) -> Result<f64, RouteError> {
            Ok(0.0)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn single_search_returns_results_after_delay() {
        let resolver = EchoResolver::default();
        let search = SuggestionSearch::with_delay(resolver.clone(), Duration::from_millis(300));

        let result = search.search("berlin".to_string()).await;
        assert_eq!(result.unwrap()[0].label, "BERLIN");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_search_supersedes_pending_one() {
        let resolver = EchoResolver::default();
        let search = SuggestionSearch::with_delay(resolver.clone(), Duration::from_millis(300));

        let first = {
            let search = search.clone();
            tokio::spawn(async move { search.search("ber".to_string()).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = search.search("berlin".to_string()).await;

        assert_eq!(first.await.unwrap(), None);
        assert_eq!(second.unwrap()[0].label, "BERLIN");
        // The first lookup was aborted before it reached the provider.
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_pending_search() {
        let resolver = EchoResolver::default();
        let search = SuggestionSearch::with_delay(resolver.clone(), Duration::from_millis(300));

        let pending = {
            let search = search.clone();
            tokio::spawn(async move { search.search("paris".to_string()).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        search.cancel();

        assert_eq!(pending.await.unwrap(), None);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }
}
