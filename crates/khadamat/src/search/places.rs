use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::guard::LatestGuard;
use super::provider::PlaceProvider;
use super::{Outcome, DEFAULT_DEBOUNCE};
use crate::i18n::{self, Locale, Message};
use crate::models::Place;

pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<Place>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Trims, collapses inner whitespace and lowercases a raw query.
pub fn normalize_query(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Debounced place search where only the newest query may touch the state.
pub struct SearchController<P> {
    provider: Arc<P>,
    guard: LatestGuard<String>,
    state: watch::Sender<SearchState>,
    debounce: Duration,
    locale: Locale,
}

impl<P> SearchController<P>
where
    P: PlaceProvider,
{
    pub fn new(provider: Arc<P>, locale: Locale) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            provider,
            guard: LatestGuard::new(),
            state,
            debounce: DEFAULT_DEBOUNCE,
            locale,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Runs one keystroke's worth of search. Callers typically spawn or join
    /// one of these per input change; overlapping calls are expected.
    pub async fn search(&self, raw: &str) -> Outcome {
        let key = normalize_query(raw);

        if key.chars().count() < MIN_QUERY_CHARS {
            self.guard.reset();
            self.state.send_replace(SearchState {
                query: key,
                ..SearchState::default()
            });
            return Outcome::Cleared;
        }

        self.guard.issue(key.clone());
        self.state.send_modify(|state| {
            state.query = key.clone();
            state.loading = true;
        });

        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }
        if !self.guard.is_latest(&key) {
            return Outcome::Superseded;
        }

        let result = self.provider.search(&key).await;
        if !self.guard.is_latest(&key) {
            debug!(query = %key, "discarding stale place search response");
            return Outcome::Stale;
        }

        match result {
            Ok(results) => {
                self.state.send_replace(SearchState {
                    query: key,
                    results,
                    loading: false,
                    error: None,
                });
                Outcome::Applied
            }
            Err(err) => {
                warn!(query = %key, error = %err, "place search failed");
                self.state.send_replace(SearchState {
                    query: key,
                    results: Vec::new(),
                    loading: false,
                    error: Some(i18n::text(self.locale, Message::SearchFailed).to_string()),
                });
                Outcome::Failed
            }
        }
    }

    pub fn clear(&self) {
        self.guard.reset();
        self.state.send_replace(SearchState::default());
    }
}
