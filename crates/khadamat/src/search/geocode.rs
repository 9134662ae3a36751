use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::guard::LatestGuard;
use super::provider::PlaceProvider;
use super::{Outcome, DEFAULT_DEBOUNCE};
use crate::i18n::{self, Locale, Message};
use crate::models::{Coordinates, Place};

const KEY_SCALE: f64 = 10_000.0;

/// Coordinates rounded to four decimal places (about 11 m), so jitter from a
/// dragged map pin does not count as a new request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateKey {
    lat: i64,
    lon: i64,
}

impl CoordinateKey {
    pub fn of(at: Coordinates) -> Self {
        Self {
            lat: (at.latitude * KEY_SCALE).round() as i64,
            lon: (at.longitude * KEY_SCALE).round() as i64,
        }
    }

    pub fn coordinates(self) -> Coordinates {
        Coordinates::new(self.lat as f64 / KEY_SCALE, self.lon as f64 / KEY_SCALE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeocodeState {
    pub coordinates: Option<Coordinates>,
    pub place: Option<Place>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Resolves a pin position to an address; the newest position wins.
pub struct ReverseGeocoder<P> {
    provider: Arc<P>,
    guard: LatestGuard<CoordinateKey>,
    state: watch::Sender<GeocodeState>,
    debounce: Duration,
    locale: Locale,
}

impl<P> ReverseGeocoder<P>
where
    P: PlaceProvider,
{
    pub fn new(provider: Arc<P>, locale: Locale) -> Self {
        let (state, _) = watch::channel(GeocodeState::default());
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

    pub fn snapshot(&self) -> GeocodeState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GeocodeState> {
        self.state.subscribe()
    }

    pub async fn resolve(&self, at: Coordinates) -> Outcome {
        let key = CoordinateKey::of(at);
        self.guard.issue(key);
        self.state.send_modify(|state| {
            state.coordinates = Some(key.coordinates());
            state.loading = true;
        });

        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }
        if !self.guard.is_latest(&key) {
            return Outcome::Superseded;
        }

        let result = self.provider.reverse(key.coordinates()).await;
        if !self.guard.is_latest(&key) {
            debug!(?key, "discarding stale reverse geocode response");
            return Outcome::Stale;
        }

        let (place, error, outcome) = match result {
            Ok(place) => (place, None, Outcome::Applied),
            Err(err) => {
                warn!(?key, error = %err, "reverse geocode failed");
                let message = i18n::text(self.locale, Message::GeocodeFailed).to_string();
                (None, Some(message), Outcome::Failed)
            }
        };
        self.state.send_replace(GeocodeState {
            coordinates: Some(key.coordinates()),
            place,
            loading: false,
            error,
        });
        outcome
    }
}
