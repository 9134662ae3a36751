//! Place search and reverse geocoding with latest-wins response handling.
//!
//! Every request is tagged with a key (the normalized query or the rounded
//! coordinates). A response is applied only when its key is still the latest
//! one issued; anything older is dropped without touching the state.

mod geocode;
mod guard;
mod places;
mod provider;

use std::time::Duration;

pub use geocode::{CoordinateKey, GeocodeState, ReverseGeocoder};
pub use guard::LatestGuard;
pub use places::{normalize_query, SearchController, SearchState, MIN_QUERY_CHARS};
pub use provider::{HttpPlaceProvider, PlaceProvider, ProviderError};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// What happened to one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Input too short; state was cleared without a lookup.
    Cleared,
    /// A newer request arrived during the debounce window.
    Superseded,
    /// The lookup finished after a newer request was issued.
    Stale,
    Applied,
    Failed,
}
