use std::future::Future;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::config::GeocoderConfig;
use crate::i18n::Locale;
use crate::lookup;
use crate::models::{Coordinates, Place};

const GEOCODER_TIMEOUT: Duration = Duration::from_secs(10);
const SEARCH_LIMIT: &str = "8";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("geocoder request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("geocoder answered with status {0}")]
    Status(u16),
    #[error("geocoder payload could not be read: {0}")]
    Decode(String),
    #[error("invalid geocoder url: {0}")]
    InvalidUrl(String),
}

/// Forward and reverse geocoding.
pub trait PlaceProvider: Send + Sync {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Place>, ProviderError>> + Send;

    /// `Ok(None)` when nothing is known at that point.
    fn reverse(
        &self,
        at: Coordinates,
    ) -> impl Future<Output = Result<Option<Place>, ProviderError>> + Send;
}

/// Nominatim-compatible HTTP geocoder restricted to the UAE.
#[derive(Debug, Clone)]
pub struct HttpPlaceProvider {
    http: reqwest::Client,
    base_url: String,
    locale: Locale,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReverseReply {
    Found(NominatimPlace),
    Missing {
        #[allow(dead_code)]
        error: String,
    },
}

impl HttpPlaceProvider {
    pub fn new(config: &GeocoderConfig, locale: Locale) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(GEOCODER_TIMEOUT)
            .user_agent(concat!("khadamat/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(http, &config.base_url, locale))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str, locale: Locale) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            locale,
        }
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|err| ProviderError::InvalidUrl(err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("format", "jsonv2")
            .append_pair("addressdetails", "1")
            .append_pair("accept-language", self.locale.tag())
            .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        Ok(url)
    }

    async fn fetch(&self, url: Url) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

impl NominatimPlace {
    fn into_place(self) -> Result<Place, ProviderError> {
        let latitude = self
            .lat
            .parse::<f64>()
            .map_err(|_| ProviderError::Decode(format!("latitude {:?}", self.lat)))?;
        let longitude = self
            .lon
            .parse::<f64>()
            .map_err(|_| ProviderError::Decode(format!("longitude {:?}", self.lon)))?;
        let emirate = self.address.as_ref().and_then(emirate_of);
        Ok(Place {
            label: self.display_name,
            coordinates: Coordinates::new(latitude, longitude),
            emirate,
        })
    }
}

/// Maps the provider's region names ("Dubai", "Abu Dhabi Emirate") onto
/// emirate ids.
fn emirate_of(address: &NominatimAddress) -> Option<String> {
    [address.state.as_deref(), address.city.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|region| {
            let region = region.to_lowercase();
            lookup::EMIRATES
                .iter()
                .find(|entry| region.contains(&entry.name_en.to_lowercase()))
                .map(|entry| entry.id.to_string())
        })
}

impl PlaceProvider for HttpPlaceProvider {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Place>, ProviderError>> + Send {
        let query = query.to_string();
        async move {
            let url = self.url(
                "/search",
                &[
                    ("q", query),
                    ("countrycodes", "ae".to_string()),
                    ("limit", SEARCH_LIMIT.to_string()),
                ],
            )?;
            let body = self.fetch(url).await?;
            let hits: Vec<NominatimPlace> = serde_json::from_slice(&body)
                .map_err(|err| ProviderError::Decode(err.to_string()))?;
            debug!(hits = hits.len(), "place search answered");
            hits.into_iter().map(NominatimPlace::into_place).collect()
        }
    }

    fn reverse(
        &self,
        at: Coordinates,
    ) -> impl Future<Output = Result<Option<Place>, ProviderError>> + Send {
        async move {
            let url = self.url(
                "/reverse",
                &[
                    ("lat", at.latitude.to_string()),
                    ("lon", at.longitude.to_string()),
                ],
            )?;
            let body = self.fetch(url).await?;
            let reply: ReverseReply = serde_json::from_slice(&body)
                .map_err(|err| ProviderError::Decode(err.to_string()))?;
            match reply {
                ReverseReply::Found(place) => place.into_place().map(Some),
                ReverseReply::Missing { .. } => Ok(None),
            }
        }
    }
}
