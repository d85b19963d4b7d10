mod config;
mod error;
mod geocode;
mod places;
mod weather;
mod wiki;

use voyage_core::{PlacesResult, WeatherResult};

pub use config::LookupConfig;
pub use error::{LookupError, LookupResponse};
pub use geocode::{query_variants, resolve_alias, GeoPoint, NominatimGeocoder};
pub use places::{overpass_query, popularity, OverpassPlacesClient};
pub use weather::WeatherApiClient;
pub use wiki::{title_from_tag, WikiSummary, WikipediaClient};

/// Current weather for a place. Failures come back as a failed
/// [`voyage_core::LookupResult`], never as an error.
pub trait WeatherLookup: Send + Sync {
    async fn fetch(&self, place: &str) -> WeatherResult;
}

/// Nearby points of interest, ranked by descending popularity and truncated
/// to the configured maximum.
pub trait PlacesLookup: Send + Sync {
    async fn fetch(&self, place: &str) -> PlacesResult;
}

pub trait Geocoder: Send + Sync {
    async fn geocode(&self, place: &str) -> LookupResponse<Option<GeoPoint>>;
}

/// The HTTP-backed collaborators, sharing one connection pool.
#[derive(Debug, Clone)]
pub struct HttpLookups {
    pub weather: WeatherApiClient,
    pub places: OverpassPlacesClient,
}

impl HttpLookups {
    pub fn from_config(config: &LookupConfig) -> anyhow::Result<Self> {
        let http = config.http_client()?;
        Ok(Self {
            weather: WeatherApiClient::new(http.clone(), config),
            places: OverpassPlacesClient::new(http, config),
        })
    }
}
