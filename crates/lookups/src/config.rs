use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

pub const DEFAULT_WEATHER_URL: &str = "http://api.weatherapi.com/v1/current.json";
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_WIKIPEDIA_URL: &str = "https://en.wikipedia.org";
pub const DEFAULT_USER_AGENT: &str = "voyage-concierge/0.1 (+https://github.com/voyage-concierge)";

#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub weather_api_key: Option<String>,
    pub weather_url: String,
    pub nominatim_url: String,
    pub overpass_url: String,
    pub wikipedia_url: String,
    pub geocode_country: String,
    pub max_places: usize,
    pub search_radius_meters: u32,
    pub http_timeout: Duration,
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            wikipedia_url: DEFAULT_WIKIPEDIA_URL.to_string(),
            geocode_country: "India".to_string(),
            max_places: 5,
            search_radius_meters: 15_000,
            http_timeout: Duration::from_secs(20),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl LookupConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            weather_api_key: non_empty_var("WEATHER_API_KEY"),
            weather_url: non_empty_var("VOYAGE_WEATHER_URL").unwrap_or(defaults.weather_url),
            nominatim_url: non_empty_var("VOYAGE_NOMINATIM_URL")
                .unwrap_or(defaults.nominatim_url),
            overpass_url: non_empty_var("VOYAGE_OVERPASS_URL").unwrap_or(defaults.overpass_url),
            wikipedia_url: non_empty_var("VOYAGE_WIKIPEDIA_URL")
                .unwrap_or(defaults.wikipedia_url),
            geocode_country: non_empty_var("VOYAGE_GEOCODE_COUNTRY")
                .unwrap_or(defaults.geocode_country),
            max_places: parsed_var("VOYAGE_MAX_PLACES")
                .filter(|value: &usize| *value > 0)
                .unwrap_or(defaults.max_places),
            search_radius_meters: parsed_var("VOYAGE_SEARCH_RADIUS_METERS")
                .filter(|value: &u32| *value > 0)
                .unwrap_or(defaults.search_radius_meters),
            http_timeout: parsed_var("VOYAGE_HTTP_TIMEOUT_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            user_agent: non_empty_var("VOYAGE_USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }

    pub fn http_client(&self) -> Result<Client> {
        Client::builder()
            .connect_timeout(Duration::from_secs(6))
            .timeout(self.http_timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .context("failed to build HTTP client")
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    non_empty_var(key).and_then(|value| value.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = LookupConfig::default();
        assert_eq!(config.max_places, 5);
        assert_eq!(config.search_radius_meters, 15_000);
        assert_eq!(config.geocode_country, "India");
        assert!(config.weather_api_key.is_none());
    }

    #[test]
    fn builds_client() {
        assert!(LookupConfig::default().http_client().is_ok());
    }
}
