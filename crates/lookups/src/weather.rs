use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use voyage_core::{render_weather, LookupResult, WeatherReport, WeatherResult};

use crate::config::LookupConfig;
use crate::error::{LookupError, LookupResponse};
use crate::WeatherLookup;

/// Current conditions from WeatherAPI (`current.json`).
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherApiClient {
    pub fn new(http: Client, config: &LookupConfig) -> Self {
        Self {
            http,
            base_url: config.weather_url.clone(),
            api_key: config.weather_api_key.clone(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn current(&self, place: &str) -> LookupResponse<WeatherReport> {
        if place.trim().is_empty() {
            return Err(LookupError::EmptyPlace);
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LookupError::MissingCredential("WEATHER_API_KEY"))?;

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("key", api_key), ("q", place), ("aqi", "no")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "weather response received");

        if !status.is_success() {
            // WeatherAPI answers unknown locations with 400 and an error object.
            return match parse_current(place, &body) {
                Err(error @ LookupError::NotFound(_)) => Err(error),
                _ => Err(LookupError::Upstream {
                    status: status.as_u16(),
                    body,
                }),
            };
        }

        parse_current(place, &body)
    }
}

impl WeatherLookup for WeatherApiClient {
    #[instrument(skip(self))]
    async fn fetch(&self, place: &str) -> WeatherResult {
        match self.current(place).await {
            Ok(report) => {
                let message = render_weather(&report, place);
                LookupResult::success(message, report)
            }
            Err(error) => {
                warn!(%error, "weather lookup failed");
                LookupResult::failure(failure_message(place, &error))
            }
        }
    }
}

fn failure_message(place: &str, error: &LookupError) -> String {
    match error {
        LookupError::EmptyPlace => "No place provided for weather lookup.".to_string(),
        LookupError::MissingCredential(_) => {
            "Weather API key missing! Set WEATHER_API_KEY in the environment or in a .env file."
                .to_string()
        }
        LookupError::Transport(_) | LookupError::Upstream { .. } => {
            format!("Unable to fetch weather: {error}")
        }
        LookupError::Malformed(_) | LookupError::NotFound(_) => {
            format!("Couldn't fetch weather for {place}.")
        }
    }
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: Option<ApiLocation>,
    current: Option<ApiCurrent>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
    region: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: Option<f64>,
    feelslike_c: Option<f64>,
    cloud: Option<f64>,
    condition: Option<ApiCondition>,
    last_updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

fn parse_current(place: &str, body: &str) -> LookupResponse<WeatherReport> {
    let parsed: CurrentResponse = serde_json::from_str(body)
        .map_err(|error| LookupError::malformed(format!("weather body: {error}")))?;

    if let Some(error) = parsed.error {
        debug!(upstream = ?error.message, "weather api reported an error");
        return Err(LookupError::NotFound(place.to_string()));
    }

    let current = parsed
        .current
        .ok_or_else(|| LookupError::malformed("missing `current` block"))?;
    let temperature_c = current
        .temp_c
        .ok_or_else(|| LookupError::malformed("missing `temp_c`"))?;

    // Cloud cover stands in for the chance of rain on the current endpoint.
    let rain_chance_pct = current.cloud.unwrap_or(0.0).round().clamp(0.0, 100.0) as u8;

    let (location, region, country) = match parsed.location {
        Some(location) => (location.name, location.region, location.country),
        None => (place.to_string(), None, None),
    };

    Ok(WeatherReport {
        location,
        region: region.filter(|value| !value.is_empty()),
        country,
        temperature_c,
        feels_like_c: current.feelslike_c,
        rain_chance_pct,
        condition: current.condition.map(|condition| condition.text),
        observed_at: current.last_updated,
    })
}
