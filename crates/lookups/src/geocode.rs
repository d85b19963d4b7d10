use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::LookupConfig;
use crate::error::{LookupError, LookupResponse};
use crate::Geocoder;

/// Common alternate spellings mapped to the name the geocoder knows best.
const CITY_ALIASES: &[(&str, &str)] = &[
    ("bangalore", "Bengaluru"),
    ("bengaluru", "Bengaluru"),
    ("bombay", "Mumbai"),
    ("mumbai", "Mumbai"),
    ("madras", "Chennai"),
    ("pondicherry", "Puducherry"),
    ("pondy", "Puducherry"),
    ("puducherry", "Puducherry"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: Client,
    base_url: String,
    country: String,
}

impl NominatimGeocoder {
    pub fn new(http: Client, config: &LookupConfig) -> Self {
        Self {
            http,
            base_url: config.nominatim_url.clone(),
            country: config.geocode_country.clone(),
        }
    }

    async fn search(&self, query: &str) -> LookupResponse<Option<GeoPoint>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Upstream {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let hits: Vec<NominatimHit> = response.json().await?;
        Ok(hits.into_iter().next().and_then(|hit| hit.into_point(query)))
    }
}

impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, place: &str) -> LookupResponse<Option<GeoPoint>> {
        if place.trim().is_empty() {
            return Ok(None);
        }

        for query in query_variants(place, &self.country) {
            match self.search(&query).await {
                Ok(Some(point)) => {
                    debug!(query = %query, lat = point.latitude, lon = point.longitude, "geocoded");
                    return Ok(Some(point));
                }
                Ok(None) => debug!(query = %query, "no geocoding match"),
                Err(error) => debug!(query = %query, %error, "geocoding variant failed"),
            }
        }

        Ok(None)
    }
}

pub fn resolve_alias(place: &str) -> String {
    let raw = place.trim();
    let key = raw.to_lowercase();

    CITY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// The alias-resolved name, then the name qualified by country, then "<name> city".
pub fn query_variants(place: &str, country: &str) -> Vec<String> {
    let name = resolve_alias(place);
    let mut variants = vec![name.clone()];
    if !country.trim().is_empty() {
        variants.push(format!("{name}, {}", country.trim()));
    }
    variants.push(format!("{name} city"));
    variants
}

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: Option<String>,
    lon: Option<String>,
    display_name: Option<String>,
}

impl NominatimHit {
    fn into_point(self, query: &str) -> Option<GeoPoint> {
        let latitude = self.lat?.parse::<f64>().ok()?;
        let longitude = self.lon?.parse::<f64>().ok()?;

        Some(GeoPoint {
            latitude,
            longitude,
            display_name: self.display_name.unwrap_or_else(|| query.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_are_case_insensitive() {
        assert_eq!(resolve_alias("Bangalore"), "Bengaluru");
        assert_eq!(resolve_alias(" POndy "), "Puducherry");
        assert_eq!(resolve_alias("Jaipur"), "Jaipur");
    }

    #[test]
    fn variants_are_tried_in_order() {
        assert_eq!(
            query_variants("Bombay", "India"),
            vec!["Mumbai", "Mumbai, India", "Mumbai city"]
        );
        assert_eq!(query_variants("Lyon", ""), vec!["Lyon", "Lyon city"]);
    }

    #[test]
    fn hit_with_unparseable_coordinates_is_skipped() {
        let hit = NominatimHit {
            lat: Some("north".to_string()),
            lon: Some("77.5".to_string()),
            display_name: None,
        };
        assert!(hit.into_point("x").is_none());

        let hit = NominatimHit {
            lat: Some("12.97".to_string()),
            lon: Some("77.59".to_string()),
            display_name: None,
        };
        let point = hit.into_point("Bengaluru").unwrap();
        assert_eq!(point.display_name, "Bengaluru");
    }
}
