use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use voyage_core::{LookupResult, PlaceEntry, PlacesResult};

use crate::config::LookupConfig;
use crate::error::{LookupError, LookupResponse};
use crate::geocode::{GeoPoint, NominatimGeocoder};
use crate::wiki::{title_from_tag, WikipediaClient};
use crate::{Geocoder, PlacesLookup};

const TOURISM_KINDS: &str = "attraction|museum|gallery|zoo|viewpoint|park|castle|monument|theme_park";
const HISTORIC_KINDS: &str = "fort|monument|ruins|castle|memorial";

/// Names that point at lodging rather than sights.
const LODGING_MARKERS: &[&str] = &[
    "hotel", "lodge", "guest", "inn", "residency", "home", "hostel", "resort",
];

const INFORMATIVE_TAGS: &[&str] = &["website", "opening_hours", "description", "image", "heritage"];

/// Points of interest from OpenStreetMap (Overpass), ranked and enriched with
/// Wikipedia summaries.
#[derive(Debug, Clone)]
pub struct OverpassPlacesClient<G = NominatimGeocoder> {
    http: Client,
    geocoder: G,
    wiki: WikipediaClient,
    overpass_url: String,
    radius_meters: u32,
    max_places: usize,
}

impl OverpassPlacesClient<NominatimGeocoder> {
    pub fn new(http: Client, config: &LookupConfig) -> Self {
        let geocoder = NominatimGeocoder::new(http.clone(), config);
        Self::with_geocoder(http, geocoder, config)
    }
}

impl<G: Geocoder> OverpassPlacesClient<G> {
    pub fn with_geocoder(http: Client, geocoder: G, config: &LookupConfig) -> Self {
        Self {
            wiki: WikipediaClient::new(http.clone(), config.wikipedia_url.clone()),
            http,
            geocoder,
            overpass_url: config.overpass_url.clone(),
            radius_meters: config.search_radius_meters,
            max_places: config.max_places,
        }
    }

    async fn nearby(&self, point: &GeoPoint) -> LookupResponse<Vec<PlaceEntry>> {
        let query = overpass_query(point, self.radius_meters);
        let response = self
            .http
            .post(&self.overpass_url)
            .form(&[("data", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Upstream {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: OverpassResponse = response.json().await?;
        let mut entries = rank_elements(body.elements);
        entries.truncate(self.max_places);

        for entry in entries.iter_mut() {
            self.enrich(entry).await;
        }

        Ok(entries)
    }

    async fn enrich(&self, entry: &mut PlaceEntry) {
        let Some(title) = entry.wiki_title.clone() else {
            return;
        };

        match self.wiki.summary(&title).await {
            Ok(Some(summary)) => {
                entry.wiki_title = Some(summary.title);
                entry.thumbnail = summary.thumbnail;
                entry.summary = summary.extract;
                entry.description = summary.description;
            }
            Ok(None) => debug!(title = %title, "no wikipedia page"),
            Err(error) => debug!(title = %title, %error, "wikipedia enrichment skipped"),
        }
    }
}

impl<G: Geocoder> PlacesLookup for OverpassPlacesClient<G> {
    #[instrument(skip(self))]
    async fn fetch(&self, place: &str) -> PlacesResult {
        let point = match self.geocoder.geocode(place).await {
            Ok(Some(point)) => point,
            Ok(None) => return LookupResult::failure("I don't know if this place exists."),
            Err(error) => {
                warn!(%error, "geocoding failed");
                return LookupResult::failure("I don't know if this place exists.");
            }
        };

        match self.nearby(&point).await {
            Ok(entries) if entries.is_empty() => LookupResult::success(
                format!("No major tourist attractions found near {place}."),
                entries,
            ),
            Ok(entries) => {
                info!(count = entries.len(), "places found");
                LookupResult::success(
                    format!("Here are some popular places you can visit in or near {place}:"),
                    entries,
                )
            }
            Err(error) => {
                warn!(%error, "overpass lookup failed");
                LookupResult::failure("Unable to fetch tourist places right now.")
            }
        }
    }
}

pub fn overpass_query(point: &GeoPoint, radius_meters: u32) -> String {
    let around = format!(
        "(around:{},{},{})",
        radius_meters, point.latitude, point.longitude
    );

    let mut lines = vec!["[out:json][timeout:30];".to_string(), "(".to_string()];
    for (key, kinds) in [("tourism", TOURISM_KINDS), ("historic", HISTORIC_KINDS)] {
        for element in ["node", "way", "relation"] {
            lines.push(format!("  {element}[\"{key}\"~\"{kinds}\"]{around};"));
        }
    }
    lines.push(");".to_string());
    lines.push("out center;".to_string());
    lines.join("\n")
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

/// Drops unnamed and lodging entries, de-duplicates by name and sorts by
/// descending popularity. Ties keep upstream order.
fn rank_elements(elements: Vec<OverpassElement>) -> Vec<PlaceEntry> {
    let mut seen = HashSet::new();
    let mut entries = elements
        .into_iter()
        .filter_map(into_entry)
        .filter(|entry| !is_lodging(&entry.name))
        .filter(|entry| seen.insert(entry.name.clone()))
        .collect::<Vec<_>>();

    entries.sort_by(|a, b| {
        b.popularity
            .partial_cmp(&a.popularity)
            .unwrap_or(Ordering::Equal)
    });
    entries
}

fn into_entry(element: OverpassElement) -> Option<PlaceEntry> {
    let name = element.tags.get("name")?.trim().to_string();
    if name.is_empty() {
        return None;
    }

    let kind = element
        .tags
        .get("tourism")
        .or_else(|| element.tags.get("historic"))
        .cloned();
    let (latitude, longitude) = match (&element.center, element.lat, element.lon) {
        (_, Some(lat), Some(lon)) => (Some(lat), Some(lon)),
        (Some(center), _, _) => (Some(center.lat), Some(center.lon)),
        _ => (None, None),
    };

    Some(PlaceEntry {
        popularity: popularity(&element.tags),
        wiki_title: element.tags.get("wikipedia").and_then(|tag| title_from_tag(tag)),
        name,
        kind,
        latitude,
        longitude,
        ..PlaceEntry::default()
    })
}

fn is_lodging(name: &str) -> bool {
    let lower = name.to_lowercase();
    LODGING_MARKERS.iter().any(|marker| lower.contains(marker))
}

pub fn popularity(tags: &HashMap<String, String>) -> f64 {
    let kind = tags
        .get("tourism")
        .or_else(|| tags.get("historic"))
        .map(String::as_str)
        .unwrap_or_default();

    let mut score = match kind {
        "attraction" => 3.0,
        "museum" | "castle" | "fort" => 2.5,
        "monument" | "zoo" | "theme_park" => 2.0,
        "gallery" | "viewpoint" => 1.5,
        "park" | "memorial" | "ruins" => 1.0,
        _ => 0.5,
    };
    if tags.contains_key("wikipedia") {
        score += 2.0;
    }
    if tags.contains_key("wikidata") {
        score += 1.0;
    }
    score += 0.1 * INFORMATIVE_TAGS
        .iter()
        .filter(|tag| tags.contains_key(**tag))
        .count() as f64;

    score.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tags: &[(&str, &str)]) -> OverpassElement {
        OverpassElement {
            lat: Some(12.3),
            lon: Some(76.6),
            center: None,
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    struct NowhereGeocoder;

    impl Geocoder for NowhereGeocoder {
        async fn geocode(&self, _place: &str) -> LookupResponse<Option<GeoPoint>> {
            Ok(None)
        }
    }

    #[test]
    fn ranks_filters_and_dedupes() {
        let ranked = rank_elements(vec![
            element(&[("name", "Rail Museum"), ("tourism", "museum")]),
            element(&[("tourism", "viewpoint")]),
            element(&[("name", "Royal Orchid Hotel"), ("tourism", "attraction")]),
            element(&[
                ("name", "Mysore Palace"),
                ("tourism", "attraction"),
                ("wikipedia", "en:Mysore Palace"),
                ("wikidata", "Q1"),
            ]),
            element(&[("name", "Rail Museum"), ("tourism", "museum")]),
        ]);

        let names = ranked.iter().map(|e| e.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Mysore Palace", "Rail Museum"]);
        assert_eq!(ranked[0].wiki_title.as_deref(), Some("Mysore Palace"));
        assert!(ranked[0].popularity > ranked[1].popularity);
    }

    #[test]
    fn uses_center_for_ways() {
        let mut way = element(&[("name", "Lalbagh"), ("leisure", "garden")]);
        way.lat = None;
        way.lon = None;
        way.center = Some(OverpassCenter { lat: 12.95, lon: 77.58 });

        let entry = into_entry(way).unwrap();
        assert_eq!(entry.latitude, Some(12.95));
        assert_eq!(entry.kind, None);
        assert_eq!(entry.popularity, 0.5);
    }

    #[test]
    fn query_covers_tourism_and_historic() {
        let point = GeoPoint {
            latitude: 15.49,
            longitude: 73.82,
            display_name: "Goa".to_string(),
        };
        let query = overpass_query(&point, 15_000);

        assert!(query.starts_with("[out:json][timeout:30];"));
        assert!(query.contains("node[\"tourism\"~\"attraction|museum"));
        assert!(query.contains("relation[\"historic\"~\"fort|monument"));
        assert!(query.contains("(around:15000,15.49,73.82)"));
        assert!(query.ends_with("out center;"));
    }

    #[tokio::test]
    async fn unresolvable_place_fails() {
        let config = LookupConfig::default();
        let client =
            OverpassPlacesClient::with_geocoder(config.http_client().unwrap(), NowhereGeocoder, &config);

        let result = client.fetch("Atlantis").await;
        assert!(!result.success);
        assert_eq!(result.message, "I don't know if this place exists.");
        assert!(result.payload.is_none());
    }
}
