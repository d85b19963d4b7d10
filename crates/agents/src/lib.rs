use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use voyage_core::{
    classify_intent, extract_place, render_places, Intent, QueryReply, ResponseTrace,
};
use voyage_lookups::{PlacesLookup, WeatherLookup};
use voyage_observability::AppMetrics;

pub const NO_PLACE_MESSAGE: &str =
    "I couldn't detect the place you want to visit. Please mention a valid city name.";

pub const CLARIFY_MESSAGE: &str =
    "I'm not sure what you're looking for. Ask about the weather or places to visit in a city.";

const SEGMENT_SEPARATOR: &str = "\n\n";

/// Answers free-text travel queries by routing them to the weather and places
/// lookups.
///
/// Lookups run one after another. Weather is the primary signal: when it fails
/// the answer is that failure alone. A places failure only ends the answer when
/// places was the sole thing asked for; otherwise it becomes its own segment.
#[derive(Clone)]
pub struct TravelAgent<W, P>
where
    W: WeatherLookup,
    P: PlacesLookup,
{
    weather: W,
    places: P,
    metrics: Arc<AppMetrics>,
}

impl<W, P> TravelAgent<W, P>
where
    W: WeatherLookup,
    P: PlacesLookup,
{
    pub fn new(weather: W, places: P, metrics: Arc<AppMetrics>) -> Self {
        Self {
            weather,
            places,
            metrics,
        }
    }

    pub fn weather(&self) -> &W {
        &self.weather
    }

    pub fn metrics(&self) -> &AppMetrics {
        &self.metrics
    }

    #[instrument(skip(self, text))]
    pub async fn handle(&self, text: &str) -> QueryReply {
        let started = Instant::now();
        let query_id = Uuid::new_v4();
        self.metrics.inc_query();

        let place = extract_place(text);
        let intent = classify_intent(text);
        let mut trace = ResponseTrace::new(place.clone(), intent);

        let response = if place.is_empty() {
            self.metrics.inc_no_place();
            debug!(query_id = %query_id, "no place detected");
            NO_PLACE_MESSAGE.to_string()
        } else {
            self.respond(place.as_str(), intent, &mut trace).await
        };

        self.metrics.observe_latency(started.elapsed());
        info!(
            query_id = %query_id,
            place = %place,
            intent = %intent,
            weather_fetched = trace.weather_result.is_some(),
            places_fetched = trace.places_result.is_some(),
            "query handled"
        );

        QueryReply { response, trace }
    }

    async fn respond(&self, place: &str, intent: Intent, trace: &mut ResponseTrace) -> String {
        let mut segments = Vec::new();

        match intent {
            Intent::Weather => match self.weather_segment(place, trace).await {
                Ok(segment) => segments.push(segment),
                Err(message) => return self.short_circuit(intent, message),
            },
            Intent::Places => match self.places_segment(place, trace).await {
                Ok(segment) => segments.push(segment),
                Err(message) => return self.short_circuit(intent, message),
            },
            Intent::Both => {
                match self.weather_segment(place, trace).await {
                    Ok(segment) => segments.push(segment),
                    Err(message) => return self.short_circuit(intent, message),
                }
                let places = self.places_segment(place, trace).await;
                segments.push(places.unwrap_or_else(|message| self.degrade(intent, message)));
            }
            Intent::Unknown => {
                // Both lookups are always issued for an unclassified query.
                let weather = self.weather_segment(place, trace).await;
                let places = self.places_segment(place, trace).await;
                match weather {
                    Ok(segment) => segments.push(segment),
                    Err(message) => return self.short_circuit(intent, message),
                }
                segments.push(places.unwrap_or_else(|message| self.degrade(intent, message)));
            }
        }

        if segments.is_empty() {
            return CLARIFY_MESSAGE.to_string();
        }

        segments.join(SEGMENT_SEPARATOR)
    }

    /// `Ok` carries the weather summary, `Err` the failure message.
    async fn weather_segment(
        &self,
        place: &str,
        trace: &mut ResponseTrace,
    ) -> Result<String, String> {
        self.metrics.inc_weather_call();
        let result = self.weather.fetch(place).await;

        let segment = if result.success {
            Ok(result.message.clone())
        } else {
            Err(result.message.clone())
        };
        trace.weather_result = Some(result);
        segment
    }

    /// `Ok` carries the rendered list, `Err` the failure message.
    async fn places_segment(
        &self,
        place: &str,
        trace: &mut ResponseTrace,
    ) -> Result<String, String> {
        self.metrics.inc_places_call();
        let result = self.places.fetch(place).await;

        let segment = if result.success {
            Ok(render_places(&result))
        } else {
            Err(result.message.clone())
        };
        trace.places_result = Some(result);
        segment
    }

    fn short_circuit(&self, intent: Intent, message: String) -> String {
        self.metrics.inc_short_circuit();
        warn!(intent = %intent, reason = %message, "lookup failure ended the query");
        message
    }

    fn degrade(&self, intent: Intent, message: String) -> String {
        self.metrics.inc_degraded();
        warn!(intent = %intent, reason = %message, "places lookup failed, answering with weather only");
        message
    }
}
