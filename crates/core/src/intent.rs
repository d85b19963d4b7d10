use crate::lexicon::{contains_any, PLACES_KEYWORDS, TRIP_PLANNING_PHRASES, WEATHER_KEYWORDS};
use crate::models::Intent;

pub fn classify_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();

    let asks_weather = contains_any(&lower, WEATHER_KEYWORDS);
    let asks_places = contains_any(&lower, PLACES_KEYWORDS);

    match (asks_weather, asks_places) {
        (true, true) => Intent::Both,
        (true, false) => Intent::Weather,
        (false, true) => Intent::Places,
        // "plan my trip to X" names neither topic but wants both.
        (false, false) if contains_any(&lower, TRIP_PLANNING_PHRASES) => Intent::Both,
        (false, false) => Intent::Unknown,
    }
}
