use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Weather,
    Places,
    Both,
    Unknown,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Places => "places",
            Self::Both => "both",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized place guess. The empty string means no place was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceCandidate(String);

impl PlaceCandidate {
    pub fn none() -> Self {
        Self(String::new())
    }

    /// Wraps an already-normalized name. Callers outside this crate should go
    /// through `place::normalize` instead.
    pub(crate) fn from_normalized(value: String) -> Self {
        Self(value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a collaborator lookup. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

const FALLBACK_FAILURE_MESSAGE: &str = "The lookup failed for an unknown reason.";

impl<T> LookupResult<T> {
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: Some(payload),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_FAILURE_MESSAGE.to_string()
        } else {
            message
        };

        Self {
            success: false,
            message,
            payload: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub temperature_c: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like_c: Option<f64>,
    pub rain_chance_pct: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl PlaceEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

pub type WeatherResult = LookupResult<WeatherReport>;
pub type PlacesResult = LookupResult<Vec<PlaceEntry>>;

/// Diagnostics collected while answering a single query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseTrace {
    pub detected_place: PlaceCandidate,
    pub intent: Intent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_result: Option<WeatherResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub places_result: Option<PlacesResult>,
}

impl ResponseTrace {
    pub fn new(detected_place: PlaceCandidate, intent: Intent) -> Self {
        Self {
            detected_place,
            intent,
            weather_result: None,
            places_result: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryReply {
    pub response: String,
    pub trace: ResponseTrace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_never_has_empty_message() {
        let result: LookupResult<()> = LookupResult::failure("   ");
        assert!(!result.success);
        assert!(!result.message.trim().is_empty());
        assert!(result.payload.is_none());
    }

    #[test]
    fn trace_omits_missing_lookups() {
        let trace = ResponseTrace::new(PlaceCandidate::from_normalized("Pune".into()), Intent::Weather);
        let value = serde_json::to_value(&trace).unwrap();

        assert_eq!(value["detected_place"], "Pune");
        assert_eq!(value["intent"], "weather");
        assert!(value.get("weather_result").is_none());
        assert!(value.get("places_result").is_none());
    }

    #[test]
    fn trace_reads_back_without_payloads() {
        let raw = r#"{
            "detected_place": "Goa",
            "intent": "both",
            "weather_result": { "success": false, "message": "Weather API key missing!" }
        }"#;
        let trace: ResponseTrace = serde_json::from_str(raw).unwrap();

        assert_eq!(trace.detected_place.as_str(), "Goa");
        assert_eq!(trace.intent, Intent::Both);
        let weather = trace.weather_result.unwrap();
        assert!(!weather.success);
        assert!(weather.payload.is_none());
        assert!(trace.places_result.is_none());
    }
}
